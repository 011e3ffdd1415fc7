//! Finality vote and committee records.

use crate::{BlockHash, ValidatorId, Weight};
use serde::{Deserialize, Serialize};

/// A validator's first-level-zero vote: its earliest message committing to
/// a child of the last finalized block.
///
/// `value` is the candidate branch (an immediate child of the LFB in the
/// main-parent tree); `dag_level` is the rank of the earliest message the
/// validator produced voting for that branch. The level is what quorum
/// computation compares panoramas against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// The candidate block this vote commits to.
    pub value: BlockHash,
    /// Rank of the validator's earliest message voting for `value`.
    pub dag_level: u64,
}

impl Vote {
    /// Construct a vote record.
    pub fn new(value: BlockHash, dag_level: u64) -> Self {
        Self { value, dag_level }
    }
}

/// The result of a successful finality round: the finalized consensus
/// value together with the committee that secured it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeWithConsensusValue {
    /// The newly finalized block (a child of the previous LFB).
    pub consensus_value: BlockHash,
    /// Committee members, in validator order.
    pub committee: Vec<ValidatorId>,
    /// Total bonded weight of the committee; always at least the quorum
    /// threshold of the round that produced it.
    pub weight: Weight,
}
