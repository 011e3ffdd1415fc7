//! The finality detector.
//!
//! Orchestrates one finalization round at a time: per-block matrix
//! updates, the committee check, and the rebuild that follows a
//! finalization. All of it runs under a single lock, so callers observe a
//! linearization of the block stream and never a half-updated round.

use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use vantage_dag::BlockDag;
use vantage_types::{
    BlockHash, BlockMetadata, CommitteeWithConsensusValue, ValidatorId, Vote, Weight,
};

use crate::committee::find_committee;
use crate::error::FinalityError;
use crate::matrix::{ValidatorIndex, VotingMatrix};
use crate::panorama::panorama_row;

/// Detects finality of descendants of the last finalized block.
///
/// One instance tracks one chain. The round state is rebuilt from the DAG
/// whenever a new block is finalized, and on construction; nothing is
/// persisted, so a restarted node simply constructs a new detector from
/// its current LFB.
pub struct FinalityDetector {
    /// Relative fault-tolerance threshold, strictly between 0 and 0.5.
    rftt: f64,
    /// Round state; the lock serializes updates, committee checks, and
    /// rebuilds against each other.
    state: Mutex<VotingMatrix>,
}

impl std::fmt::Debug for FinalityDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FinalityDetector")
            .field("rftt", &self.rftt)
            .field("validators", &state.len())
            .field("total_weight", &state.total_weight())
            .field("quorum", &state.quorum())
            .finish()
    }
}

impl FinalityDetector {
    /// Create a detector for the chain rooted at `initial_lfb`.
    ///
    /// `rftt` is the relative fault-tolerance threshold; construction
    /// fails unless it lies strictly between 0 and 0.5.
    pub fn new<D: BlockDag + ?Sized>(
        dag: &D,
        initial_lfb: &BlockHash,
        rftt: f64,
    ) -> Result<Self, FinalityError> {
        if !(rftt > 0.0 && rftt < 0.5) {
            return Err(FinalityError::ThresholdOutOfRange(rftt));
        }
        let state = Self::build_state(dag, initial_lfb, rftt)?;
        Ok(Self {
            rftt,
            state: Mutex::new(state),
        })
    }

    /// Process a newly added block.
    ///
    /// Returns the finalized consensus value and its committee when the
    /// block's arrival completes a quorum, `None` otherwise. On success
    /// the round state has already been rebuilt against the new LFB by the
    /// time this returns; the caller's only duty is to adopt the returned
    /// consensus value as its `latest_finalized`.
    #[instrument(skip(self, dag, block), fields(
        block = %block.hash,
        creator = %block.creator,
        rank = block.rank
    ))]
    pub fn on_new_block<D: BlockDag + ?Sized>(
        &self,
        dag: &D,
        block: &BlockMetadata,
        latest_finalized: &BlockHash,
    ) -> Result<Option<CommitteeWithConsensusValue>, FinalityError> {
        let mut state = self.state.lock();

        let Some(candidate) = dag.voted_branch(latest_finalized, &block.hash)? else {
            debug!(
                lfb = %latest_finalized,
                "block does not vote on a child of the last finalized block"
            );
            return Ok(None);
        };

        match state.index().get(&block.creator) {
            Some(observer) => {
                let row = panorama_row(dag, block, state.index())?;
                state.replace_row(observer, row);
                state.record_vote(observer, candidate, block.rank);
            }
            None => {
                // Bonded after the LFB; its vote counts from the next
                // round onward. The committee check still runs.
                debug!("block creator is not bonded at the last finalized block");
            }
        }

        let Some((members, weight)) = find_committee(&state, &candidate) else {
            return Ok(None);
        };

        let committee: Vec<ValidatorId> = members
            .iter()
            .map(|&i| state.index().validator(i).clone())
            .collect();

        // The candidate is now final; every later round runs against it.
        // The assignment replaces the round state atomically under the
        // lock held since entry.
        *state = Self::build_state(dag, &candidate, self.rftt)?;

        info!(
            value = %candidate,
            committee_size = committee.len(),
            weight,
            "finalized a new block"
        );

        Ok(Some(CommitteeWithConsensusValue {
            consensus_value: candidate,
            committee,
            weight,
        }))
    }

    /// Number of validators bonded in the current round.
    pub fn validator_count(&self) -> usize {
        self.state.lock().len()
    }

    /// Quorum threshold of the current round.
    pub fn quorum(&self) -> Weight {
        self.state.lock().quorum()
    }

    /// A validator's recorded first-level-zero vote in the current round.
    pub fn first_zero_vote(&self, validator: &ValidatorId) -> Option<Vote> {
        let state = self.state.lock();
        state.index().get(validator).and_then(|i| state.first_zero_vote(i))
    }

    /// Build the round state for a finalized block.
    ///
    /// Reads the bonded set from the LFB's post-state, then replays each
    /// bonded validator's standing: its latest message determines the
    /// branch it votes on, the earliest message of its current run on that
    /// branch becomes the first-level-zero vote, and its row is the
    /// panorama of its latest message.
    fn build_state<D: BlockDag + ?Sized>(
        dag: &D,
        lfb: &BlockHash,
        rftt: f64,
    ) -> Result<VotingMatrix, FinalityError> {
        let anchor = dag.lookup(lfb)?;
        let (index, weights) = ValidatorIndex::from_weight_map(&anchor.weight_map);
        let mut state = VotingMatrix::new(index, weights, rftt);

        for (validator, latest) in dag.latest_messages() {
            let Some(observer) = state.index().get(&validator) else {
                continue;
            };
            let Some(value) = dag.voted_branch(lfb, &latest.hash)? else {
                continue;
            };
            let run = dag.level_zero_messages(&validator, &value)?;
            let Some(earliest) = run.first() else {
                continue;
            };

            let vote_level = earliest.rank;
            let row = panorama_row(dag, &latest, state.index())?;
            state.record_vote(observer, value, vote_level);
            state.replace_row(observer, row);
        }

        Ok(state)
    }
}
