//! Voting-matrix round state.
//!
//! One [`VotingMatrix`] instance lives for exactly one finalization round:
//! it is created from the LFB's post-state bonds, mutated by whole-row
//! panorama replacements and single-slot vote records as blocks arrive,
//! and replaced wholesale when a new LFB is committed.

use std::collections::BTreeMap;

use vantage_types::{BlockHash, ValidatorId, Vote, Weight, WeightMap};

/// Deterministic validator ↔ `0..N` bijection over the bonded set.
///
/// Covers exactly the validators with non-zero weight at the LFB
/// post-state, in validator order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorIndex {
    by_validator: BTreeMap<ValidatorId, usize>,
    by_index: Vec<ValidatorId>,
}

impl ValidatorIndex {
    /// Build the index from a weight map, skipping zero-weight entries.
    ///
    /// Returns the index together with the weights array aligned to it.
    pub fn from_weight_map(weight_map: &WeightMap) -> (Self, Vec<Weight>) {
        let mut by_validator = BTreeMap::new();
        let mut by_index = Vec::new();
        let mut weights = Vec::new();
        for (validator, &weight) in weight_map {
            if weight == 0 {
                continue;
            }
            by_validator.insert(validator.clone(), by_index.len());
            by_index.push(validator.clone());
            weights.push(weight);
        }
        (Self { by_validator, by_index }, weights)
    }

    /// The matrix index of a validator, if bonded.
    pub fn get(&self, validator: &ValidatorId) -> Option<usize> {
        self.by_validator.get(validator).copied()
    }

    /// The validator at a matrix index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`; indices come from this bijection.
    pub fn validator(&self, index: usize) -> &ValidatorId {
        &self.by_index[index]
    }

    /// All bonded validators, in index order.
    pub fn validators(&self) -> &[ValidatorId] {
        &self.by_index
    }

    /// Number of bonded validators.
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    /// Whether no validator is bonded.
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

/// Weight required for a committee to declare finality: strictly more than
/// half the total plus the relative fault-tolerance margin.
pub fn quorum_threshold(total_weight: Weight, rftt: f64) -> Weight {
    ((0.5 + rftt) * total_weight as f64).ceil() as Weight
}

/// The N×N level matrix and first-level-zero votes for one round.
///
/// `level(i, j)` is the highest rank of any message by validator `j` that
/// validator `i` has observed in its own latest message's panorama. Levels
/// only grow within a round: a creator's next message justifies its
/// previous one, so each row replacement dominates the row it replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct VotingMatrix {
    index: ValidatorIndex,
    weights: Vec<Weight>,
    total_weight: Weight,
    quorum: Weight,
    levels: Vec<Vec<u64>>,
    first_zero_votes: Vec<Option<Vote>>,
}

impl VotingMatrix {
    /// Zero-initialized state for a round.
    ///
    /// The quorum threshold is derived here, once, and reused for every
    /// committee check of the round.
    pub fn new(index: ValidatorIndex, weights: Vec<Weight>, rftt: f64) -> Self {
        debug_assert_eq!(index.len(), weights.len());
        let n = index.len();
        let total_weight = weights.iter().sum();
        let quorum = quorum_threshold(total_weight, rftt);
        Self {
            index,
            weights,
            total_weight,
            quorum,
            levels: vec![vec![0; n]; n],
            first_zero_votes: vec![None; n],
        }
    }

    /// The validator bijection for this round.
    pub fn index(&self) -> &ValidatorIndex {
        &self.index
    }

    /// Number of bonded validators.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the bonded set is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Stake of the validator at `index`.
    pub fn weight(&self, index: usize) -> Weight {
        self.weights[index]
    }

    /// Total bonded stake this round.
    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    /// Quorum threshold this round.
    pub fn quorum(&self) -> Weight {
        self.quorum
    }

    /// The highest rank of `observed`'s messages seen from `observer`'s
    /// perspective.
    pub fn level(&self, observer: usize, observed: usize) -> u64 {
        self.levels[observer][observed]
    }

    /// The first-level-zero vote of the validator at `index`.
    pub fn first_zero_vote(&self, index: usize) -> Option<Vote> {
        self.first_zero_votes[index]
    }

    /// Replace an observer's row with a freshly computed panorama.
    pub fn replace_row(&mut self, observer: usize, row: Vec<u64>) {
        debug_assert_eq!(row.len(), self.levels.len());
        self.levels[observer] = row;
    }

    /// Record a validator's vote for `value` at `dag_level`.
    ///
    /// The slot is written only when empty or when the validator switched
    /// to a different consensus value; an unchanged value keeps the
    /// earliest recorded level. Returns whether the slot changed.
    pub fn record_vote(&mut self, index: usize, value: BlockHash, dag_level: u64) -> bool {
        match self.first_zero_votes[index] {
            Some(existing) if existing.value == value => false,
            _ => {
                self.first_zero_votes[index] = Some(Vote::new(value, dag_level));
                true
            }
        }
    }
}
