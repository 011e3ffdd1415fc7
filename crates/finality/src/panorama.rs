//! Panorama computation over the justification DAG.
//!
//! A block's panorama answers, for every bonded validator, "how much of
//! this validator's swimlane had the block's creator seen?", expressed as
//! the maximum DAG level among the validator's messages in the block's
//! justification cone.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use vantage_dag::{BlockDag, DagError};
use vantage_types::{BlockHash, BlockMetadata, ValidatorId};

use crate::matrix::ValidatorIndex;

/// For each validator in `validators`, the maximum DAG level among its
/// messages transitively justified by `block` (including `block` itself
/// when its creator is in the set).
///
/// Validators with no message in the cone are absent from the result.
/// Breadth-first over justification edges; each message is visited once,
/// so the walk is linear in the size of the cone.
pub fn panorama_dag_levels<D: BlockDag + ?Sized>(
    dag: &D,
    block: &BlockMetadata,
    validators: &BTreeSet<ValidatorId>,
) -> Result<BTreeMap<ValidatorId, u64>, DagError> {
    let mut levels: BTreeMap<ValidatorId, u64> = BTreeMap::new();
    let mut visited: HashSet<BlockHash> = HashSet::from([block.hash]);
    let mut queue: VecDeque<BlockMetadata> = VecDeque::from([block.clone()]);

    while let Some(meta) = queue.pop_front() {
        if validators.contains(&meta.creator) {
            let level = levels.entry(meta.creator.clone()).or_insert(0);
            *level = (*level).max(meta.rank);
        }
        for justified in &meta.justifications {
            if visited.insert(*justified) {
                queue.push_back(dag.lookup(justified)?);
            }
        }
    }

    Ok(levels)
}

/// A block's panorama as a matrix row aligned with `index`.
///
/// Validators outside the cone get level 0.
pub fn panorama_row<D: BlockDag + ?Sized>(
    dag: &D,
    block: &BlockMetadata,
    index: &ValidatorIndex,
) -> Result<Vec<u64>, DagError> {
    let validators: BTreeSet<ValidatorId> = index.validators().iter().cloned().collect();
    let levels = panorama_dag_levels(dag, block, &validators)?;

    let mut row = vec![0u64; index.len()];
    for (validator, level) in levels {
        if let Some(i) = index.get(&validator) {
            row[i] = level;
        }
    }
    Ok(row)
}
