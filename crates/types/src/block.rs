//! The detector's view of a single block.

use crate::{BlockHash, ValidatorId, WeightMap};
use serde::{Deserialize, Serialize};

/// Immutable per-block metadata exposed by the DAG store.
///
/// The detector never sees block payloads; this summary is everything it
/// needs: where the block sits in the justification DAG, who created it,
/// and the bonded stake at its post-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetadata {
    /// Content address of the block.
    pub hash: BlockHash,
    /// Validator that created the block.
    pub creator: ValidatorId,
    /// DAG level: the longest justification-chain distance from genesis.
    /// Strictly greater than the rank of every justified block.
    pub rank: u64,
    /// Parent blocks in the block tree; `parents[0]` is the main parent.
    /// Empty for genesis.
    pub parents: Vec<BlockHash>,
    /// Justified messages: every block the creator had seen when producing
    /// this one, including its own previous message.
    pub justifications: Vec<BlockHash>,
    /// Bonded stake per validator at this block's post-state.
    pub weight_map: WeightMap,
}

impl BlockMetadata {
    /// The main parent, or `None` for genesis.
    pub fn main_parent(&self) -> Option<&BlockHash> {
        self.parents.first()
    }

    /// Whether this block has no parents.
    pub fn is_genesis(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_parent_is_first() {
        let meta = BlockMetadata {
            hash: BlockHash::hash(b"b"),
            creator: ValidatorId::new(*b"alice"),
            rank: 2,
            parents: vec![BlockHash::hash(b"p0"), BlockHash::hash(b"p1")],
            justifications: vec![BlockHash::hash(b"p0")],
            weight_map: WeightMap::new(),
        };
        assert_eq!(meta.main_parent(), Some(&BlockHash::hash(b"p0")));
        assert!(!meta.is_genesis());
    }

    #[test]
    fn genesis_has_no_main_parent() {
        let meta = BlockMetadata {
            hash: BlockHash::hash(b"g"),
            creator: ValidatorId::new(*b"genesis"),
            rank: 0,
            parents: vec![],
            justifications: vec![],
            weight_map: WeightMap::new(),
        };
        assert!(meta.is_genesis());
        assert_eq!(meta.main_parent(), None);
    }
}
