//! In-memory DAG fixture.
//!
//! Backs the detector's test suites and small simulations. Blocks are
//! content-addressed with blake3 over the structural fields plus an
//! insertion counter, so two otherwise identical blocks still get distinct
//! hashes.

use std::collections::{BTreeMap, HashMap};

use vantage_types::{BlockHash, BlockMetadata, ValidatorId, WeightMap};

use crate::{BlockDag, DagError};

/// A growable in-memory justification DAG.
#[derive(Debug, Clone, Default)]
pub struct MemoryDag {
    blocks: HashMap<BlockHash, BlockMetadata>,
    /// Latest (highest-rank) message per creator.
    tips: BTreeMap<ValidatorId, BlockHash>,
    /// Insertion counter mixed into block hashes.
    seq: u64,
}

impl MemoryDag {
    /// Create an empty DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a genesis block with the given post-state weights.
    ///
    /// The creator is recorded as-is; tests normally pass an identity that
    /// is not bonded so genesis never shows up as a validator message.
    pub fn genesis(&mut self, creator: ValidatorId, weight_map: WeightMap) -> BlockHash {
        self.insert_block(creator, vec![], vec![], weight_map)
    }

    /// Insert a block, inheriting the weight map from its main parent.
    ///
    /// Rank is one above the highest-ranked justified or parent block.
    ///
    /// # Panics
    ///
    /// Panics if any referenced block is unknown; the fixture expects
    /// blocks to be added parents-first.
    pub fn add_block(
        &mut self,
        creator: ValidatorId,
        parents: Vec<BlockHash>,
        justifications: Vec<BlockHash>,
    ) -> BlockHash {
        let main_parent = parents.first().expect("non-genesis block needs a parent");
        let weight_map = self
            .blocks
            .get(main_parent)
            .expect("main parent not in dag")
            .weight_map
            .clone();
        self.insert_block(creator, parents, justifications, weight_map)
    }

    /// Insert a block with an explicit post-state weight map.
    pub fn add_block_with_weights(
        &mut self,
        creator: ValidatorId,
        parents: Vec<BlockHash>,
        justifications: Vec<BlockHash>,
        weight_map: WeightMap,
    ) -> BlockHash {
        self.insert_block(creator, parents, justifications, weight_map)
    }

    fn insert_block(
        &mut self,
        creator: ValidatorId,
        parents: Vec<BlockHash>,
        justifications: Vec<BlockHash>,
        weight_map: WeightMap,
    ) -> BlockHash {
        let rank = parents
            .iter()
            .chain(justifications.iter())
            .map(|h| self.blocks.get(h).expect("referenced block not in dag").rank + 1)
            .max()
            .unwrap_or(0);

        let hash = self.block_hash(&creator, &parents, &justifications);
        self.seq += 1;

        let meta = BlockMetadata {
            hash,
            creator: creator.clone(),
            rank,
            parents,
            justifications,
            weight_map,
        };

        let replaces_tip = self
            .tips
            .get(&creator)
            .is_none_or(|tip| self.blocks[tip].rank < rank);
        if replaces_tip {
            self.tips.insert(creator, hash);
        }
        self.blocks.insert(hash, meta);
        hash
    }

    fn block_hash(
        &self,
        creator: &ValidatorId,
        parents: &[BlockHash],
        justifications: &[BlockHash],
    ) -> BlockHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seq.to_le_bytes());
        hasher.update(creator.as_bytes());
        for parent in parents {
            hasher.update(parent.as_bytes());
        }
        for justified in justifications {
            hasher.update(justified.as_bytes());
        }
        BlockHash::from_raw(*hasher.finalize().as_bytes())
    }

    /// Number of blocks in the DAG.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the DAG holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockDag for MemoryDag {
    fn lookup(&self, hash: &BlockHash) -> Result<BlockMetadata, DagError> {
        self.blocks
            .get(hash)
            .cloned()
            .ok_or(DagError::MissingBlock(*hash))
    }

    fn latest_messages(&self) -> BTreeMap<ValidatorId, BlockMetadata> {
        self.tips
            .iter()
            .map(|(creator, hash)| (creator.clone(), self.blocks[hash].clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(name: &[u8]) -> ValidatorId {
        ValidatorId::new(name)
    }

    fn three_validator_weights() -> WeightMap {
        [
            (validator(b"alice"), 10),
            (validator(b"bob"), 10),
            (validator(b"carol"), 10),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn ranks_follow_longest_justification_chain() {
        let mut dag = MemoryDag::new();
        let genesis = dag.genesis(validator(b"genesis"), three_validator_weights());
        let a1 = dag.add_block(validator(b"alice"), vec![genesis], vec![genesis]);
        let b1 = dag.add_block(validator(b"bob"), vec![a1], vec![a1]);
        // Justifies both branches; rank comes from the longer one.
        let a2 = dag.add_block(validator(b"alice"), vec![b1], vec![b1, a1]);

        assert_eq!(dag.lookup(&genesis).unwrap().rank, 0);
        assert_eq!(dag.lookup(&a1).unwrap().rank, 1);
        assert_eq!(dag.lookup(&b1).unwrap().rank, 2);
        assert_eq!(dag.lookup(&a2).unwrap().rank, 3);
    }

    #[test]
    fn lookup_miss_is_an_error() {
        let dag = MemoryDag::new();
        let missing = BlockHash::hash(b"nowhere");
        assert_eq!(
            dag.lookup(&missing),
            Err(DagError::MissingBlock(missing))
        );
    }

    #[test]
    fn latest_messages_track_highest_rank_per_creator() {
        let mut dag = MemoryDag::new();
        let genesis = dag.genesis(validator(b"genesis"), three_validator_weights());
        let a1 = dag.add_block(validator(b"alice"), vec![genesis], vec![genesis]);
        let b1 = dag.add_block(validator(b"bob"), vec![a1], vec![a1]);
        let a2 = dag.add_block(validator(b"alice"), vec![b1], vec![b1, a1]);

        let latest = dag.latest_messages();
        assert_eq!(latest[&validator(b"alice")].hash, a2);
        assert_eq!(latest[&validator(b"bob")].hash, b1);
        assert!(!latest.contains_key(&validator(b"carol")));
    }

    #[test]
    fn voted_branch_finds_the_child_on_the_main_path() {
        let mut dag = MemoryDag::new();
        let genesis = dag.genesis(validator(b"genesis"), three_validator_weights());
        let x = dag.add_block(validator(b"alice"), vec![genesis], vec![genesis]);
        let b1 = dag.add_block(validator(b"bob"), vec![x], vec![x]);
        let c1 = dag.add_block(validator(b"carol"), vec![b1], vec![b1]);

        assert_eq!(dag.voted_branch(&genesis, &x).unwrap(), Some(x));
        assert_eq!(dag.voted_branch(&genesis, &c1).unwrap(), Some(x));
        assert_eq!(dag.voted_branch(&x, &c1).unwrap(), Some(b1));
        // A block does not vote on a branch of itself.
        assert_eq!(dag.voted_branch(&genesis, &genesis).unwrap(), None);
    }

    #[test]
    fn voted_branch_rejects_other_branches() {
        let mut dag = MemoryDag::new();
        let genesis = dag.genesis(validator(b"genesis"), three_validator_weights());
        let x = dag.add_block(validator(b"alice"), vec![genesis], vec![genesis]);
        let y = dag.add_block(validator(b"bob"), vec![genesis], vec![genesis]);

        // y descends from genesis, not from x.
        assert_eq!(dag.voted_branch(&x, &y).unwrap(), None);
    }

    #[test]
    fn level_zero_messages_is_the_contiguous_run_oldest_first() {
        let mut dag = MemoryDag::new();
        let genesis = dag.genesis(validator(b"genesis"), three_validator_weights());
        let bob = validator(b"bob");

        let x = dag.add_block(validator(b"alice"), vec![genesis], vec![genesis]);
        let b1 = dag.add_block(bob.clone(), vec![x], vec![x]);
        let b2 = dag.add_block(bob.clone(), vec![b1], vec![b1]);

        let run = dag.level_zero_messages(&bob, &x).unwrap();
        let hashes: Vec<_> = run.iter().map(|m| m.hash).collect();
        assert_eq!(hashes, vec![b1, b2]);
    }

    #[test]
    fn level_zero_messages_stops_at_a_branch_switch() {
        let mut dag = MemoryDag::new();
        let genesis = dag.genesis(validator(b"genesis"), three_validator_weights());
        let bob = validator(b"bob");

        let x = dag.add_block(validator(b"alice"), vec![genesis], vec![genesis]);
        let y = dag.add_block(validator(b"carol"), vec![genesis], vec![genesis]);

        // Bob first votes y, then switches to x's branch.
        let b1 = dag.add_block(bob.clone(), vec![y], vec![y]);
        let b2 = dag.add_block(bob.clone(), vec![x], vec![x, b1]);

        let run = dag.level_zero_messages(&bob, &x).unwrap();
        let hashes: Vec<_> = run.iter().map(|m| m.hash).collect();
        assert_eq!(hashes, vec![b2], "run must not reach past the switch");

        // And for the abandoned branch the run is empty: the latest
        // message no longer votes for it.
        assert!(dag.level_zero_messages(&bob, &y).unwrap().is_empty());
    }
}
