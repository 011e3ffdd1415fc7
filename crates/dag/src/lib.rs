//! Read-only view over the block DAG.
//!
//! The finality detector never owns block storage; it consumes this small
//! interface instead. Two operations are primitive ([`BlockDag::lookup`]
//! and [`BlockDag::latest_messages`]); the derived queries the detector
//! needs (`voted_branch`, `level_zero_messages`, main-chain ancestry) are
//! provided in terms of them. A store with better indices is free to
//! override the provided methods; the contracts below are what the
//! detector relies on.
//!
//! All operations are read-only with respect to consensus state. The
//! adapter is expected to be internally consistent: acyclic, total on the
//! hashes it has served, with ranks strictly increasing along
//! justification edges.

use std::collections::BTreeMap;

use vantage_types::{BlockHash, BlockMetadata, ValidatorId};

mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use error::DagError;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryDag;

/// Read-only access to the justification DAG.
pub trait BlockDag {
    /// Metadata for a block presumed present.
    ///
    /// A miss is a [`DagError::MissingBlock`]; the adapter is authoritative
    /// and callers propagate the error unchanged.
    fn lookup(&self, hash: &BlockHash) -> Result<BlockMetadata, DagError>;

    /// The latest message of every validator that has produced one,
    /// keyed by creator.
    fn latest_messages(&self) -> BTreeMap<ValidatorId, BlockMetadata>;

    /// Whether `ancestor` lies on `block`'s main-parent chain.
    ///
    /// A block is its own main-chain ancestor.
    fn is_in_main_chain(&self, ancestor: &BlockHash, block: &BlockHash) -> Result<bool, DagError> {
        let target = self.lookup(ancestor)?;
        let mut current = self.lookup(block)?;
        loop {
            if current.hash == target.hash {
                return Ok(true);
            }
            // Ranks strictly decrease along parent edges; once we are at or
            // below the target's rank we cannot meet it anymore.
            if current.rank <= target.rank {
                return Ok(false);
            }
            match current.main_parent() {
                Some(parent) => current = self.lookup(parent)?,
                None => return Ok(false),
            }
        }
    }

    /// The immediate main-tree child of `from` on the path from `from` to
    /// `block`, or `None` when `block` does not descend from `from` in the
    /// main-parent tree (including `block == from`).
    ///
    /// This is the branch `block` votes for when `from` is the last
    /// finalized block.
    fn voted_branch(
        &self,
        from: &BlockHash,
        block: &BlockHash,
    ) -> Result<Option<BlockHash>, DagError> {
        let base = self.lookup(from)?;
        let mut current = self.lookup(block)?;
        loop {
            if current.rank <= base.rank {
                return Ok(None);
            }
            let Some(parent) = current.main_parent().copied() else {
                return Ok(None);
            };
            if parent == *from {
                return Ok(Some(current.hash));
            }
            current = self.lookup(&parent)?;
        }
    }

    /// The contiguous run of `validator`'s own messages, ending at its
    /// latest message, that all vote for `vote_value`, ordered oldest
    /// first.
    ///
    /// Empty when the validator has no messages or its latest message does
    /// not vote for `vote_value`. The first element is the validator's
    /// earliest message committing to `vote_value` since it last voted for
    /// a different branch.
    fn level_zero_messages(
        &self,
        validator: &ValidatorId,
        vote_value: &BlockHash,
    ) -> Result<Vec<BlockMetadata>, DagError> {
        let mut run = Vec::new();
        let mut current = self.latest_messages().remove(validator);
        while let Some(meta) = current {
            if !self.is_in_main_chain(vote_value, &meta.hash)? {
                break;
            }
            current = self.previous_own_message(&meta)?;
            run.push(meta);
        }
        run.reverse();
        Ok(run)
    }

    /// The creator's previous message among a block's justifications.
    fn previous_own_message(
        &self,
        block: &BlockMetadata,
    ) -> Result<Option<BlockMetadata>, DagError> {
        let mut previous: Option<BlockMetadata> = None;
        for justified in &block.justifications {
            let meta = self.lookup(justified)?;
            if meta.creator == block.creator
                && previous.as_ref().is_none_or(|p| meta.rank > p.rank)
            {
                previous = Some(meta);
            }
        }
        Ok(previous)
    }
}
