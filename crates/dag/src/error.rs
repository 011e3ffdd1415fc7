//! DAG adapter errors.

use vantage_types::BlockHash;

/// Errors surfaced by the block DAG.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DagError {
    /// Metadata was requested for a hash the store does not know.
    ///
    /// The adapter is authoritative, so callers treat this as a hard
    /// failure rather than attempting recovery.
    #[error("block {0} is not in the dag")]
    MissingBlock(BlockHash),
}
