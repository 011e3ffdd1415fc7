//! Detector errors.

use vantage_dag::DagError;

/// Errors surfaced by the finality detector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FinalityError {
    /// The relative fault-tolerance threshold is outside the open interval
    /// `(0, 0.5)`. Raised at construction; not recoverable.
    #[error("relative fault tolerance threshold {0} must lie strictly between 0 and 0.5")]
    ThresholdOutOfRange(f64),

    /// A DAG lookup failed. The adapter is authoritative, so the error is
    /// propagated unchanged.
    #[error(transparent)]
    Dag(#[from] DagError),
}
