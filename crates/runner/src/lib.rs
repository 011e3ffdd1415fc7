//! Drives the finality detector from the node's block stream.
//!
//! The detector core is synchronous; this crate is the async boundary
//! around it. A [`Finalizer`] owns the detector and the current last
//! finalized block, consumes block-added events one at a time from a
//! channel, and emits every newly finalized value on another channel.
//! Processing one event at a time is what serializes detector calls; no
//! further coordination is needed, and a block received after a
//! finalization was emitted always observes the rebuilt round.

use tokio::sync::mpsc;
use tracing::{debug, info};

use vantage_dag::BlockDag;
use vantage_finality::{FinalityDetector, FinalityError};
use vantage_types::{BlockHash, CommitteeWithConsensusValue};

/// Connects the detector to the block stream.
///
/// Tracks the last finalized block so callers only have to hand over
/// block hashes as they are added to the DAG.
#[derive(Debug)]
pub struct Finalizer<D> {
    dag: D,
    detector: FinalityDetector,
    last_finalized: BlockHash,
}

impl<D: BlockDag> Finalizer<D> {
    /// Create a finalizer rooted at `initial_lfb`.
    ///
    /// Fails when `rftt` is outside `(0, 0.5)` or the LFB is unknown to
    /// the DAG.
    pub fn new(dag: D, initial_lfb: BlockHash, rftt: f64) -> Result<Self, FinalityError> {
        let detector = FinalityDetector::new(&dag, &initial_lfb, rftt)?;
        Ok(Self {
            dag,
            detector,
            last_finalized: initial_lfb,
        })
    }

    /// The deepest block declared irreversible so far.
    pub fn last_finalized(&self) -> BlockHash {
        self.last_finalized
    }

    /// Run one block through the detector.
    ///
    /// On finalization the tracked LFB advances to the returned consensus
    /// value before this returns.
    pub fn process(
        &mut self,
        block: &BlockHash,
    ) -> Result<Option<CommitteeWithConsensusValue>, FinalityError> {
        let meta = self.dag.lookup(block)?;
        let result = self
            .detector
            .on_new_block(&self.dag, &meta, &self.last_finalized)?;

        if let Some(finalized) = &result {
            self.last_finalized = finalized.consensus_value;
            info!(
                value = %finalized.consensus_value,
                committee_size = finalized.committee.len(),
                weight = finalized.weight,
                "advanced the last finalized block"
            );
        }
        Ok(result)
    }

    /// Consume block-added events until either channel closes.
    ///
    /// Every newly finalized value is sent on `finalized`. DAG failures
    /// abort the loop; they mean the store broke its contract and the
    /// caller must decide what to do.
    pub async fn run(
        mut self,
        mut blocks: mpsc::Receiver<BlockHash>,
        finalized: mpsc::Sender<CommitteeWithConsensusValue>,
    ) -> Result<(), FinalityError> {
        while let Some(block) = blocks.recv().await {
            debug!(block = %block, "processing block-added event");
            if let Some(result) = self.process(&block)? {
                if finalized.send(result).await.is_err() {
                    debug!("finalized-value receiver dropped, stopping");
                    break;
                }
            }
        }
        Ok(())
    }
}
