//! Voting-matrix finality detector.
//!
//! This crate decides, as blocks arrive into a justification DAG, whether a
//! child of the last finalized block (LFB) has gathered enough weighted
//! validator support to be declared irreversible.
//!
//! # Architecture
//!
//! The detector is a synchronous decision function wrapped around one piece
//! of mutable state, the [`VotingMatrix`]:
//!
//! - `on_new_block` asks the DAG which child of the LFB the block votes
//!   for; if none, the block is irrelevant to finality and the call
//!   returns `None`.
//! - Otherwise the block creator's matrix row is replaced with the block's
//!   *panorama* (for every bonded validator, the highest-rank message of
//!   that validator the block has transitively justified) and the
//!   creator's first-level-zero vote is recorded.
//! - The committee finder then prunes the candidate's supporters to a
//!   fixed point: a validator stays only while the supporters it can see
//!   (first-level-zero votes at or below its panorama levels) carry at
//!   least the quorum weight.
//! - A surviving committee finalizes the candidate; the matrix is rebuilt
//!   from scratch against the new LFB before the result is returned.
//!
//! # Terminology
//!
//! - **LFB**: the deepest block declared irreversible so far.
//! - **Panorama**: per-validator vector of maximum DAG levels reachable
//!   through a block's justifications.
//! - **First-level-zero vote**: a validator's earliest message committing
//!   to the current candidate branch; the record quorum computation uses.
//! - **Quorum threshold `q`**: `ceil((0.5 + rFTT) · total_weight)`,
//!   strictly more than half the bonded stake plus the safety margin.
//!
//! # Concurrency
//!
//! Every `on_new_block` call, including the rebuild a finalization
//! triggers, runs under one mutex, so the sequence of decisions is a
//! linearization of the input stream and no partially updated matrix is
//! ever observable. The core never suspends; async hosts drive it from a
//! single task (see `vantage-runner`).

mod committee;
mod detector;
mod error;
mod matrix;
mod panorama;

pub use detector::FinalityDetector;
pub use error::FinalityError;
pub use matrix::{quorum_threshold, ValidatorIndex, VotingMatrix};
pub use panorama::{panorama_dag_levels, panorama_row};
