//! Foundational types for the Vantage finality detector.
//!
//! This crate provides the data types shared by the DAG adapter and the
//! detector core:
//!
//! - **Identifiers**: [`BlockHash`], [`ValidatorId`]
//! - **Block view**: [`BlockMetadata`], [`Weight`], [`WeightMap`]
//! - **Finality records**: [`Vote`], [`CommitteeWithConsensusValue`]
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not
//! depend on any other workspace crates, making it the foundation layer.

mod block;
mod hash;
mod validator;
mod vote;

pub use block::BlockMetadata;
pub use hash::BlockHash;
pub use validator::{ValidatorId, Weight, WeightMap};
pub use vote::{CommitteeWithConsensusValue, Vote};
