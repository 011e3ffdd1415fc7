//! Validator identity and stake weights.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stake weight of a single validator.
pub type Weight = u64;

/// Bonded stake per validator, read from a block's post-state.
///
/// A `BTreeMap` so that iteration order is deterministic; index
/// construction in the detector depends on this.
pub type WeightMap = BTreeMap<ValidatorId, Weight>;

/// Opaque validator identity (public-key bytes).
///
/// Totally ordered (lexicographic on the bytes) so that the detector can
/// assign deterministic matrix indices.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidatorId(Vec<u8>);

impl ValidatorId {
    /// Wrap identity bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw identity bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for ValidatorId {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", abbrev(&self.0))
    }
}

impl fmt::Debug for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorId({})", abbrev(&self.0))
    }
}

fn abbrev(bytes: &[u8]) -> String {
    let prefix = &bytes[..bytes.len().min(4)];
    hex::encode(prefix)
}
