//! Content-addressed block identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte block identifier.
///
/// Opaque to the detector: the only operations it relies on are equality
/// and a total order for deterministic containers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    /// Number of bytes in a block hash.
    pub const LENGTH: usize = 32;

    /// The all-zero hash.
    pub const ZERO: BlockHash = BlockHash([0u8; 32]);

    /// Hash arbitrary bytes into a block hash.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Wrap raw bytes without hashing.
    pub const fn from_raw(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Abbreviated form for logs; full bytes via `as_bytes`.
        write!(f, "{}", hex::encode(&self.0[..4]))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", hex::encode(&self.0[..4]))
    }
}

impl AsRef<[u8]> for BlockHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
