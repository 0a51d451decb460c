//! The 32-byte block hash type.

use crate::error::ConsensusError;
use std::fmt;
use std::str::FromStr;

/// A 32-byte hash, stored exactly as produced by the PoW library or the
/// block serializer. Compared byte-for-byte; rendered as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    /// The all-zero hash.
    pub const ZERO: BlockHash = BlockHash([0u8; 32]);

    /// Wrap raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, ConsensusError> {
        if s.len() != 64 {
            return Err(ConsensusError::InvalidHash(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| ConsensusError::InvalidHash(s.to_string()))?;
        Ok(Self(bytes))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The hash as four little-endian 64-bit limbs, least significant
    /// first. This is the numeric interpretation the PoW target check
    /// uses; it is independent of host endianness.
    pub fn to_le_limbs(&self) -> [u64; 4] {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&self.0[i * 8..(i + 1) * 8]);
            *limb = u64::from_le_bytes(chunk);
        }
        limbs
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self)
    }
}

impl FromStr for BlockHash {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
