//! The checkpoint registry.

use crate::defaults;
use crate::error::{CheckpointError, CheckpointResult};
use parking_lot::RwLock;
use pulse_consensus::{BlockHash, NetworkType};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Outcome of checking a block against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointVerdict {
    /// The height is pinned and the hash matches.
    Matched,
    /// The height carries no pin; the block is outside checkpoint control.
    NotPinned,
}

/// Pinned block hashes, keyed by height.
///
/// Writes happen only while the node bootstraps (defaults, then the JSON
/// file, then DNS); after that the registry is read-only for the life of
/// the process. Entries are never removed, and a height, once pinned,
/// can only ever be re-pinned to the same hash.
#[derive(Debug, Default)]
pub struct CheckpointRegistry {
    points: RwLock<BTreeMap<u64, BlockHash>>,
}

impl CheckpointRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in table for `network`.
    pub fn for_network(network: NetworkType) -> CheckpointResult<Self> {
        let registry = Self::new();
        for (height, hash) in defaults::builtin(network) {
            registry.add_hex(*height, hash)?;
        }
        Ok(registry)
    }

    /// Pin `hash` at `height`.
    ///
    /// Re-adding an identical pin is a no-op; a different hash at an
    /// already-pinned height is [`CheckpointError::Conflicting`].
    pub fn add(&self, height: u64, hash: BlockHash) -> CheckpointResult<()> {
        let mut points = self.points.write();
        if let Some(existing) = points.get(&height) {
            if *existing != hash {
                return Err(CheckpointError::Conflicting { height });
            }
        }
        points.insert(height, hash);
        Ok(())
    }

    /// Pin a hex-encoded hash at `height`.
    pub fn add_hex(&self, height: u64, hash: &str) -> CheckpointResult<()> {
        self.add(height, BlockHash::from_hex(hash)?)
    }

    /// Whether `height` carries a pin.
    pub fn is_pinned(&self, height: u64) -> bool {
        self.points.read().contains_key(&height)
    }

    /// Whether `height` is at or below the highest pin, i.e. still under
    /// checkpoint protection.
    pub fn is_in_checkpoint_zone(&self, height: u64) -> bool {
        let points = self.points.read();
        points
            .keys()
            .next_back()
            .is_some_and(|highest| height <= *highest)
    }

    /// Validate a block hash against the pin at its height, if any.
    pub fn check_block(
        &self,
        height: u64,
        hash: &BlockHash,
    ) -> Result<CheckpointVerdict, CheckpointError> {
        let points = self.points.read();
        match points.get(&height) {
            None => Ok(CheckpointVerdict::NotPinned),
            Some(expected) if expected == hash => {
                info!(height, %hash, "checkpoint passed");
                Ok(CheckpointVerdict::Matched)
            }
            Some(expected) => {
                warn!(height, %expected, got = %hash, "checkpoint failed");
                Err(CheckpointError::Mismatch {
                    height,
                    expected: *expected,
                    got: *hash,
                })
            }
        }
    }

    /// Height of the highest pin, or 0 for an empty registry.
    pub fn max_pinned_height(&self) -> u64 {
        self.points.read().keys().next_back().copied().unwrap_or(0)
    }

    /// Whether an alternative chain may replace the block at
    /// `candidate_height` given the current `chain_tip`.
    ///
    /// Genesis can never be replaced. Otherwise the fork point must lie
    /// above the highest checkpoint the chain tip has already buried.
    pub fn is_alternative_allowed(&self, chain_tip: u64, candidate_height: u64) -> bool {
        if candidate_height == 0 {
            return false;
        }
        let points = self.points.read();
        match points.range(..=chain_tip).next_back() {
            None => true,
            Some((buried, _)) => *buried < candidate_height,
        }
    }

    /// Compare pins shared with `other`; any disagreement is an error.
    pub fn check_for_conflicts(&self, other: &CheckpointRegistry) -> CheckpointResult<()> {
        let ours = self.points.read();
        let theirs = other.points.read();
        for (height, hash) in theirs.iter() {
            if let Some(existing) = ours.get(height) {
                if existing != hash {
                    return Err(CheckpointError::Conflicting { height: *height });
                }
            }
        }
        Ok(())
    }

    /// Number of pins.
    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    /// Whether the registry holds no pins.
    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }
}
