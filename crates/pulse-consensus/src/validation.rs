//! Header verification facade.
//!
//! Composes the fork schedule, the difficulty engine, the PoW check and
//! the reward schedule into a single pass over one candidate header. The
//! caller (the outer blockchain) supplies the recent-chain window; this
//! module performs no I/O and holds no state beyond the network choice.

use crate::difficulty::next_difficulty_for_version;
use crate::error::{ConsensusError, ConsensusResult};
use crate::forks::version_at;
use crate::hash::BlockHash;
use crate::network::NetworkType;
use crate::pow::check_hash;
use crate::reward::block_reward;
use tracing::debug;

/// One candidate block header, as far as consensus arithmetic cares.
#[derive(Debug, Clone)]
pub struct CandidateHeader {
    /// Height the block claims.
    pub height: u64,
    /// The block id (checkpointed by the registry, not checked here).
    pub block_hash: BlockHash,
    /// The PoW hash of the header blob, from the hash oracle.
    pub pow_hash: BlockHash,
    /// Cumulative serialized size of the block.
    pub block_size: u64,
}

/// Recent-chain data the verifier needs, reconstructed per call from the
/// caller's blockchain view. Timestamps and cumulative difficulties are
/// oldest first and equally long.
#[derive(Debug, Clone)]
pub struct ChainWindow<'a> {
    /// Unix-second timestamps of recent blocks.
    pub timestamps: &'a [u64],
    /// Cumulative difficulty at each of those blocks.
    pub cumulative_difficulties: &'a [u64],
    /// Median block size over the reward window.
    pub median_block_size: u64,
    /// Coins generated up to the parent block.
    pub already_generated: u64,
}

/// Consensus judgements for an accepted header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedHeader {
    /// Protocol version in force at the header's height.
    pub version: u8,
    /// Difficulty the header had to satisfy.
    pub difficulty: u64,
    /// Expected coinbase reward.
    pub reward: u64,
}

/// Stateless header verifier for one network.
#[derive(Debug, Clone, Copy)]
pub struct HeaderVerifier {
    network: NetworkType,
}

impl HeaderVerifier {
    /// Create a verifier for the given network.
    pub fn new(network: NetworkType) -> Self {
        Self { network }
    }

    /// The network this verifier judges against.
    pub fn network(&self) -> NetworkType {
        self.network
    }

    /// Verify a candidate header against the supplied chain window.
    ///
    /// Order: protocol version lookup, difficulty retarget, PoW check,
    /// reward computation. Any failure rejects the block.
    pub fn verify(
        &self,
        candidate: &CandidateHeader,
        window: &ChainWindow<'_>,
    ) -> ConsensusResult<VerifiedHeader> {
        if window.timestamps.len() != window.cumulative_difficulties.len() {
            return Err(ConsensusError::WindowMismatch {
                timestamps: window.timestamps.len(),
                difficulties: window.cumulative_difficulties.len(),
            });
        }

        let version = version_at(self.network, candidate.height);
        let difficulty = next_difficulty_for_version(
            version,
            window.timestamps,
            window.cumulative_difficulties,
        );

        if !check_hash(&candidate.pow_hash, difficulty) {
            return Err(ConsensusError::ProofOfWorkFailed {
                height: candidate.height,
                difficulty,
            });
        }

        let reward = block_reward(
            window.median_block_size,
            candidate.block_size,
            window.already_generated,
            version,
            candidate.height,
        )?;

        debug!(
            height = candidate.height,
            version, difficulty, reward, "header verified"
        );

        Ok(VerifiedHeader {
            version,
            difficulty,
            reward,
        })
    }
}
