//! # pulse-consensus
//!
//! Consensus rules for the Pulse blockchain, a CryptoNote-lineage chain.
//!
//! This crate provides:
//! - The hard-fork schedule (protocol versions 1..23 per network)
//! - Difficulty retargeting (four algorithm eras, dispatched by version)
//! - Proof-of-Work target validation over 256-bit hash values
//! - The block reward / emission schedule with its fork history
//! - A header verification facade composing the above
//!
//! ## Difficulty eras
//!
//! The chain retargeted four times over its history. Versions below 7 use
//! the classic 720-block trimmed-mean algorithm at a 60 second target;
//! versions 7..9 use the overflow-guarded variant at 120 seconds; versions
//! 10..13 use an LWMA over 70 blocks; version 14 onward uses a weighted
//! timespan algorithm with short-interval damping back at 60 seconds.
//!
//! ## Determinism
//!
//! Every function here is a pure function of its arguments and must produce
//! bit-identical results on every node, on every platform. All wide
//! arithmetic goes through 128-bit intermediates; hash values are treated
//! as little-endian 64-bit limbs regardless of host endianness.

mod difficulty;
mod error;
pub mod forks;
mod hash;
mod network;
pub mod params;
mod pow;
mod reward;
mod validation;

pub use difficulty::{
    next_difficulty, next_difficulty_for_version, next_difficulty_v2, next_difficulty_v3,
    next_difficulty_v4, target_for_version, Difficulty,
};
pub use error::{ConsensusError, ConsensusResult};
pub use forks::{version_at, ForkSchedule};
pub use hash::BlockHash;
pub use network::NetworkType;
pub use pow::check_hash;
pub use reward::{block_reward, full_reward_zone};
pub use validation::{CandidateHeader, ChainWindow, HeaderVerifier, VerifiedHeader};
