//! Error types for consensus validation.

use thiserror::Error;

/// Consensus validation errors.
#[derive(Error, Debug)]
pub enum ConsensusError {
    /// Block exceeds twice the effective median size.
    #[error("block size {current} is too big, expected less than {limit}")]
    BlockTooLarge { current: u64, limit: u64 },

    /// Proof-of-Work hash does not meet the required difficulty.
    #[error("proof of work at height {height} does not meet difficulty {difficulty}")]
    ProofOfWorkFailed { height: u64, difficulty: u64 },

    /// Timestamp and cumulative-difficulty windows differ in length.
    #[error("difficulty window mismatch: {timestamps} timestamps vs {difficulties} cumulative difficulties")]
    WindowMismatch {
        timestamps: usize,
        difficulties: usize,
    },

    /// A hash string could not be parsed as 32 hex-encoded bytes.
    #[error("invalid block hash: {0}")]
    InvalidHash(String),
}

/// Result type for consensus operations.
pub type ConsensusResult<T> = Result<T, ConsensusError>;
