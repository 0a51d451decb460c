//! Error types for checkpoint handling.

use pulse_consensus::{BlockHash, ConsensusError};
use std::path::PathBuf;
use thiserror::Error;

/// Checkpoint errors.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// A different hash is already pinned at this height.
    #[error("checkpoint at height {height} already exists with a different hash")]
    Conflicting { height: u64 },

    /// A block's hash disagrees with the pin at its height.
    #[error("checkpoint failed for height {height}: expected {expected}, got {got}")]
    Mismatch {
        height: u64,
        expected: BlockHash,
        got: BlockHash,
    },

    /// A checkpoint file exists but could not be read.
    #[error("failed to read checkpoint file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A checkpoint file exists but is not valid JSON.
    #[error("failed to parse checkpoint file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A hash string in an authoritative source failed to parse.
    #[error(transparent)]
    InvalidHash(#[from] ConsensusError),
}

/// Result type for checkpoint operations.
pub type CheckpointResult<T> = Result<T, CheckpointError>;
