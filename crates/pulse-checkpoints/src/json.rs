//! JSON checkpoint file loader.
//!
//! The file is a single object with a `hashlines` list of
//! `{ "height": <u64>, "hash": "<64-hex>" }` records. Unknown top-level
//! keys are ignored. A missing file is fine; a present-but-broken file is
//! not.

use crate::error::{CheckpointError, CheckpointResult};
use crate::registry::CheckpointRegistry;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct HashLine {
    height: u64,
    hash: String,
}

#[derive(Debug, Default, Deserialize)]
struct HashFile {
    #[serde(default)]
    hashlines: Vec<HashLine>,
}

impl CheckpointRegistry {
    /// Extend the registry from a JSON checkpoint file.
    ///
    /// Entries at or below the highest pin present *before* the load are
    /// skipped; the file can only extend the chain of pins, never rewrite
    /// history below it.
    pub fn load_from_json(&self, path: impl AsRef<Path>) -> CheckpointResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "checkpoint file not found");
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: HashFile =
            serde_json::from_str(&content).map_err(|source| CheckpointError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let prev_max_height = self.max_pinned_height();
        let mut added = 0usize;
        for line in &file.hashlines {
            if line.height <= prev_max_height {
                debug!(height = line.height, "ignoring checkpoint below known maximum");
                continue;
            }
            self.add_hex(line.height, &line.hash)?;
            added += 1;
        }
        info!(
            path = %path.display(),
            added,
            "loaded checkpoints from file"
        );
        Ok(())
    }
}
