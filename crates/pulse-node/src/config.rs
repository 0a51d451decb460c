//! Node configuration.

use crate::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node name.
    pub node_name: String,
    /// Network (mainnet, testnet, stagenet).
    pub network: String,
    /// Data directory.
    pub data_dir: PathBuf,
    /// Checkpoint configuration.
    #[serde(default)]
    pub checkpoints: CheckpointConfig,
}

/// Checkpoint bootstrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Optional JSON checkpoint file, resolved against the data dir when
    /// relative.
    pub json_file: Option<PathBuf>,
    /// Query the DNS checkpoint seeds at startup.
    #[serde(default = "default_true")]
    pub dns: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            json_file: None,
            dns: true,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_name: "pulse-node".to_string(),
            network: "mainnet".to_string(),
            data_dir: PathBuf::from("data"),
            checkpoints: CheckpointConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from file and CLI args.
    pub fn load(config_path: &Path, args: &Args) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content =
                std::fs::read_to_string(config_path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        // Override with CLI args
        config.network = args.network.clone();

        if let Some(ref data_dir) = args.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(ref json) = args.checkpoint_json {
            config.checkpoints.json_file = Some(json.clone());
        }
        if args.disable_dns_checkpoints {
            config.checkpoints.dns = false;
        }

        Ok(config)
    }

    /// The JSON checkpoint file path, resolved against the data dir.
    pub fn checkpoint_json_path(&self) -> Option<PathBuf> {
        self.checkpoints.json_file.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.data_dir.join(p)
            }
        })
    }
}
