//! Pulse Node - consensus core for the Pulse blockchain.
//!
//! This binary bootstraps the consensus context: logging, configuration,
//! and the checkpoint registry (built-in pins, JSON file, DNS seeds).

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod node;

use config::NodeConfig;
use node::Node;

/// Pulse blockchain node.
#[derive(Parser, Debug)]
#[command(name = "pulse-node")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "pulse-node.toml")]
    config: PathBuf,

    /// Data directory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Network to connect to
    #[arg(short, long, default_value = "mainnet")]
    network: String,

    /// JSON checkpoint file to load at startup
    #[arg(long)]
    checkpoint_json: Option<PathBuf>,

    /// Skip the DNS checkpoint seeds
    #[arg(long)]
    disable_dns_checkpoints: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Pulse Node v{}", env!("CARGO_PKG_VERSION"));

    let config = NodeConfig::load(&args.config, &args)?;
    info!("Network: {}", config.network);
    info!("Data directory: {:?}", config.data_dir);

    let node = Node::new(&config).await?;

    info!(
        "Consensus context ready: {} checkpoints, highest pin at {}",
        node.checkpoints().len(),
        node.checkpoints().max_pinned_height()
    );

    Ok(())
}
