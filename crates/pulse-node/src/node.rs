//! Node assembly.
//!
//! Wires the consensus verifier and the checkpoint registry together and
//! owns the startup sequence: seed the built-in pins, extend them from
//! the JSON file, then from DNS. The registry is frozen once `Node::new`
//! returns; everything after that is read-only.

use crate::config::NodeConfig;
use anyhow::{Context, Result};
use pulse_checkpoints::{CheckpointRegistry, CheckpointVerdict, DnsTxtSource, TxtSource};
use pulse_consensus::{
    CandidateHeader, ChainWindow, HeaderVerifier, NetworkType, VerifiedHeader,
};
use std::sync::Arc;
use tracing::{debug, info};

/// A running node's consensus context.
pub struct Node {
    network: NetworkType,
    verifier: HeaderVerifier,
    checkpoints: Arc<CheckpointRegistry>,
}

impl Node {
    /// Bootstrap a node from its configuration.
    pub async fn new(config: &NodeConfig) -> Result<Self> {
        let network: NetworkType = config
            .network
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        let checkpoints = CheckpointRegistry::for_network(network)
            .context("Failed to seed built-in checkpoints")?;
        info!(
            %network,
            pins = checkpoints.len(),
            "seeded built-in checkpoints"
        );

        if let Some(path) = config.checkpoint_json_path() {
            checkpoints
                .load_from_json(&path)
                .context("Failed to load checkpoint file")?;
        }

        if config.checkpoints.dns {
            let source = DnsTxtSource::from_system();
            checkpoints
                .load_from_dns(network, &source)
                .await
                .context("Failed to load DNS checkpoints")?;
        }

        info!(
            pins = checkpoints.len(),
            max_height = checkpoints.max_pinned_height(),
            "checkpoint registry ready"
        );

        Ok(Self {
            network,
            verifier: HeaderVerifier::new(network),
            checkpoints: Arc::new(checkpoints),
        })
    }

    /// Bootstrap with an explicit TXT source (tests, alternate resolvers).
    pub async fn with_txt_source(config: &NodeConfig, source: &dyn TxtSource) -> Result<Self> {
        let network: NetworkType = config
            .network
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let checkpoints = CheckpointRegistry::for_network(network)?;
        checkpoints
            .load_external(
                config.checkpoint_json_path().as_deref(),
                network,
                Some(source),
            )
            .await?;
        Ok(Self {
            network,
            verifier: HeaderVerifier::new(network),
            checkpoints: Arc::new(checkpoints),
        })
    }

    /// The network this node runs on.
    pub fn network(&self) -> NetworkType {
        self.network
    }

    /// The checkpoint registry.
    pub fn checkpoints(&self) -> &CheckpointRegistry {
        &self.checkpoints
    }

    /// Run the full consensus pass over one candidate block: version,
    /// difficulty, PoW, reward, then the checkpoint cross-check.
    pub fn verify_block(
        &self,
        candidate: &CandidateHeader,
        window: &ChainWindow<'_>,
    ) -> Result<VerifiedHeader> {
        let verified = self.verifier.verify(candidate, window)?;

        match self
            .checkpoints
            .check_block(candidate.height, &candidate.block_hash)?
        {
            CheckpointVerdict::Matched => {
                debug!(height = candidate.height, "candidate matches checkpoint")
            }
            CheckpointVerdict::NotPinned => {}
        }

        Ok(verified)
    }

    /// Whether a reorg to `candidate_height` is permitted at the current
    /// `chain_tip`.
    pub fn is_alternative_allowed(&self, chain_tip: u64, candidate_height: u64) -> bool {
        self.checkpoints
            .is_alternative_allowed(chain_tip, candidate_height)
    }
}
