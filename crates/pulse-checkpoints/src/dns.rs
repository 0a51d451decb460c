//! DNS TXT checkpoint loader.
//!
//! Each network has a fixed set of seed domains whose TXT records carry
//! `"<decimal-height>:<64-hex-hash>"` entries. DNS is an advisory source:
//! lookups that fail or time out contribute nothing, and records that do
//! not parse are skipped one by one. Only a record that contradicts an
//! existing pin aborts the load.
//!
//! Resolution is abstracted behind [`TxtSource`] so tests can feed
//! records without touching the network; the real implementation rides
//! on `hickory-resolver`.

use crate::error::CheckpointResult;
use crate::registry::CheckpointRegistry;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use pulse_consensus::{BlockHash, NetworkType};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a single domain's TXT lookup may take.
pub const DNS_TIMEOUT: Duration = Duration::from_millis(20_000);

const MAINNET_DOMAINS: &[&str] = &[
    "checkpoints.electroneropulse.com",
    "checkpoints.electroneropulse.org",
    "checkpoints.electroneropulse.net",
    "checkpoints.electroneropulse.info",
];

const TESTNET_DOMAINS: &[&str] = &[
    "testpoints.electroneropulse.com",
    "testpoints.electroneropulse.org",
    "testpoints.electroneropulse.net",
    "testpoints.electroneropulse.info",
];

const STAGENET_DOMAINS: &[&str] = &[
    "stagenetpoints.electroneropulse.com",
    "stagenetpoints.electroneropulse.org",
    "stagenetpoints.electroneropulse.net",
    "stagenetpoints.electroneropulse.info",
];

/// Checkpoint seed domains for a network.
pub fn dns_seed_domains(network: NetworkType) -> &'static [&'static str] {
    match network {
        NetworkType::Test => TESTNET_DOMAINS,
        NetworkType::Stage => STAGENET_DOMAINS,
        NetworkType::Main | NetworkType::Fake => MAINNET_DOMAINS,
    }
}

/// A source of TXT records.
///
/// Failures are represented as an empty record set; the loader treats
/// absence of data as "nothing to add", never as an error.
#[async_trait]
pub trait TxtSource: Send + Sync {
    /// All TXT records published at `domain`.
    async fn txt_records(&self, domain: &str) -> Vec<String>;
}

/// [`TxtSource`] backed by the system resolver.
pub struct DnsTxtSource {
    resolver: TokioAsyncResolver,
}

impl DnsTxtSource {
    /// Build from the system resolver configuration, falling back to the
    /// library defaults when none is readable.
    pub fn from_system() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|err| {
            warn!(%err, "system resolver unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }
}

#[async_trait]
impl TxtSource for DnsTxtSource {
    async fn txt_records(&self, domain: &str) -> Vec<String> {
        match self.resolver.txt_lookup(domain).await {
            Ok(lookup) => lookup.iter().map(|txt| txt.to_string()).collect(),
            Err(err) => {
                debug!(domain, %err, "TXT lookup failed");
                Vec::new()
            }
        }
    }
}

/// In-memory [`TxtSource`] for tests.
#[derive(Debug, Default)]
pub struct StaticTxtSource {
    records: HashMap<String, Vec<String>>,
}

impl StaticTxtSource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `records` at `domain`.
    pub fn insert<S: AsRef<str>>(&mut self, domain: &str, records: &[S]) {
        self.records.insert(
            domain.to_string(),
            records.iter().map(|r| r.as_ref().to_string()).collect(),
        );
    }
}

#[async_trait]
impl TxtSource for StaticTxtSource {
    async fn txt_records(&self, domain: &str) -> Vec<String> {
        self.records.get(domain).cloned().unwrap_or_default()
    }
}

/// Parse one `"<height>:<hex-hash>"` record.
fn parse_record(record: &str) -> Option<(u64, BlockHash)> {
    let (height, hash) = record.split_once(':')?;
    let height = height.parse().ok()?;
    let hash = BlockHash::from_hex(hash).ok()?;
    Some((height, hash))
}

impl CheckpointRegistry {
    /// Extend the registry from the network's DNS checkpoint seeds.
    ///
    /// Every seed domain is queried with a [`DNS_TIMEOUT`] bound; domains
    /// that fail or time out are skipped. Records that do not parse are
    /// dropped individually. A record conflicting with an existing pin
    /// fails the whole load.
    pub async fn load_from_dns(
        &self,
        network: NetworkType,
        source: &dyn TxtSource,
    ) -> CheckpointResult<()> {
        let mut records = Vec::new();
        for domain in dns_seed_domains(network) {
            match tokio::time::timeout(DNS_TIMEOUT, source.txt_records(domain)).await {
                Ok(found) => records.extend(found),
                Err(_) => warn!(domain, "checkpoint TXT lookup timed out"),
            }
        }

        let mut added = 0usize;
        for record in &records {
            let Some((height, hash)) = parse_record(record) else {
                debug!(record, "skipping malformed checkpoint record");
                continue;
            };
            self.add(height, hash)?;
            added += 1;
        }
        info!(%network, added, "loaded checkpoints from DNS");
        Ok(())
    }

    /// Bootstrap the registry's external sources: the JSON file if one is
    /// configured, then DNS if enabled.
    pub async fn load_external(
        &self,
        json_path: Option<&std::path::Path>,
        network: NetworkType,
        dns: Option<&dyn TxtSource>,
    ) -> CheckpointResult<()> {
        if let Some(path) = json_path {
            self.load_from_json(path)?;
        }
        if let Some(source) = dns {
            self.load_from_dns(network, source).await?;
        }
        Ok(())
    }
}
