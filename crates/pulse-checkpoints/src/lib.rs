//! # pulse-checkpoints
//!
//! Checkpoint registry for the Pulse blockchain.
//!
//! A checkpoint pins the block hash the chain must carry at a given
//! height. The registry is seeded from a built-in per-network table at
//! startup, optionally extended from a JSON file and from DNS TXT
//! records, and is frozen afterwards. Besides validating pinned heights
//! it bounds reorg depth: once a checkpoint is buried under the chain
//! tip, alternative chains may not fork below it.
//!
//! The built-in table is authoritative. The JSON file and DNS records are
//! advisory sources: a missing file or an unreachable resolver leaves the
//! registry as it was, but a record that *contradicts* an existing pin is
//! a hard error — two honest sources can never disagree about a pinned
//! hash.

mod defaults;
mod dns;
mod error;
mod json;
mod registry;

pub use dns::{dns_seed_domains, DnsTxtSource, StaticTxtSource, TxtSource, DNS_TIMEOUT};
pub use error::{CheckpointError, CheckpointResult};
pub use registry::{CheckpointRegistry, CheckpointVerdict};
