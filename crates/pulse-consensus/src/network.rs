//! Network selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The networks a node can run against.
///
/// `Fake` exists for test harnesses only; it follows mainnet consensus
/// tables but is never announced on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// The production network.
    Main,
    /// The public test network.
    Test,
    /// The staging network (release rehearsals).
    Stage,
    /// In-process test chains.
    Fake,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkType::Main => "mainnet",
            NetworkType::Test => "testnet",
            NetworkType::Stage => "stagenet",
            NetworkType::Fake => "fakechain",
        };
        f.write_str(name)
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(NetworkType::Main),
            "test" | "testnet" => Ok(NetworkType::Test),
            "stage" | "stagenet" => Ok(NetworkType::Stage),
            "fake" | "fakechain" => Ok(NetworkType::Fake),
            other => Err(format!("unknown network: {other}")),
        }
    }
}
