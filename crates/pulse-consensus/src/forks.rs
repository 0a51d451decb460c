//! Hard-fork schedule.
//!
//! Every consensus decision that differs by epoch — emission, difficulty
//! algorithm, reward zone size — is driven from the activation tables in
//! this module. Nothing else in the tree hard-codes a fork height.

use crate::network::NetworkType;

/// Height at which protocol v7 activated (mainnet).
pub const V7_ACTIVATION_HEIGHT: u64 = 307_003;

/// Height at which protocol v10 activated (mainnet).
pub const V10_ACTIVATION_HEIGHT: u64 = 310_790;

/// Height at which protocol v14 activated (mainnet).
pub const V14_ACTIVATION_HEIGHT: u64 = 337_816;

/// Height at which protocol v16 activated (mainnet).
pub const V16_ACTIVATION_HEIGHT: u64 = 500_060;

/// Height at which protocol v17 activated (mainnet).
pub const V17_ACTIVATION_HEIGHT: u64 = 570_000;

/// Height at which protocol v18 activated (mainnet).
pub const V18_ACTIVATION_HEIGHT: u64 = 659_000;

/// Height at which protocol v19 activated (mainnet).
pub const V19_ACTIVATION_HEIGHT: u64 = 739_800;

/// Height at which protocol v20 activated (mainnet).
pub const V20_ACTIVATION_HEIGHT: u64 = 1_132_596;

/// Emission switchover one block after the v20 activation (mainnet).
///
/// Not a protocol version of its own; the supply table and the parking
/// injection key off this height.
pub const V20_B_ACTIVATION_HEIGHT: u64 = 1_132_597;

/// Height at which protocol v21 activated (mainnet).
pub const V21_ACTIVATION_HEIGHT: u64 = 1_132_900;

/// Height at which protocol v22 activated (mainnet).
pub const V22_ACTIVATION_HEIGHT: u64 = 1_132_935;

/// Height at which protocol v23 activated (mainnet).
pub const V23_ACTIVATION_HEIGHT: u64 = 1_183_409;

/// Emission soft fork after v23 (mainnet). Not a protocol version.
pub const V23_B_ACTIVATION_HEIGHT: u64 = 1_183_485;

/// `(version, activation height)` pairs, ascending by height.
///
/// Versions 2..6 never activated independently; the chain jumped from the
/// launch rules straight to v7.
const MAINNET_FORKS: &[(u8, u64)] = &[
    (1, 1),
    (7, V7_ACTIVATION_HEIGHT),
    (8, 307_054),
    (9, 308_110),
    (10, V10_ACTIVATION_HEIGHT),
    (11, 310_860),
    (12, 333_690),
    (13, 337_496),
    (14, V14_ACTIVATION_HEIGHT),
    (15, 337_838),
    (16, V16_ACTIVATION_HEIGHT),
    (17, V17_ACTIVATION_HEIGHT),
    (18, V18_ACTIVATION_HEIGHT),
    (19, V19_ACTIVATION_HEIGHT),
    (20, V20_ACTIVATION_HEIGHT),
    (21, V21_ACTIVATION_HEIGHT),
    (22, V22_ACTIVATION_HEIGHT),
    (23, V23_ACTIVATION_HEIGHT),
];

/// Testnet forked in lockstep with mainnet up to v15, then took v16 early.
/// The table ends there; later versions never shipped to testnet.
const TESTNET_FORKS: &[(u8, u64)] = &[
    (1, 1),
    (7, 307_003),
    (8, 307_054),
    (9, 308_110),
    (10, 310_790),
    (11, 310_860),
    (12, 333_690),
    (13, 337_496),
    (14, 337_816),
    (15, 337_838),
    (16, 492_500),
];

const STAGENET_FORKS: &[(u8, u64)] = &[
    (1, 1),
    (7, 307_003),
    (8, 307_054),
    (9, 308_110),
    (10, 310_790),
    (11, 310_860),
    (12, 333_690),
    (13, 337_496),
    (14, 337_816),
    (15, 337_838),
    (16, 492_500),
    (17, 492_530),
    (18, 492_540),
];

/// The activation table for one network.
#[derive(Debug, Clone, Copy)]
pub struct ForkSchedule {
    forks: &'static [(u8, u64)],
}

impl ForkSchedule {
    /// The schedule for the given network.
    ///
    /// `Fake` chains follow the mainnet table.
    pub fn for_network(network: NetworkType) -> Self {
        let forks = match network {
            NetworkType::Main | NetworkType::Fake => MAINNET_FORKS,
            NetworkType::Test => TESTNET_FORKS,
            NetworkType::Stage => STAGENET_FORKS,
        };
        Self { forks }
    }

    /// Protocol version in force at `height`: the highest version whose
    /// activation height is at or below it. Heights before the first entry
    /// are version 1.
    pub fn version_at(&self, height: u64) -> u8 {
        self.forks
            .iter()
            .rev()
            .find(|(_, activation)| *activation <= height)
            .map(|(version, _)| *version)
            .unwrap_or(1)
    }

    /// Activation height of `version`, if it ever activated on this network.
    pub fn activation_height(&self, version: u8) -> Option<u64> {
        self.forks
            .iter()
            .find(|(v, _)| *v == version)
            .map(|(_, height)| *height)
    }

    /// The highest version this network ever activates.
    pub fn max_version(&self) -> u8 {
        self.forks.last().map(|(v, _)| *v).unwrap_or(1)
    }
}

/// Protocol version in force at `height` on `network`.
pub fn version_at(network: NetworkType, height: u64) -> u8 {
    ForkSchedule::for_network(network).version_at(height)
}
