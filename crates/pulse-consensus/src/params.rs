//! Chain parameters.
//!
//! Consensus-critical constants shared by the difficulty engine and the
//! emission schedule. These are fixed for the lifetime of the chain; a
//! change to any value here is a hard fork.

/// Number of atomic units in one coin.
pub const COIN: u64 = 100_000_000;

/// Supply cap of the original ETN-era chain, in atomic units.
pub const MONEY_SUPPLY_ETN: u64 = 2_100_000_000_000;

/// Supply cap after the first token fork (versions 7..9).
pub const MONEY_SUPPLY: u64 = 21_000_000_000_000;

/// Supply cap after the coin burn (versions 10..15).
pub const TOKENS: u64 = 20_000_000_000_000;

/// Supply cap after the token migration (version 16 until the v20 fork height).
pub const ELECTRONERO_TOKENS: u64 = 3_610_309_000_000_000;

/// Supply cap of the Pulse era (v20 fork height until the v23_b fork height).
///
/// Exceeds every earlier cap plus the height-1132597 injection so the
/// remaining-supply subtraction stays positive through the transition.
pub const ELECTRONERO_PULSE: u64 = 4_000_000_000_000_000_000;

/// Supply cap after the v23_b soft fork.
pub const ELECTRONERO_COINS: u64 = 9_000_000_000_000_000_000;

/// Base right-shift applied to remaining supply per one-minute target.
pub const EMISSION_SPEED_FACTOR_PER_MINUTE: i64 = 20;

/// Tail-emission subsidy paid once the cap is reached (one coin).
pub const FINAL_SUBSIDY_PER_MINUTE: u64 = 100_000_000;

/// Base rewards below this switch to the tail subsidy when the cap is hit.
pub const FINAL_SUBSIDY_THRESHOLD: u64 = 666;

/// Base reward is floored to a multiple of this after version 7.
pub const BASE_REWARD_ROUND_FACTOR: u64 = 10;

/// Block reward granted in full below this size, before the first fork.
pub const FULL_REWARD_ZONE_V1: u64 = 20_000;

/// Full reward zone for versions 2..4.
pub const FULL_REWARD_ZONE_V2: u64 = 60_000;

/// Full reward zone from version 5 onward.
pub const FULL_REWARD_ZONE_V5: u64 = 300_000;

/// Hard upper bound on serialized block size.
pub const MAX_BLOCK_SIZE: u64 = 500_000_000;

/// Hard upper bound on serialized transaction size.
pub const MAX_TX_SIZE: u64 = 1_000_000_000;

/// Block target in seconds before the first fork and from version 14 on.
pub const DIFFICULTY_TARGET_V1: u64 = 60;

/// Block target in seconds for versions 7..13.
pub const DIFFICULTY_TARGET_V2: u64 = 120;

/// Retarget window for the classic algorithm, in blocks.
pub const DIFFICULTY_WINDOW: usize = 720;

/// Timestamps cut from each end of the sorted classic window.
pub const DIFFICULTY_CUT: usize = 60;

/// Most recent blocks excluded from the classic window.
pub const DIFFICULTY_LAG: usize = 15;

/// Blocks the caller supplies for the classic algorithms.
pub const DIFFICULTY_BLOCKS_COUNT: usize = DIFFICULTY_WINDOW + DIFFICULTY_LAG;

/// Retarget window for the LWMA and weighted-timespan algorithms.
pub const DIFFICULTY_WINDOW_V2: usize = 70;

/// Months between emission-speed changes during the percentage era.
pub const COIN_EMISSION_MONTH_INTERVAL: u64 = 6;

/// Blocks between emission-speed changes: six months of 120-second blocks
/// (30.4375 days per month).
pub const COIN_EMISSION_HEIGHT_INTERVAL: u64 = 131_490;

/// Year at which emission peaks.
pub const PEAK_COIN_EMISSION_YEAR: u64 = 4;

/// Height of peak emission: four years of 120-second blocks.
pub const PEAK_COIN_EMISSION_HEIGHT: u64 = 1_051_920;
