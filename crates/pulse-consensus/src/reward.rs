//! Block reward and emission schedule.
//!
//! The subsidy for a block is a function of the supply cap in force, the
//! coins already generated, the protocol version, the height, and the
//! block's size relative to the recent median. The supply cap and the
//! emission speed changed repeatedly over the chain's fork history; the
//! branch heights are the named mainnet activation heights (the emission
//! schedule never diverged per network).
//!
//! A handful of heights pay a fixed, size-independent reward: the genesis
//! grant, two community airdrops, the token-migration grants and the
//! parking grant. Those are checked before any of the formula machinery
//! and short-circuit it entirely.

use crate::error::{ConsensusError, ConsensusResult};
use crate::forks::{
    V10_ACTIVATION_HEIGHT, V14_ACTIVATION_HEIGHT, V16_ACTIVATION_HEIGHT, V17_ACTIVATION_HEIGHT,
    V18_ACTIVATION_HEIGHT, V19_ACTIVATION_HEIGHT, V20_ACTIVATION_HEIGHT, V20_B_ACTIVATION_HEIGHT,
    V21_ACTIVATION_HEIGHT, V22_ACTIVATION_HEIGHT, V23_ACTIVATION_HEIGHT, V23_B_ACTIVATION_HEIGHT,
    V7_ACTIVATION_HEIGHT,
};
use crate::params::{
    BASE_REWARD_ROUND_FACTOR, COIN_EMISSION_HEIGHT_INTERVAL, DIFFICULTY_TARGET_V1,
    DIFFICULTY_TARGET_V2, ELECTRONERO_COINS, ELECTRONERO_PULSE, ELECTRONERO_TOKENS,
    EMISSION_SPEED_FACTOR_PER_MINUTE, FINAL_SUBSIDY_PER_MINUTE, FINAL_SUBSIDY_THRESHOLD,
    FULL_REWARD_ZONE_V1, FULL_REWARD_ZONE_V2, FULL_REWARD_ZONE_V5, MONEY_SUPPLY,
    MONEY_SUPPLY_ETN, PEAK_COIN_EMISSION_HEIGHT, TOKENS,
};
use tracing::warn;

/// Reward paid at height 1 (the genesis grant).
const GENESIS_GRANT: u64 = 1_260_000_000_000;

/// Reward paid at the two community airdrop heights.
const COMMUNITY_AIRDROP_GRANT: u64 = GENESIS_GRANT;

/// Reward paid at the token-migration heights.
const MIGRATION_GRANT: u64 = 613_090_000_000_000;

/// Reward paid at the parking-chain grant height.
const PARKING_GRANT: u64 = 3_333_333_333_310_301_990;

/// Size threshold below which a block earns its full subsidy.
///
/// Grows across the fork history; above twice the effective threshold a
/// block is invalid outright.
pub fn full_reward_zone(version: u8) -> u64 {
    if version < 2 {
        FULL_REWARD_ZONE_V1
    } else if version < 5 {
        FULL_REWARD_ZONE_V2
    } else {
        FULL_REWARD_ZONE_V5
    }
}

/// Fixed grants that bypass the emission formula entirely.
fn fixed_grant(height: u64) -> Option<u64> {
    match height {
        1 => Some(GENESIS_GRANT),
        V7_ACTIVATION_HEIGHT | V10_ACTIVATION_HEIGHT => Some(COMMUNITY_AIRDROP_GRANT),
        V16_ACTIVATION_HEIGHT | 1_183_410..=1_183_413 => Some(MIGRATION_GRANT),
        V20_B_ACTIVATION_HEIGHT => Some(PARKING_GRANT),
        _ => None,
    }
}

/// Supply cap in force for a block, keyed by version while the legacy
/// table applied and by height afterwards.
fn coin_supply(version: u8, height: u64) -> u64 {
    let legacy = if version < 7 {
        MONEY_SUPPLY_ETN
    } else if version < 10 {
        MONEY_SUPPLY
    } else if version < 16 {
        TOKENS
    } else {
        ELECTRONERO_TOKENS
    };

    if height < V20_ACTIVATION_HEIGHT {
        legacy
    } else if height < V23_B_ACTIVATION_HEIGHT {
        ELECTRONERO_PULSE
    } else {
        ELECTRONERO_COINS
    }
}

/// Target spacing the emission schedule assumes at a height. The first
/// fork moved it to two minutes; v14 moved it back.
fn emission_target_seconds(height: u64) -> u64 {
    if height < V7_ACTIVATION_HEIGHT || height >= V14_ACTIVATION_HEIGHT {
        DIFFICULTY_TARGET_V1
    } else {
        DIFFICULTY_TARGET_V2
    }
}

/// Right-shift applied to the remaining supply at a height.
///
/// Each era adds or subtracts a small offset from the per-minute base of
/// 20, scaled by the target in minutes.
fn emission_speed_factor(height: u64) -> u32 {
    let target_minutes = (emission_target_seconds(height) / 60) as i64;
    let base = EMISSION_SPEED_FACTOR_PER_MINUTE;

    let factor = if height < V7_ACTIVATION_HEIGHT {
        base - (target_minutes - 1)
    } else if height < V10_ACTIVATION_HEIGHT {
        base + (target_minutes - 1)
    } else if height < V16_ACTIVATION_HEIGHT {
        base + (target_minutes - 2)
    } else if height < V17_ACTIVATION_HEIGHT {
        base - (target_minutes - 1)
    } else if height < V18_ACTIVATION_HEIGHT {
        base + (target_minutes + 1)
    } else if height < V19_ACTIVATION_HEIGHT {
        base + (target_minutes + 9)
    } else if height < V20_ACTIVATION_HEIGHT {
        base + (target_minutes + 6)
    } else if height < V21_ACTIVATION_HEIGHT {
        base + (target_minutes + 9)
    } else if height < V22_ACTIVATION_HEIGHT {
        base + (target_minutes + 7)
    } else if height < V23_ACTIVATION_HEIGHT {
        base + (target_minutes + 9)
    } else if height < V23_B_ACTIVATION_HEIGHT {
        base + (target_minutes + 8)
    } else {
        base - (target_minutes - 3)
    };
    factor as u32
}

/// Fraction of the supply cap emitted during the percentage era, as a
/// function of the elapsed emission intervals.
fn supply_fraction(height: u64) -> f64 {
    let interval = (height / COIN_EMISSION_HEIGHT_INTERVAL) as f64;
    0.1888 + interval * (0.023 + interval * 0.0032)
}

/// Compute the coinbase reward for a block.
///
/// `median_size` is the median of recent block sizes, `current_size` the
/// candidate's own size; both must be below 2^32. Returns
/// [`ConsensusError::BlockTooLarge`] when the candidate exceeds twice the
/// effective median, which rejects the block outright.
pub fn block_reward(
    median_size: u64,
    current_size: u64,
    already_generated: u64,
    version: u8,
    height: u64,
) -> ConsensusResult<u64> {
    if let Some(grant) = fixed_grant(height) {
        return Ok(grant);
    }

    let supply = coin_supply(version, height);
    let speed = emission_speed_factor(height);

    let mut base_reward = if height > V7_ACTIVATION_HEIGHT
        && version >= 7
        && height < PEAK_COIN_EMISSION_HEIGHT + COIN_EMISSION_HEIGHT_INTERVAL
    {
        ((supply as f64 * supply_fraction(height)) as u64) >> speed
    } else {
        supply.saturating_sub(already_generated) >> speed
    };

    if version > 7 {
        base_reward = base_reward / BASE_REWARD_ROUND_FACTOR * BASE_REWARD_ROUND_FACTOR;
    }
    if version < 2 {
        base_reward = MONEY_SUPPLY_ETN.saturating_sub(already_generated) >> speed;
    }

    if base_reward < FINAL_SUBSIDY_THRESHOLD && already_generated >= supply {
        base_reward = FINAL_SUBSIDY_PER_MINUTE;
    }

    let median_size = median_size.max(full_reward_zone(version));

    if current_size <= median_size {
        return Ok(base_reward);
    }
    if current_size > 2 * median_size {
        warn!(
            current = current_size,
            limit = 2 * median_size,
            "block cumulative size is too big"
        );
        return Err(ConsensusError::BlockTooLarge {
            current: current_size,
            limit: 2 * median_size,
        });
    }

    // Quadratic penalty: base * (2M - size) * size / M^2, exact in 128 bits.
    let multiplicand = u128::from(2 * median_size - current_size) * u128::from(current_size);
    let product = u128::from(base_reward) * multiplicand;
    let reward = product / u128::from(median_size) / u128::from(median_size);

    debug_assert!(reward <= u128::from(base_reward));
    Ok(reward as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_grant() {
        // Size and supply inputs are irrelevant at the grant heights.
        assert_eq!(block_reward(0, 0, 0, 1, 1).unwrap(), 1_260_000_000_000);
        assert_eq!(
            block_reward(60_000, 1_000_000, u64::MAX, 23, 1).unwrap(),
            1_260_000_000_000
        );
    }

    #[test]
    fn test_airdrop_grants() {
        assert_eq!(
            block_reward(0, 0, 0, 7, 307_003).unwrap(),
            1_260_000_000_000
        );
        assert_eq!(
            block_reward(0, 0, 0, 10, 310_790).unwrap(),
            1_260_000_000_000
        );
    }

    #[test]
    fn test_migration_grants() {
        for height in [500_060, 1_183_410, 1_183_411, 1_183_412, 1_183_413] {
            assert_eq!(
                block_reward(0, 0, 0, 16, height).unwrap(),
                613_090_000_000_000,
                "height {height}"
            );
        }
        // The heights around the late-migration run are not grants.
        assert_ne!(
            block_reward(0, 0, 0, 23, 1_183_414).unwrap(),
            613_090_000_000_000
        );
    }

    #[test]
    fn test_parking_grant() {
        assert_eq!(
            block_reward(0, 0, 0, 20, 1_132_597).unwrap(),
            3_333_333_333_310_301_990
        );
    }

    #[test]
    fn test_launch_era_reward() {
        // Version 1, height 2: plain shift of the remaining ETN supply at
        // factor 20, then the legacy recompute (same value).
        let reward = block_reward(0, 0, 0, 1, 2).unwrap();
        assert_eq!(reward, MONEY_SUPPLY_ETN >> 20);
    }

    #[test]
    fn test_launch_era_reward_shrinks_with_generation() {
        let fresh = block_reward(0, 0, 0, 1, 2).unwrap();
        let later = block_reward(0, 0, MONEY_SUPPLY_ETN / 2, 1, 2).unwrap();
        assert_eq!(later, (MONEY_SUPPLY_ETN - MONEY_SUPPLY_ETN / 2) >> 20);
        assert!(later < fresh);
    }

    #[test]
    fn test_percentage_era_reward() {
        // Height 307_100, version 7: two emission intervals elapsed.
        let height = 307_100u64;
        let interval = height / COIN_EMISSION_HEIGHT_INTERVAL;
        assert_eq!(interval, 2);
        let pct = 0.1888 + 2.0 * (0.023 + 2.0 * 0.0032);
        let expected = ((MONEY_SUPPLY as f64 * pct) as u64) >> 21;
        assert_eq!(block_reward(60_000, 60_000, 0, 7, height).unwrap(), expected);
    }

    #[test]
    fn test_percentage_era_ignores_generated_supply() {
        // During the percentage era the subsidy is a function of the cap,
        // not of what has been generated so far.
        let a = block_reward(0, 0, 0, 8, 320_000).unwrap();
        let b = block_reward(0, 0, TOKENS / 3, 8, 320_000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rounding_applies_after_version_7() {
        let reward = block_reward(0, 0, 0, 8, 320_000).unwrap();
        assert_eq!(reward % 10, 0);
    }

    #[test]
    fn test_shift_era_resumes_past_peak() {
        // Past the peak-emission cutoff (and past the v23_b switch) the
        // reward returns to the shift of remaining supply.
        let height = 1_183_500u64;
        assert!(height > PEAK_COIN_EMISSION_HEIGHT + COIN_EMISSION_HEIGHT_INTERVAL);
        assert!(height > V23_B_ACTIVATION_HEIGHT);
        let generated = 4_000_000_000_000_000_000u64;
        let speed = 20 - (1 - 3); // 22 at this height
        let raw = (ELECTRONERO_COINS - generated) >> speed;
        let expected = raw / 10 * 10;
        assert_eq!(
            block_reward(0, 0, generated, 23, height).unwrap(),
            expected
        );
    }

    #[test]
    fn test_emission_speed_factor_ladder() {
        // One representative height per era; targets are 60s outside the
        // [v7, v14) span, 120s inside it.
        assert_eq!(emission_speed_factor(100), 20); // 20 - (1-1)
        assert_eq!(emission_speed_factor(308_000), 21); // 20 + (2-1)
        assert_eq!(emission_speed_factor(320_000), 20); // 20 + (2-2)
        assert_eq!(emission_speed_factor(400_000), 19); // 20 + (1-2), past v14
        assert_eq!(emission_speed_factor(500_060), 20); // 20 - (1-1)
        assert_eq!(emission_speed_factor(570_000), 22); // 20 + (1+1)
        assert_eq!(emission_speed_factor(659_000), 30); // 20 + (1+9)
        assert_eq!(emission_speed_factor(739_800), 27); // 20 + (1+6)
        assert_eq!(emission_speed_factor(1_132_596), 30);
        assert_eq!(emission_speed_factor(1_132_900), 28);
        assert_eq!(emission_speed_factor(1_132_935), 30);
        assert_eq!(emission_speed_factor(1_183_409), 29);
        assert_eq!(emission_speed_factor(1_183_485), 22); // 20 - (1-3)
    }

    #[test]
    fn test_tail_emission() {
        // Cap reached and the shifted remainder under the threshold: the
        // flat final subsidy takes over. Past-peak height keeps us out of
        // the percentage era.
        let height = 1_183_500u64;
        let reward = block_reward(0, 0, ELECTRONERO_COINS, 23, height).unwrap();
        assert_eq!(reward, FINAL_SUBSIDY_PER_MINUTE);
    }

    #[test]
    fn test_no_tail_before_cap() {
        // Remainder small but cap not reached: tiny reward, no tail.
        let height = 1_183_500u64;
        let generated = ELECTRONERO_COINS - 1000;
        let reward = block_reward(0, 0, generated, 23, height).unwrap();
        assert_eq!(reward, 0); // 1000 >> 22, floored to a multiple of 10
    }

    #[test]
    fn test_full_reward_zone_by_version() {
        assert_eq!(full_reward_zone(1), 20_000);
        assert_eq!(full_reward_zone(2), 60_000);
        assert_eq!(full_reward_zone(4), 60_000);
        assert_eq!(full_reward_zone(5), 300_000);
        assert_eq!(full_reward_zone(23), 300_000);
    }

    #[test]
    fn test_small_blocks_earn_full_reward() {
        // Anything at or below the effective median (here the zone floor)
        // earns the whole subsidy.
        let full = block_reward(0, 0, 0, 8, 320_000).unwrap();
        for size in [0, 1, 150_000, 300_000] {
            assert_eq!(block_reward(0, size, 0, 8, 320_000).unwrap(), full);
        }
    }

    #[test]
    fn test_penalty_is_quadratic_and_capped() {
        let median = 400_000u64;
        let full = block_reward(median, median, 0, 8, 320_000).unwrap();

        // Above the median the reward strictly decreases...
        let at_125 = block_reward(median, median * 5 / 4, 0, 8, 320_000).unwrap();
        let at_150 = block_reward(median, median * 3 / 2, 0, 8, 320_000).unwrap();
        assert!(at_125 < full);
        assert!(at_150 < at_125);

        // ...hits zero exactly at twice the median...
        assert_eq!(block_reward(median, 2 * median, 0, 8, 320_000).unwrap(), 0);

        // ...and anything beyond is rejected.
        let err = block_reward(median, 2 * median + 1, 0, 8, 320_000).unwrap_err();
        assert!(matches!(err, ConsensusError::BlockTooLarge { .. }));
    }

    #[test]
    fn test_penalty_exact_value() {
        // size = 1.5 * median: reward = base * (2M - 1.5M) * 1.5M / M^2
        //                             = base * 0.75
        let median = 400_000u64;
        let base = block_reward(median, 0, 0, 8, 320_000).unwrap();
        let penalized = block_reward(median, 600_000, 0, 8, 320_000).unwrap();
        assert_eq!(penalized, (u128::from(base) * 3 / 4) as u64);
    }

    #[test]
    fn test_median_floored_at_zone() {
        // A median below the full reward zone is lifted to the zone, so a
        // zone-sized block still earns in full.
        let full = block_reward(10, 300_000, 0, 8, 320_000).unwrap();
        assert_eq!(full, block_reward(10, 0, 0, 8, 320_000).unwrap());
        // And the too-big bound tracks the zone, not the raw median.
        assert!(block_reward(10, 600_001, 0, 8, 320_000).is_err());
    }

    #[test]
    fn test_supply_cap_switches_by_height() {
        assert_eq!(coin_supply(7, 100), MONEY_SUPPLY);
        assert_eq!(coin_supply(10, 100), TOKENS);
        assert_eq!(coin_supply(16, 100), ELECTRONERO_TOKENS);
        assert_eq!(coin_supply(16, V20_ACTIVATION_HEIGHT), ELECTRONERO_PULSE);
        assert_eq!(coin_supply(23, V23_B_ACTIVATION_HEIGHT), ELECTRONERO_COINS);
        assert_eq!(
            coin_supply(23, V23_B_ACTIVATION_HEIGHT - 1),
            ELECTRONERO_PULSE
        );
    }

    #[test]
    fn test_over_generation_saturates() {
        // Generated beyond the cap (possible across a supply-table step
        // down): the remainder saturates at zero instead of wrapping.
        let height = PEAK_COIN_EMISSION_HEIGHT + COIN_EMISSION_HEIGHT_INTERVAL + 5;
        let reward = block_reward(0, 0, u64::MAX, 23, height).unwrap();
        assert_eq!(reward, FINAL_SUBSIDY_PER_MINUTE);
    }
}
