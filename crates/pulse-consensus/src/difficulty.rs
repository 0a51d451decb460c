//! Difficulty retargeting algorithms.
//!
//! Four algorithm eras live side by side; which one runs is decided by the
//! protocol version, never by inspecting the data. All four take the same
//! inputs: block timestamps and cumulative difficulties ordered oldest
//! first, plus the target spacing in seconds.
//!
//! Callers supply up to [`crate::params::DIFFICULTY_BLOCKS_COUNT`] entries; each
//! algorithm truncates to its own window, dropping the newest entries
//! beyond it (that tail cut is what implements the retarget lag).
//!
//! The overflow behaviors differ per era and are consensus rules, not
//! bugs: v2 returns 1 when the work/target product overflows, v4 returns
//! 0, and v3 pins its output between two chain-specific constants. They
//! must not be unified.

use crate::params::{
    DIFFICULTY_CUT, DIFFICULTY_TARGET_V1, DIFFICULTY_TARGET_V2, DIFFICULTY_WINDOW,
    DIFFICULTY_WINDOW_V2,
};
use tracing::debug;

/// Required work for one block. Zero is reserved as an error sentinel.
pub type Difficulty = u64;

/// Floor of the v3 output band.
const LWMA_FLOOR: u64 = 75_723_142;

/// Ceiling of the v3 output band.
const LWMA_CEILING: u64 = 120_307_799;

/// Raw v3 results below this are snapped to [`LWMA_FLOOR`].
const LWMA_RESET_THRESHOLD: u64 = 2_000;

#[inline]
fn mul128(a: u64, b: u64) -> (u64, u64) {
    let product = u128::from(a) * u128::from(b);
    (product as u64, (product >> 64) as u64)
}

/// Sorted-window cut bounds shared by v1 and v2.
fn cut_bounds(length: usize) -> (usize, usize) {
    if length <= DIFFICULTY_WINDOW - 2 * DIFFICULTY_CUT {
        (0, length)
    } else {
        let cut_begin = (length - (DIFFICULTY_WINDOW - 2 * DIFFICULTY_CUT) + 1) / 2;
        (cut_begin, cut_begin + (DIFFICULTY_WINDOW - 2 * DIFFICULTY_CUT))
    }
}

/// Classic trimmed-mean retarget (versions below 7).
///
/// Timestamps are sorted before cutting; cumulative difficulties stay in
/// chain order and are indexed by the same cut positions. Work over the
/// trimmed span is scaled to the target and divided by the observed span,
/// rounding up.
pub fn next_difficulty(
    timestamps: &[u64],
    cumulative_difficulties: &[u64],
    target_seconds: u64,
) -> Difficulty {
    debug_assert_eq!(timestamps.len(), cumulative_difficulties.len());
    let mut timestamps = timestamps.to_vec();
    let mut cumulative_difficulties = cumulative_difficulties.to_vec();
    if timestamps.len() > DIFFICULTY_WINDOW {
        timestamps.truncate(DIFFICULTY_WINDOW);
        cumulative_difficulties.truncate(DIFFICULTY_WINDOW);
    }

    let length = timestamps.len();
    if length <= 1 {
        return 1;
    }
    timestamps.sort_unstable();

    let (cut_begin, cut_end) = cut_bounds(length);
    let mut time_span = timestamps[cut_end - 1] - timestamps[cut_begin];
    if time_span == 0 {
        time_span = 1;
    }
    let total_work = cumulative_difficulties[cut_end - 1] - cumulative_difficulties[cut_begin];

    let product = u128::from(total_work) * u128::from(target_seconds);
    ((product + u128::from(time_span) - 1) / u128::from(time_span)) as u64
}

/// Overflow-guarded trimmed mean (versions 7..9).
///
/// Identical to the classic algorithm except that an overflowing
/// work/target product collapses to difficulty 1 instead of wrapping.
pub fn next_difficulty_v2(
    timestamps: &[u64],
    cumulative_difficulties: &[u64],
    target_seconds: u64,
) -> Difficulty {
    debug_assert_eq!(timestamps.len(), cumulative_difficulties.len());
    let mut timestamps = timestamps.to_vec();
    let mut cumulative_difficulties = cumulative_difficulties.to_vec();
    if timestamps.len() > DIFFICULTY_WINDOW {
        timestamps.truncate(DIFFICULTY_WINDOW);
        cumulative_difficulties.truncate(DIFFICULTY_WINDOW);
    }

    let length = timestamps.len();
    if length <= 1 {
        return 1;
    }
    timestamps.sort_unstable();

    let (cut_begin, cut_end) = cut_bounds(length);
    let mut time_span = timestamps[cut_end - 1] - timestamps[cut_begin];
    if time_span == 0 {
        time_span = 1;
    }
    let total_work = cumulative_difficulties[cut_end - 1] - cumulative_difficulties[cut_begin];

    let (low, high) = mul128(total_work, target_seconds);
    if high != 0 {
        return 1;
    }
    match low.checked_add(time_span - 1) {
        Some(rounded) => rounded / time_span,
        None => 1,
    }
}

/// LWMA retarget (versions 10..13), 70-block window at a 120 second target.
///
/// Linearly weighted average of per-block solve times (each clamped to
/// +/- 7 targets) against the harmonic mean of per-block difficulties,
/// damped by a 0.998 adjustment. Raw outputs below
/// [`LWMA_RESET_THRESHOLD`] snap to [`LWMA_FLOOR`]; outputs above
/// [`LWMA_CEILING`] are capped there. Values between the threshold and
/// the floor pass through unchanged.
pub fn next_difficulty_v3(
    timestamps: &[u64],
    cumulative_difficulties: &[u64],
    target_seconds: u64,
) -> Difficulty {
    debug_assert_eq!(timestamps.len(), cumulative_difficulties.len());
    let t = target_seconds as i64;
    let mut n = DIFFICULTY_WINDOW_V2;

    let mut timestamps = timestamps.to_vec();
    let mut cumulative_difficulties = cumulative_difficulties.to_vec();
    if timestamps.len() > n {
        timestamps.truncate(n + 1);
        cumulative_difficulties.truncate(n + 1);
    }

    let samples = timestamps.len();
    // A young chain gets its first five blocks at minimum difficulty.
    if samples < 6 {
        return 1;
    }
    if samples < n + 1 {
        n = samples - 1;
    }

    let adjust = 0.998;
    let k = (n * (n + 1)) as f64 / 2.0;

    let mut lwma = 0.0;
    let mut sum_inverse_diff = 0.0;
    for i in 1..=n {
        let solve_time =
            (timestamps[i] as i64 - timestamps[i - 1] as i64).clamp(-7 * t, 7 * t);
        let difficulty = cumulative_difficulties[i] - cumulative_difficulties[i - 1];
        lwma += (solve_time * i as i64) as f64 / k;
        sum_inverse_diff += 1.0 / difficulty as f64;
    }

    // Keep the average sane if timestamps run far backwards.
    if (lwma.round() as i64) < t / 20 {
        lwma = (t / 20) as f64;
    }

    let harmonic_mean = n as f64 / sum_inverse_diff * adjust;
    let next = (harmonic_mean * t as f64 / lwma) as u64;

    if next < LWMA_RESET_THRESHOLD {
        return LWMA_FLOOR;
    }
    if next > LWMA_CEILING {
        return LWMA_CEILING;
    }
    next
}

/// Weighted-timespan retarget (version 14 onward), 70-block window back
/// at a 60 second target.
///
/// Effective timestamps are forced non-decreasing via a running maximum;
/// each span is clamped to [1, 11 targets] and weighted by its position.
/// A burst of short solve times over the last seven blocks shrinks the
/// weighted sum, retargeting upward faster; a run of consecutive short
/// times shrinks it a further 7/8.
pub fn next_difficulty_v4(
    timestamps: &[u64],
    cumulative_difficulties: &[u64],
    target_seconds: u64,
) -> Difficulty {
    debug_assert_eq!(timestamps.len(), cumulative_difficulties.len());
    let mut timestamps = timestamps.to_vec();
    let mut cumulative_difficulties = cumulative_difficulties.to_vec();
    if timestamps.len() > DIFFICULTY_WINDOW_V2 {
        timestamps.truncate(DIFFICULTY_WINDOW_V2);
        cumulative_difficulties.truncate(DIFFICULTY_WINDOW_V2);
    }

    let length = timestamps.len();
    if length <= 1 {
        return 1;
    }

    let mut weighted_timespans: u64 = 0;
    let mut short_count = 0u32;
    let mut last_was_short = false;
    let mut short_run = 0u32;

    let mut previous_max = timestamps[0];
    for i in 1..length {
        let max_timestamp = timestamps[i].max(previous_max);
        let mut timespan = max_timestamp - previous_max;
        if timespan == 0 {
            timespan = 1;
        } else if timespan > 11 * target_seconds {
            timespan = 11 * target_seconds;
        }

        if length >= 7 && i >= length - 7 {
            if timespan < 30 {
                short_count += 1;
                last_was_short = true;
                short_run += 1;
            } else {
                last_was_short = false;
                short_run = 0;
            }
        }

        weighted_timespans += i as u64 * timespan;
        previous_max = max_timestamp;
    }

    // Retarget harder the more of the last seven blocks came in short,
    // with an extra bite when they were consecutive and still running.
    if last_was_short {
        if short_count >= 7 {
            weighted_timespans /= 2;
        } else if short_count == 6 {
            weighted_timespans = weighted_timespans * 3 / 5;
            if short_run == 6 {
                weighted_timespans = weighted_timespans * 7 / 8;
            }
        } else if short_count == 5 {
            weighted_timespans = weighted_timespans * 4 / 5;
            if short_run == 5 {
                weighted_timespans = weighted_timespans * 7 / 8;
            }
        } else if short_count == 4 {
            weighted_timespans = weighted_timespans * 9 / 10;
            if short_run == 4 {
                weighted_timespans = weighted_timespans * 7 / 8;
            }
        } else if short_count == 3 {
            weighted_timespans = weighted_timespans * 11 / 12;
            if short_run == 3 {
                weighted_timespans = weighted_timespans * 7 / 8;
            }
        }
    }

    let target = 99 * ((length as u64 + 1) / 2 * target_seconds) / 100;

    let minimum_timespan = target_seconds * length as u64 / 2;
    if weighted_timespans < minimum_timespan {
        weighted_timespans = minimum_timespan;
    }

    let total_work = cumulative_difficulties[length - 1] - cumulative_difficulties[0];

    let (low, high) = mul128(total_work, target);
    if high != 0 {
        return 0;
    }
    low / weighted_timespans
}

/// Target block spacing for a protocol version.
pub fn target_for_version(version: u8) -> u64 {
    if version < 7 || version >= 14 {
        DIFFICULTY_TARGET_V1
    } else {
        DIFFICULTY_TARGET_V2
    }
}

/// Required difficulty for the next block under the given protocol
/// version. Selects the algorithm era and its target spacing.
pub fn next_difficulty_for_version(
    version: u8,
    timestamps: &[u64],
    cumulative_difficulties: &[u64],
) -> Difficulty {
    let target = target_for_version(version);
    let difficulty = match version {
        0..=6 => next_difficulty(timestamps, cumulative_difficulties, target),
        7..=9 => next_difficulty_v2(timestamps, cumulative_difficulties, target),
        10..=13 => next_difficulty_v3(timestamps, cumulative_difficulties, target),
        _ => next_difficulty_v4(timestamps, cumulative_difficulties, target),
    };
    debug!(version, target, difficulty, "retarget");
    difficulty
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Timestamps spaced `step` seconds apart starting at `start`.
    fn spaced_timestamps(count: usize, start: u64, step: u64) -> Vec<u64> {
        (0..count as u64).map(|i| start + i * step).collect()
    }

    /// Cumulative difficulties rising by `slope` per block.
    fn linear_work(count: usize, slope: u64) -> Vec<u64> {
        (1..=count as u64).map(|i| i * slope).collect()
    }

    #[test]
    fn test_empty_and_single_inputs_return_one() {
        let algorithms: [fn(&[u64], &[u64], u64) -> Difficulty; 3] =
            [next_difficulty, next_difficulty_v2, next_difficulty_v4];
        for f in algorithms {
            assert_eq!(f(&[], &[], 60), 1);
            assert_eq!(f(&[100], &[5], 60), 1);
        }
        assert_eq!(next_difficulty_v3(&[], &[], 120), 1);
    }

    #[test]
    fn test_v1_on_target_spacing_keeps_difficulty() {
        // Blocks arriving exactly on target: next difficulty equals the
        // per-block work rate (rounded up).
        let ts = spaced_timestamps(100, 1_000_000, 60);
        let work = linear_work(100, 10_000);
        let d = next_difficulty(&ts, &work, 60);
        // Window below cut threshold: span 99*60, work 99*10_000.
        assert_eq!(d, 10_000);
    }

    #[test]
    fn test_v1_fast_blocks_raise_difficulty() {
        let ts = spaced_timestamps(100, 1_000_000, 30);
        let work = linear_work(100, 10_000);
        assert_eq!(next_difficulty(&ts, &work, 60), 20_000);
    }

    #[test]
    fn test_v1_slow_blocks_lower_difficulty() {
        let ts = spaced_timestamps(100, 1_000_000, 120);
        let work = linear_work(100, 10_000);
        assert_eq!(next_difficulty(&ts, &work, 60), 5_000);
    }

    #[test]
    fn test_v1_zero_span_coerced() {
        // All timestamps identical: span forced to 1, not a panic.
        let ts = vec![1_000_000; 50];
        let work = linear_work(50, 7);
        let d = next_difficulty(&ts, &work, 60);
        assert_eq!(d, 49 * 7 * 60);
    }

    #[test]
    fn test_v1_full_window_applies_cut() {
        // With a full 720-entry window the cut drops 60 from each end.
        let ts = spaced_timestamps(720, 0, 60);
        let work = linear_work(720, 1_000);
        let d = next_difficulty(&ts, &work, 60);
        // span = ts[659] - ts[60] = 599*60; work = 599_000.
        assert_eq!(d, 1_000);
    }

    #[test]
    fn test_v1_truncates_newest_entries() {
        // Entries beyond the window are the newest and must be ignored.
        let mut ts = spaced_timestamps(735, 0, 60);
        let mut work = linear_work(735, 1_000);
        // Poison the tail: if it were consulted the result would change.
        for t in ts.iter_mut().skip(720) {
            *t += 1_000_000;
        }
        for w in work.iter_mut().skip(720) {
            *w += 777;
        }
        assert_eq!(
            next_difficulty(&ts, &work, 60),
            next_difficulty(&ts[..720], &work[..720], 60)
        );
    }

    #[test]
    fn test_v2_matches_v1_when_no_overflow() {
        let ts = spaced_timestamps(300, 5_000, 45);
        let work = linear_work(300, 123_456);
        assert_eq!(
            next_difficulty(&ts, &work, 120),
            next_difficulty_v2(&ts, &work, 120)
        );
    }

    #[test]
    fn test_v2_overflow_returns_one() {
        // Work difference large enough that work * target overflows u64.
        let ts = vec![0, 60];
        let work = vec![0, u64::MAX / 10];
        assert_eq!(next_difficulty_v2(&ts, &work, 120), 1);
        // v1 computes through 128-bit and does not collapse.
        assert!(next_difficulty(&ts, &work, 120) > 1);
    }

    #[test]
    fn test_v3_young_chain() {
        let ts = spaced_timestamps(5, 0, 120);
        let work = linear_work(5, 1_000_000);
        assert_eq!(next_difficulty_v3(&ts, &work, 120), 1);
    }

    #[test]
    fn test_v3_steady_state_tracks_work_rate() {
        // 71 samples spaced exactly on target with constant per-block
        // difficulty D: the output is D scaled by the 0.998 adjustment.
        let d = 100_000_000u64;
        let ts = spaced_timestamps(71, 1_500_000_000, 120);
        let work = linear_work(71, d);
        let next = next_difficulty_v3(&ts, &work, 120);
        let expected = (0.998 * d as f64) as u64;
        assert!(
            next.abs_diff(expected) <= 1,
            "got {next}, expected about {expected}"
        );
    }

    #[test]
    fn test_v3_small_output_snaps_to_floor() {
        // Tiny per-block difficulty drives the raw result under the reset
        // threshold, which pins it to the floor constant.
        let ts = spaced_timestamps(71, 0, 120);
        let work = linear_work(71, 10);
        assert_eq!(next_difficulty_v3(&ts, &work, 120), LWMA_FLOOR);
    }

    #[test]
    fn test_v3_output_capped_at_ceiling() {
        let ts = spaced_timestamps(71, 0, 1); // absurdly fast blocks
        let work = linear_work(71, 119_000_000);
        assert_eq!(next_difficulty_v3(&ts, &work, 120), LWMA_CEILING);
    }

    #[test]
    fn test_v3_mid_band_passes_through() {
        // Values between the reset threshold and the floor are NOT lifted
        // to the floor; the band is asymmetric on purpose.
        let d = 3_000_000u64;
        let ts = spaced_timestamps(71, 0, 120);
        let work = linear_work(71, d);
        let next = next_difficulty_v3(&ts, &work, 120);
        assert!(next < LWMA_FLOOR && next >= LWMA_RESET_THRESHOLD);
    }

    #[test]
    fn test_v3_backwards_timestamps_clamped() {
        // A timestamp running backwards contributes at worst -7 targets,
        // and the LWMA floor at target/20 keeps the result finite.
        let mut ts = spaced_timestamps(71, 1_000_000, 120);
        ts[35] = ts[34] - 100_000;
        let work = linear_work(71, 50_000_000);
        let next = next_difficulty_v3(&ts, &work, 120);
        assert!(next >= LWMA_RESET_THRESHOLD || next == LWMA_FLOOR);
        assert!(next <= LWMA_CEILING);
    }

    #[test]
    fn test_v4_steady_state() {
        let d = 50_000_000u64;
        let ts = spaced_timestamps(70, 2_000_000_000, 60);
        let work = linear_work(70, d);
        let next = next_difficulty_v4(&ts, &work, 60);
        // Weighted sum of 69 on-target spans vs the 99% target: result
        // lands within a couple percent of the work rate.
        let lower = d * 95 / 100;
        let upper = d * 105 / 100;
        assert!(
            (lower..=upper).contains(&next),
            "got {next}, expected near {d}"
        );
    }

    #[test]
    fn test_v4_short_burst_raises_difficulty() {
        let d = 50_000_000u64;
        let steady = spaced_timestamps(70, 2_000_000_000, 60);
        let mut bursty = steady.clone();
        // Last seven blocks arrive 10 seconds apart.
        for i in 63..70 {
            bursty[i] = bursty[62] + (i as u64 - 62) * 10;
        }
        let work = linear_work(70, d);
        let calm = next_difficulty_v4(&steady, &work, 60);
        let spiked = next_difficulty_v4(&bursty, &work, 60);
        assert!(spiked > calm, "burst must retarget upward: {spiked} vs {calm}");
    }

    #[test]
    fn test_v4_minimum_timespan_enforced() {
        // All-identical timestamps: every span coerces to 1, and the
        // weighted sum is lifted to target * length / 2.
        let ts = vec![9_000_000u64; 70];
        let work = linear_work(70, 1_000_000);
        let next = next_difficulty_v4(&ts, &work, 60);
        let total_work = 69 * 1_000_000u64;
        let target = 99 * ((70 + 1) / 2 * 60) / 100;
        let minimum = 60 * 70 / 2;
        assert_eq!(next, total_work * target / minimum);
    }

    #[test]
    fn test_v4_overflow_returns_zero() {
        let ts = vec![0, 60];
        let work = vec![0, u64::MAX / 2];
        assert_eq!(next_difficulty_v4(&ts, &work, 60), 0);
    }

    #[test]
    fn test_v4_non_monotonic_timestamps_use_running_max() {
        // An out-of-order timestamp is carried forward as the previous
        // maximum rather than producing a negative span.
        let mut ts = spaced_timestamps(70, 3_000_000, 60);
        ts[30] = ts[29] - 500;
        let work = linear_work(70, 1_000_000);
        let next = next_difficulty_v4(&ts, &work, 60);
        assert!(next > 0);
    }

    #[test]
    fn test_dispatch_selects_algorithm_eras() {
        let ts = spaced_timestamps(71, 0, 60);
        let work = linear_work(71, 40_000_000);

        assert_eq!(
            next_difficulty_for_version(1, &ts, &work),
            next_difficulty(&ts, &work, DIFFICULTY_TARGET_V1)
        );
        assert_eq!(
            next_difficulty_for_version(7, &ts, &work),
            next_difficulty_v2(&ts, &work, DIFFICULTY_TARGET_V2)
        );
        assert_eq!(
            next_difficulty_for_version(10, &ts, &work),
            next_difficulty_v3(&ts, &work, DIFFICULTY_TARGET_V2)
        );
        assert_eq!(
            next_difficulty_for_version(14, &ts, &work),
            next_difficulty_v4(&ts, &work, DIFFICULTY_TARGET_V1)
        );
        assert_eq!(
            next_difficulty_for_version(23, &ts, &work),
            next_difficulty_v4(&ts, &work, DIFFICULTY_TARGET_V1)
        );
    }

    #[test]
    fn test_dispatch_era_boundaries() {
        assert_eq!(target_for_version(6), 60);
        assert_eq!(target_for_version(7), 120);
        assert_eq!(target_for_version(13), 120);
        assert_eq!(target_for_version(14), 60);
    }
}
