//! Test data generators for integration tests.

use pulse_consensus::BlockHash;

/// Timestamps `count` blocks long, starting at `start`, spaced `step`
/// seconds apart.
pub fn spaced_timestamps(count: usize, start: u64, step: u64) -> Vec<u64> {
    (0..count as u64).map(|i| start + i * step).collect()
}

/// Cumulative difficulties rising by `slope` per block.
pub fn linear_work(count: usize, slope: u64) -> Vec<u64> {
    (1..=count as u64).map(|i| i * slope).collect()
}

/// A hash whose numeric value (little-endian limbs) is exactly `value`.
pub fn hash_with_value(value: u64) -> BlockHash {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&value.to_le_bytes());
    BlockHash::from_bytes(bytes)
}

/// A recognizable per-seed hash for checkpoint tests.
pub fn seeded_hash(seed: u8) -> BlockHash {
    let mut bytes = [seed; 32];
    bytes[0] = 0xCC;
    bytes[31] = seed.wrapping_mul(7);
    BlockHash::from_bytes(bytes)
}

/// The same hash rendered as the hex string loaders consume.
pub fn seeded_hash_hex(seed: u8) -> String {
    seeded_hash(seed).to_string()
}
