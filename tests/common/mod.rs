//! Shared test fixtures for integration tests.

use ev_station_sim::sim::types::{DEFAULT_SEED, SimConfig};

/// Ticks in one simulated day at the default resolution.
pub const TICKS_PER_DAY: usize = 96;

/// Default configuration: 20 chargepoints, seed 12345, one simulated year.
pub fn default_config() -> SimConfig {
    SimConfig::new(20, DEFAULT_SEED)
}

/// Default constants over a shorter horizon of `days` simulated days.
pub fn short_config(num_chargepoints: usize, seed: i64, days: usize) -> SimConfig {
    SimConfig::new(num_chargepoints, seed).with_max_ticks(days * TICKS_PER_DAY)
}
