//! Import/export of simulation results.

/// CSV export of tick telemetry and daily series.
pub mod export;
