/// Tick counter and day/hour calendar.
pub mod clock;
pub mod engine;
/// Post-hoc KPI report and daily series.
pub mod kpi;
/// Park–Miller seeded random stream.
pub mod rng;
/// Weighted choice over discrete distributions.
pub mod sampler;
pub mod stats;
pub mod types;
