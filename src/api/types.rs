//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::sim::kpi::KpiReport;
use crate::sim::stats::Statistics;
use crate::sim::types::{SimConfig, TickResult};

/// Combined state response: configuration, KPIs, and the last tick.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub config: SimConfig,
    pub kpi: KpiReport,
    /// Most recent tick record, absent for an empty run.
    pub latest_tick: Option<TickResult>,
}

/// Optional range query parameters for the telemetry endpoint.
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    /// Start tick (inclusive).
    pub from: Option<usize>,
    /// End tick (inclusive).
    pub to: Option<usize>,
}

/// Body of `POST /simulate`. Omitted fields use the baseline scenario.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SimulateRequest {
    pub num_chargepoints: usize,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub max_ticks: Option<usize>,
}

/// Result of an on-demand run.
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub statistics: Statistics,
    pub kpi: KpiReport,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
