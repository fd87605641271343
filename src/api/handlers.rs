//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{
    ErrorResponse, SimulateRequest, SimulateResponse, StateResponse, TelemetryQuery,
};
use crate::SimError;
use crate::config::ScenarioConfig;
use crate::sim::engine::simulate;
use crate::sim::kpi::DailySummary;
use crate::sim::types::TickResult;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Returns simulation config, KPI report, and the latest tick record.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        config: state.config.clone(),
        kpi: state.kpi.clone(),
        latest_tick: state.results.last().cloned(),
    })
}

/// Returns tick records, optionally filtered by tick range.
///
/// `GET /telemetry` → 200 + `Vec<TickResult>` JSON
/// `GET /telemetry?from=N&to=M` → filtered range (inclusive)
/// `GET /telemetry?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_telemetry(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TelemetryQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let records: Vec<TickResult> = state
        .results
        .iter()
        .filter(|r| r.tick >= from && r.tick <= to)
        .cloned()
        .collect();

    Ok(Json(records))
}

/// `GET /daily` → 200 + `Vec<DailySummary>` JSON
pub async fn get_daily(State(state): State<Arc<AppState>>) -> Json<Vec<DailySummary>> {
    Json(state.daily.clone())
}

/// Runs a fresh simulation on the blocking pool.
///
/// The request starts from the baseline scenario; the served run is not
/// touched. Invalid parameters yield 400, a failed worker 500.
pub async fn post_simulate(
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let mut scenario = ScenarioConfig::baseline();
    scenario.simulation.num_chargepoints = req.num_chargepoints;
    if let Some(seed) = req.seed {
        scenario.simulation.seed = seed;
    }
    scenario.simulation.max_ticks = req.max_ticks;

    let errors = scenario.validate();
    if !errors.is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            SimError::Config(errors).to_string(),
        ));
    }

    let config = scenario.to_sim_config();
    tracing::info!(
        chargepoints = config.num_chargepoints,
        seed = config.seed,
        ticks = config.max_ticks,
        "on-demand simulation requested"
    );

    let run = tokio::task::spawn_blocking(move || simulate(config))
        .await
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(SimulateResponse {
        statistics: run.statistics,
        kpi: run.kpi,
    }))
}
