//! REST API for simulation results.
//!
//! Provides:
//! - `GET /state`: configuration and KPI report of the served run
//! - `GET /telemetry`: tick records with optional range filtering
//! - `GET /daily`: daily energy and peak power series
//! - `POST /simulate`: runs a fresh, independent simulation per request

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::sim::kpi::{DailySummary, KpiReport};
use crate::sim::types::{SimConfig, TickResult};

pub use types::SimulateRequest;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the served run completes and wrapped in `Arc`;
/// no locks are needed since all data is read-only.
pub struct AppState {
    /// Configuration used for the served run.
    pub config: SimConfig,
    /// Aggregate KPI report.
    pub kpi: KpiReport,
    /// Per-tick results.
    pub results: Vec<TickResult>,
    /// Daily series derived from `results`.
    pub daily: Vec<DailySummary>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/telemetry", get(handlers::get_telemetry))
        .route("/daily", get(handlers::get_daily))
        .route("/simulate", post(handlers::post_simulate))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
