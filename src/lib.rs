//! EV charging station simulator.
//!
//! Simulates stochastic EV arrivals at a fixed pool of chargepoints over a
//! simulated year in discrete ticks, and aggregates delivered energy and
//! peak power demand.

#[cfg(feature = "api")]
pub mod api;
/// TOML scenario configuration and presets.
pub mod config;
pub mod error;
pub mod io;
/// Simulation engine, random stream, sampling, and statistics.
pub mod sim;
/// Vehicles, chargepoints, and the station pool.
pub mod station;

pub use error::SimError;
