//! Simulation engine that drives arrivals, charging, and aggregation.

use crate::error::SimError;
use crate::station::{ChargeTick, Station, Vehicle};

use super::clock::Clock;
use super::kpi::KpiReport;
use super::rng::SeededStream;
use super::sampler::weighted_choice;
use super::stats::Statistics;
use super::types::{SimConfig, TickResult};

/// Counters over charging sessions, used to check energy conservation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTally {
    /// Vehicles created so far.
    pub vehicles_created: u64,
    /// Vehicles released fully charged.
    pub completed_sessions: u64,
    /// Energy received by released vehicles (kWh).
    pub completed_energy_kwh: f64,
}

impl SessionTally {
    /// Accounts for one charging tick and returns the delivered energy.
    ///
    /// The flag is `true` when the tick released a fully charged vehicle.
    fn settle(
        &mut self,
        tick: usize,
        chargepoint: usize,
        charge: ChargeTick,
        verbose: bool,
    ) -> (f64, bool) {
        if verbose {
            if let Some(vehicle) = charge.vehicle_id {
                tracing::debug!(
                    tick,
                    chargepoint,
                    vehicle,
                    delivered_kwh = charge.delivered_kwh,
                    "charging tick"
                );
            }
        }

        let Some(released) = charge.released else {
            return (charge.delivered_kwh, false);
        };
        self.completed_sessions += 1;
        self.completed_energy_kwh += released.energy_received_kwh();
        if verbose {
            tracing::debug!(
                tick,
                chargepoint,
                vehicle = released.id(),
                received_kwh = released.energy_received_kwh(),
                "vehicle fully charged and released"
            );
        }
        (charge.delivered_kwh, true)
    }
}

/// Simulation engine owning the station, random stream, and statistics of
/// one run.
///
/// Each engine is independent; concurrent runs must each build their own.
pub struct Engine {
    config: SimConfig,
    clock: Clock,
    station: Station,
    rng: SeededStream,
    statistics: Statistics,
    sessions: SessionTally,
    next_vehicle_id: u64,
}

impl Engine {
    /// Creates an engine for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`] if the station model tables are
    /// unusable (see [`SimConfig::check_model`]).
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.check_model()?;

        let clock = Clock::new(config.max_ticks, config.ticks_per_hour, config.hours_per_day);
        let station = Station::new(config.num_chargepoints, config.power_kw, config.dt_hours());
        let rng = SeededStream::new(config.seed);

        Ok(Self {
            config,
            clock,
            station,
            rng,
            statistics: Statistics::new(),
            sessions: SessionTally::default(),
            next_vehicle_id: 1,
        })
    }

    /// Simulates the next tick, or returns `None` once the budget is spent.
    ///
    /// Chargepoints are visited in index order, which fixes the order of
    /// random draws. An idle chargepoint consumes one draw for the arrival
    /// roll and, on arrival, one more for the demand sample.
    ///
    /// # Errors
    ///
    /// Propagates sampler failures, which abort the run.
    pub fn step(&mut self) -> Result<Option<TickResult>, SimError> {
        let Some(tick) = self.clock.tick() else {
            return Ok(None);
        };
        let hour = self.clock.hour_of_day(tick);
        let verbose = self.config.verbose_logging;
        let arrival_probability =
            self.config.hourly_arrival_probabilities[hour] / self.config.ticks_per_hour as f64;

        let mut energy_kwh = 0.0;
        let mut power_kw = 0.0;
        let mut occupied = 0;
        let mut arrivals = 0;
        let mut no_charge_arrivals = 0;
        let mut completed = 0;

        for cp in self.station.chargepoints_mut() {
            let chargepoint = cp.id();

            if cp.is_idle() {
                if self.rng.next_f64() < arrival_probability {
                    let distance_km =
                        weighted_choice(&self.config.demand_distribution, &mut self.rng)?;
                    let energy_needed_kwh = distance_km / 100.0 * self.config.kwh_per_100km;

                    if energy_needed_kwh > 0.0 {
                        let vehicle = self.next_vehicle_id;
                        self.next_vehicle_id += 1;
                        self.sessions.vehicles_created += 1;

                        if cp.assign_ev(Vehicle::new(vehicle, energy_needed_kwh)) {
                            arrivals += 1;
                            if verbose {
                                tracing::debug!(
                                    tick,
                                    chargepoint,
                                    vehicle,
                                    distance_km,
                                    energy_needed_kwh,
                                    "vehicle arrived"
                                );
                            }
                            // exactly one delivery on the arrival tick
                            let charge = cp.process_charging_tick();
                            let (delivered, released) =
                                self.sessions.settle(tick, chargepoint, charge, verbose);
                            energy_kwh += delivered;
                            completed += usize::from(released);
                        } else if verbose {
                            tracing::debug!(
                                tick,
                                chargepoint,
                                vehicle,
                                "assignment rejected, arrival dropped"
                            );
                        }
                    } else {
                        no_charge_arrivals += 1;
                        if verbose {
                            tracing::debug!(
                                tick,
                                chargepoint,
                                "vehicle arrived without charging demand"
                            );
                        }
                    }
                }
            } else {
                let charge = cp.process_charging_tick();
                let (delivered, released) = self.sessions.settle(tick, chargepoint, charge, verbose);
                energy_kwh += delivered;
                completed += usize::from(released);
            }

            if cp.is_occupied() {
                power_kw += cp.power_kw();
                occupied += 1;
            }
        }

        self.statistics.record_tick(energy_kwh, power_kw);

        Ok(Some(TickResult {
            tick,
            day: self.clock.day(tick),
            hour,
            energy_kwh,
            power_kw,
            occupied,
            arrivals,
            no_charge_arrivals,
            completed,
        }))
    }

    /// Runs every remaining tick and returns their records.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a tick; no partial results are
    /// returned in that case.
    pub fn run(&mut self) -> Result<Vec<TickResult>, SimError> {
        let mut results = Vec::with_capacity(self.clock.total() - self.clock.elapsed());
        while let Some(result) = self.step()? {
            results.push(result);
        }
        Ok(results)
    }

    /// Running aggregates; final once [`Engine::run`] returns.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn sessions(&self) -> &SessionTally {
        &self.sessions
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks simulated so far.
    pub fn current_tick(&self) -> usize {
        self.clock.elapsed()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    /// Final running aggregates.
    pub statistics: Statistics,
    pub sessions: SessionTally,
    /// Per-tick records, in tick order.
    pub results: Vec<TickResult>,
    pub kpi: KpiReport,
}

/// Builds an engine for `config`, runs it to the end of its tick budget,
/// and reports the results.
///
/// # Errors
///
/// Returns the construction or run error; nothing is reported for a run
/// that did not complete.
pub fn simulate(config: SimConfig) -> Result<SimulationRun, SimError> {
    let mut engine = Engine::new(config)?;
    let results = engine.run()?;
    let kpi = KpiReport::from_results(
        &results,
        engine.station().total_chargepoints(),
        engine.config().power_kw,
    );
    Ok(SimulationRun {
        statistics: engine.statistics,
        sessions: engine.sessions,
        results,
        kpi,
    })
}
