//! Core simulation types: run configuration, station model constants, and
//! per-tick records.

use std::fmt;

use serde::Serialize;

use crate::error::SimError;

use super::sampler::WeightedValue;

/// Seed used when a run does not specify one.
pub const DEFAULT_SEED: i64 = 12_345;
/// Rated power of every chargepoint (kW).
pub const DEFAULT_POWER_KW: f64 = 11.0;
/// Ticks per simulated hour (15-minute resolution).
pub const DEFAULT_TICKS_PER_HOUR: usize = 4;
pub const DEFAULT_HOURS_PER_DAY: usize = 24;
pub const DEFAULT_DAYS_PER_YEAR: usize = 365;
/// Vehicle consumption used to turn distance into energy demand.
pub const DEFAULT_KWH_PER_100KM: f64 = 18.0;

/// Probability that an EV arrives at an idle chargepoint during each hour
/// of the day.
pub const DEFAULT_HOURLY_ARRIVAL_PROBABILITIES: [f64; 24] = [
    0.0094, 0.0094, 0.0094, 0.0094, 0.0094, 0.0094, 0.0094, 0.0094, // 00-08
    0.0283, 0.0283, // 08-10
    0.0566, 0.0566, 0.0566, // 10-13
    0.0755, 0.0755, 0.0755, // 13-16
    0.1038, 0.1038, 0.1038, // 16-19
    0.0472, 0.0472, 0.0472, // 19-22
    0.0094, 0.0094, // 22-24
];

/// Distance driven since the last charge (km) for an arriving EV. The 0 km
/// entry means the driver does not charge.
pub const DEFAULT_DEMAND_DISTRIBUTION: [WeightedValue<f64>; 9] = [
    WeightedValue::new(0.0, 0.3431),
    WeightedValue::new(5.0, 0.0490),
    WeightedValue::new(10.0, 0.0980),
    WeightedValue::new(20.0, 0.1176),
    WeightedValue::new(30.0, 0.0882),
    WeightedValue::new(50.0, 0.1176),
    WeightedValue::new(100.0, 0.1078),
    WeightedValue::new(200.0, 0.0490),
    WeightedValue::new(300.0, 0.0294),
];

/// Everything one simulation run needs.
///
/// # Examples
///
/// ```
/// use ev_station_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(20, 42);
/// assert_eq!(cfg.dt_hours(), 0.25);
/// assert_eq!(cfg.max_ticks, 35_040);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Number of chargepoints in the station.
    pub num_chargepoints: usize,
    /// Seed of the random stream.
    pub seed: i64,
    /// Emit per-event debug traces.
    pub verbose_logging: bool,
    /// Tick budget of the run.
    pub max_ticks: usize,
    pub ticks_per_hour: usize,
    pub hours_per_day: usize,
    pub days_per_year: usize,
    /// Rated power of each chargepoint (kW).
    pub power_kw: f64,
    /// Energy needed per 100 km driven (kWh).
    pub kwh_per_100km: f64,
    /// Arrival probability per idle chargepoint for each hour of the day.
    pub hourly_arrival_probabilities: Vec<f64>,
    /// Distance-since-last-charge distribution (km).
    pub demand_distribution: Vec<WeightedValue<f64>>,
}

impl SimConfig {
    /// Creates a configuration with the default station model, running for
    /// one simulated year.
    pub fn new(num_chargepoints: usize, seed: i64) -> Self {
        let ticks_per_hour = DEFAULT_TICKS_PER_HOUR;
        Self {
            num_chargepoints,
            seed,
            verbose_logging: false,
            max_ticks: DEFAULT_DAYS_PER_YEAR * DEFAULT_HOURS_PER_DAY * ticks_per_hour,
            ticks_per_hour,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            days_per_year: DEFAULT_DAYS_PER_YEAR,
            power_kw: DEFAULT_POWER_KW,
            kwh_per_100km: DEFAULT_KWH_PER_100KM,
            hourly_arrival_probabilities: DEFAULT_HOURLY_ARRIVAL_PROBABILITIES.to_vec(),
            demand_distribution: DEFAULT_DEMAND_DISTRIBUTION.to_vec(),
        }
    }

    /// Replaces the tick budget.
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    /// Duration of one tick in hours.
    pub fn dt_hours(&self) -> f64 {
        1.0 / self.ticks_per_hour as f64
    }

    pub fn ticks_per_day(&self) -> usize {
        self.ticks_per_hour.saturating_mul(self.hours_per_day)
    }

    /// Ticks in one simulated year at the configured resolution.
    pub fn ticks_per_year(&self) -> usize {
        self.ticks_per_day().saturating_mul(self.days_per_year)
    }

    /// Peak power if every chargepoint were busy at once (kW).
    pub fn theoretical_max_power_kw(&self) -> f64 {
        self.num_chargepoints as f64 * self.power_kw
    }

    /// Checks the station model tables the tick loop depends on.
    ///
    /// The chargepoint count is not checked: an empty station runs idle.
    /// User-facing configuration rejects it in
    /// [`crate::config::ScenarioConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidArgument`] naming the first bad table or
    /// constant.
    pub fn check_model(&self) -> Result<(), SimError> {
        if self.ticks_per_hour == 0 || self.hours_per_day == 0 {
            return Err(SimError::invalid("ticks_per_hour and hours_per_day must be > 0"));
        }
        if !(self.power_kw.is_finite() && self.power_kw > 0.0) {
            return Err(SimError::invalid(format!(
                "chargepoint power must be a positive number, got {}",
                self.power_kw
            )));
        }
        if !(self.kwh_per_100km.is_finite() && self.kwh_per_100km > 0.0) {
            return Err(SimError::invalid(format!(
                "consumption must be a positive number, got {}",
                self.kwh_per_100km
            )));
        }
        if self.hourly_arrival_probabilities.len() != self.hours_per_day {
            return Err(SimError::invalid(format!(
                "hourly arrival table has {} entries, expected {}",
                self.hourly_arrival_probabilities.len(),
                self.hours_per_day
            )));
        }
        if self.hourly_arrival_probabilities.iter().all(|p| *p <= 0.0) {
            return Err(SimError::invalid("hourly arrival table is all zero"));
        }
        if self.demand_distribution.is_empty() {
            return Err(SimError::invalid("demand distribution is empty"));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(20, DEFAULT_SEED)
    }
}

/// Record of one simulated tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickResult {
    /// Tick index, starting at 0.
    pub tick: usize,
    /// Zero-based simulated day.
    pub day: usize,
    /// Hour of day, `0..hours_per_day`.
    pub hour: usize,
    /// Energy delivered across all chargepoints during the tick (kWh).
    pub energy_kwh: f64,
    /// Sum of rated power over chargepoints occupied after the tick (kW).
    pub power_kw: f64,
    /// Chargepoints occupied after the tick.
    pub occupied: usize,
    /// Vehicles that arrived and were connected.
    pub arrivals: usize,
    /// Arrivals that sampled the "no charge" outcome.
    pub no_charge_arrivals: usize,
    /// Vehicles released fully charged.
    pub completed: usize,
}

impl fmt::Display for TickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} (day {:>3}, {:>2}h) | energy={:>7.3} kWh  power={:>7.2} kW | \
             occupied={:>3} arrivals={} no-charge={} completed={}",
            self.tick,
            self.day,
            self.hour,
            self.energy_kwh,
            self.power_kw,
            self.occupied,
            self.arrivals,
            self.no_charge_arrivals,
            self.completed,
        )
    }
}
