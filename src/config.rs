//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::sim::sampler::WeightedValue;
use crate::sim::types::{
    DEFAULT_DAYS_PER_YEAR, DEFAULT_DEMAND_DISTRIBUTION, DEFAULT_HOURLY_ARRIVAL_PROBABILITIES,
    DEFAULT_HOURS_PER_DAY, DEFAULT_KWH_PER_100KM, DEFAULT_POWER_KW, DEFAULT_SEED,
    DEFAULT_TICKS_PER_HOUR, SimConfig,
};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields default to the baseline scenario. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::baseline`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run size, seed and tick budget.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Tick resolution and calendar.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Chargepoint rating and vehicle consumption.
    #[serde(default)]
    pub charging: ChargingConfig,
    /// Hourly arrival probabilities.
    #[serde(default)]
    pub arrivals: ArrivalConfig,
    /// Distance-since-last-charge distribution.
    #[serde(default = "default_demand")]
    pub demand: Vec<DemandEntry>,
}

/// Run size, seed and tick budget.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of chargepoints (must be > 0).
    pub num_chargepoints: usize,
    /// Seed of the random stream.
    pub seed: i64,
    /// Emit per-event debug traces.
    pub verbose_logging: bool,
    /// Tick budget; one simulated year when absent.
    pub max_ticks: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_chargepoints: 20,
            seed: DEFAULT_SEED,
            verbose_logging: false,
            max_ticks: None,
        }
    }
}

/// Tick resolution and calendar.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub ticks_per_hour: usize,
    pub hours_per_day: usize,
    pub days_per_year: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ticks_per_hour: DEFAULT_TICKS_PER_HOUR,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            days_per_year: DEFAULT_DAYS_PER_YEAR,
        }
    }
}

impl TimingConfig {
    /// Ticks in one simulated year, or `None` if the product overflows.
    pub fn ticks_per_year(&self) -> Option<usize> {
        self.days_per_year
            .checked_mul(self.hours_per_day)?
            .checked_mul(self.ticks_per_hour)
    }
}

/// Chargepoint rating and vehicle consumption.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChargingConfig {
    /// Rated power per chargepoint (kW).
    pub power_kw: f64,
    /// Vehicle consumption (kWh per 100 km).
    pub kwh_per_100km: f64,
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self {
            power_kw: DEFAULT_POWER_KW,
            kwh_per_100km: DEFAULT_KWH_PER_100KM,
        }
    }
}

/// Hourly arrival probabilities.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrivalConfig {
    /// One probability per hour of the day.
    pub hourly_probabilities: Vec<f64>,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            hourly_probabilities: DEFAULT_HOURLY_ARRIVAL_PROBABILITIES.to_vec(),
        }
    }
}

/// One row of the demand distribution.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemandEntry {
    /// Distance driven since the last charge (km); 0 means no charge.
    pub distance_km: f64,
    pub probability: f64,
}

fn default_demand() -> Vec<DemandEntry> {
    DEFAULT_DEMAND_DISTRIBUTION
        .iter()
        .map(|w| DemandEntry {
            distance_km: w.value,
            probability: w.probability,
        })
        .collect()
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.num_chargepoints"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: 20 chargepoints at 11 kW for one year.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            timing: TimingConfig::default(),
            charging: ChargingConfig::default(),
            arrivals: ArrivalConfig::default(),
            demand: default_demand(),
        }
    }

    /// Returns the small-lot preset: a handful of fast 22 kW chargepoints.
    pub fn small_lot() -> Self {
        Self {
            simulation: SimulationConfig {
                num_chargepoints: 4,
                ..SimulationConfig::default()
            },
            charging: ChargingConfig {
                power_kw: 22.0,
                ..ChargingConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the commuter-hub preset: many slower chargepoints with a
    /// sharp morning peak and long commutes.
    pub fn commuter_hub() -> Self {
        let mut hourly = vec![0.005; 24];
        for (hour, p) in [(6, 0.06), (7, 0.14), (8, 0.16), (9, 0.08), (17, 0.05), (18, 0.04)] {
            hourly[hour] = p;
        }
        Self {
            simulation: SimulationConfig {
                num_chargepoints: 50,
                ..SimulationConfig::default()
            },
            charging: ChargingConfig {
                power_kw: 7.4,
                ..ChargingConfig::default()
            },
            arrivals: ArrivalConfig {
                hourly_probabilities: hourly,
            },
            demand: vec![
                DemandEntry { distance_km: 0.0, probability: 0.15 },
                DemandEntry { distance_km: 30.0, probability: 0.25 },
                DemandEntry { distance_km: 60.0, probability: 0.35 },
                DemandEntry { distance_km: 120.0, probability: 0.25 },
            ],
            ..Self::baseline()
        }
    }

    /// Largest station accepted from user input.
    pub const MAX_CHARGEPOINTS: usize = 10_000;

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "small_lot", "commuter_hub"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "small_lot" => Ok(Self::small_lot()),
            "commuter_hub" => Ok(Self::commuter_hub()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Tick budget of the run: `max_ticks` if set, else one simulated year.
    ///
    /// Returns `None` when the year length overflows `usize`.
    pub fn total_ticks(&self) -> Option<usize> {
        match self.simulation.max_ticks {
            Some(ticks) => Some(ticks),
            None => self.timing.ticks_per_year(),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.num_chargepoints == 0 {
            errors.push(ConfigError::new("simulation.num_chargepoints", "must be > 0"));
        }
        if s.num_chargepoints > Self::MAX_CHARGEPOINTS {
            errors.push(ConfigError::new(
                "simulation.num_chargepoints",
                format!("must be <= {}", Self::MAX_CHARGEPOINTS),
            ));
        }
        if s.max_ticks == Some(0) {
            errors.push(ConfigError::new("simulation.max_ticks", "must be > 0"));
        }

        let t = &self.timing;
        match t.ticks_per_year() {
            Some(ticks_per_year) => {
                if s.max_ticks.is_some_and(|m| m > ticks_per_year) {
                    errors.push(ConfigError::new(
                        "simulation.max_ticks",
                        format!("must be <= one simulated year ({ticks_per_year} ticks)"),
                    ));
                }
            }
            None => errors.push(ConfigError::new(
                "timing",
                "days_per_year * hours_per_day * ticks_per_hour overflows",
            )),
        }
        for (field, value) in [
            ("timing.ticks_per_hour", t.ticks_per_hour),
            ("timing.hours_per_day", t.hours_per_day),
            ("timing.days_per_year", t.days_per_year),
        ] {
            if value == 0 {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }

        let c = &self.charging;
        if !(c.power_kw.is_finite() && c.power_kw > 0.0) {
            errors.push(ConfigError::new("charging.power_kw", "must be > 0"));
        }
        if !(c.kwh_per_100km.is_finite() && c.kwh_per_100km > 0.0) {
            errors.push(ConfigError::new("charging.kwh_per_100km", "must be > 0"));
        }

        let hourly = &self.arrivals.hourly_probabilities;
        if hourly.len() != t.hours_per_day {
            errors.push(ConfigError::new(
                "arrivals.hourly_probabilities",
                format!(
                    "must have {} entries (timing.hours_per_day), got {}",
                    t.hours_per_day,
                    hourly.len()
                ),
            ));
        }
        if hourly.iter().any(|p| !(0.0..=1.0).contains(p)) {
            errors.push(ConfigError::new(
                "arrivals.hourly_probabilities",
                "entries must be in [0.0, 1.0]",
            ));
        }
        if hourly.iter().all(|p| *p == 0.0) {
            errors.push(ConfigError::new(
                "arrivals.hourly_probabilities",
                "must contain at least one non-zero probability",
            ));
        }

        if self.demand.is_empty() {
            errors.push(ConfigError::new("demand", "must contain at least one entry"));
        }
        for (i, d) in self.demand.iter().enumerate() {
            if !(d.distance_km.is_finite() && d.distance_km >= 0.0) {
                errors.push(ConfigError::new(format!("demand[{i}].distance_km"), "must be >= 0"));
            }
            if !(0.0..=1.0).contains(&d.probability) {
                errors.push(ConfigError::new(
                    format!("demand[{i}].probability"),
                    "must be in [0.0, 1.0]",
                ));
            }
        }

        errors
    }

    /// Builds the engine configuration for this scenario.
    ///
    /// Expects a scenario that passed [`ScenarioConfig::validate`]; an
    /// overflowing year length saturates the tick budget.
    pub fn to_sim_config(&self) -> SimConfig {
        let t = &self.timing;
        SimConfig {
            num_chargepoints: self.simulation.num_chargepoints,
            seed: self.simulation.seed,
            verbose_logging: self.simulation.verbose_logging,
            max_ticks: self.total_ticks().unwrap_or(usize::MAX),
            ticks_per_hour: t.ticks_per_hour,
            hours_per_day: t.hours_per_day,
            days_per_year: t.days_per_year,
            power_kw: self.charging.power_kw,
            kwh_per_100km: self.charging.kwh_per_100km,
            hourly_arrival_probabilities: self.arrivals.hourly_probabilities.clone(),
            demand_distribution: self
                .demand
                .iter()
                .map(|d| WeightedValue::new(d.distance_km, d.probability))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
        assert_eq!(cfg.total_ticks(), Some(35_040));
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
num_chargepoints = 8
seed = -42
verbose_logging = true
max_ticks = 960

[timing]
ticks_per_hour = 2
hours_per_day = 24
days_per_year = 365

[charging]
power_kw = 22.0
kwh_per_100km = 20.0

[arrivals]
hourly_probabilities = [
    0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.02, 0.05,
    0.08, 0.08, 0.06, 0.06, 0.06, 0.06, 0.06, 0.07,
    0.09, 0.09, 0.06, 0.04, 0.03, 0.02, 0.01, 0.01,
]

[[demand]]
distance_km = 0.0
probability = 0.4

[[demand]]
distance_km = 50.0
probability = 0.6
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.num_chargepoints), Some(8));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(-42));
        assert_eq!(cfg.as_ref().and_then(|c| c.total_ticks()), Some(960));
        assert_eq!(cfg.as_ref().map(|c| c.demand.len()), Some(2));
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
num_chargepoints = 4
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.num_chargepoints), Some(20));
        assert_eq!(cfg.as_ref().map(|c| c.charging.power_kw), Some(11.0));
        assert_eq!(cfg.as_ref().map(|c| c.demand.len()), Some(9));
    }

    #[test]
    fn validation_catches_zero_chargepoints() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.num_chargepoints = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.num_chargepoints"));
    }

    #[test]
    fn validation_catches_all_zero_hourly_table() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.arrivals.hourly_probabilities = vec![0.0; 24];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "arrivals.hourly_probabilities"));
    }

    #[test]
    fn validation_catches_short_hourly_table() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.arrivals.hourly_probabilities.pop();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.message.contains("23")));
    }

    #[test]
    fn validation_rejects_multi_year_budget() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.max_ticks = Some(35_041);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.max_ticks"));
    }

    #[test]
    fn overflowing_timing_is_reported_not_panicking() {
        let toml = r#"
[timing]
ticks_per_hour = 10000000
hours_per_day = 10000000
days_per_year = 10000000
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).expect("large values still parse");
        assert_eq!(cfg.timing.ticks_per_year(), None);
        assert_eq!(cfg.total_ticks(), None);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "timing"), "{errors:?}");
        assert_eq!(cfg.to_sim_config().max_ticks, usize::MAX);
    }

    #[test]
    fn validation_caps_station_size() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.num_chargepoints = ScenarioConfig::MAX_CHARGEPOINTS;
        assert!(cfg.validate().is_empty());
        cfg.simulation.num_chargepoints = 100_000_000;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.num_chargepoints"));
    }

    #[test]
    fn validation_catches_empty_demand() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.demand.clear();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "demand"));
    }

    #[test]
    fn validation_catches_negative_distance() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.demand[1].distance_km = -5.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "demand[1].distance_km"));
    }

    #[test]
    fn to_sim_config_carries_every_field() {
        let mut scenario = ScenarioConfig::small_lot();
        scenario.simulation.max_ticks = Some(10);
        let cfg = scenario.to_sim_config();
        assert_eq!(cfg.num_chargepoints, 4);
        assert_eq!(cfg.power_kw, 22.0);
        assert_eq!(cfg.max_ticks, 10);
        assert_eq!(cfg.dt_hours(), 0.25);
        assert_eq!(cfg.demand_distribution.len(), 9);
        assert!(cfg.check_model().is_ok());
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::new("charging.power_kw", "must be > 0");
        assert_eq!(e.to_string(), "config error: charging.power_kw: must be > 0");
    }
}
