//! Running energy and peak-power aggregates.

use serde::Serialize;

/// Running totals fed once per tick by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    /// Sum of delivered energy over every tick (kWh).
    pub total_energy_consumed_kwh: f64,
    /// Largest per-tick sum of rated power over occupied chargepoints (kW).
    pub actual_max_power_demand_kw: f64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one tick into the aggregates.
    pub fn record_tick(&mut self, energy_kwh: f64, power_demand_kw: f64) {
        self.total_energy_consumed_kwh += energy_kwh;
        if power_demand_kw > self.actual_max_power_demand_kw {
            self.actual_max_power_demand_kw = power_demand_kw;
        }
    }

    /// Zeroes both aggregates.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let s = Statistics::new();
        assert_eq!(s.total_energy_consumed_kwh, 0.0);
        assert_eq!(s.actual_max_power_demand_kw, 0.0);
    }

    #[test]
    fn energy_sums_and_peak_is_max() {
        let mut s = Statistics::new();
        s.record_tick(2.75, 11.0);
        s.record_tick(5.5, 22.0);
        s.record_tick(0.5, 11.0);
        assert!((s.total_energy_consumed_kwh - 8.75).abs() < 1e-12);
        assert_eq!(s.actual_max_power_demand_kw, 22.0);
    }

    #[test]
    fn aggregates_never_decrease() {
        let mut s = Statistics::new();
        let feed = [(1.0, 11.0), (0.0, 0.0), (2.0, 33.0), (0.0, 11.0), (0.3, 22.0)];
        let mut prev = s.clone();
        for (e, p) in feed {
            s.record_tick(e, p);
            assert!(s.total_energy_consumed_kwh >= prev.total_energy_consumed_kwh);
            assert!(s.actual_max_power_demand_kw >= prev.actual_max_power_demand_kw);
            prev = s.clone();
        }
    }

    #[test]
    fn reset_clears_both_fields() {
        let mut s = Statistics::new();
        s.record_tick(3.0, 11.0);
        s.reset();
        assert_eq!(s, Statistics::default());
    }
}
