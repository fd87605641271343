//! Post-hoc KPI computation from simulation results.

use std::fmt;

use serde::Serialize;

use super::types::TickResult;

/// Aggregate indicators derived from a complete run.
///
/// Computed from the tick records, so the totals must agree with the
/// engine's running [`Statistics`](super::stats::Statistics).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    /// Chargepoints in the station.
    pub num_chargepoints: usize,
    /// Ticks simulated.
    pub ticks: usize,
    /// Total energy delivered (kWh).
    pub total_energy_consumed_kwh: f64,
    /// Highest observed power demand (kW).
    pub actual_max_power_demand_kw: f64,
    /// Power demand with every chargepoint busy (kW).
    pub theoretical_max_power_kw: f64,
    /// `actual / theoretical` as a percentage.
    pub concurrency_factor_pct: f64,
    /// Vehicles connected for charging.
    pub vehicles_served: usize,
    /// Arrivals that did not need a charge.
    pub no_charge_arrivals: usize,
    /// Vehicles released fully charged.
    pub completed_sessions: usize,
    /// Share of chargepoint-ticks spent occupied, as a percentage.
    pub mean_occupancy_pct: f64,
    /// First tick at which the peak was reached.
    pub peak_tick: Option<usize>,
}

impl KpiReport {
    /// Computes all KPIs from the tick records of one run.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete tick records
    /// * `num_chargepoints` - Station size
    /// * `power_kw` - Rated power per chargepoint
    pub fn from_results(results: &[TickResult], num_chargepoints: usize, power_kw: f64) -> Self {
        let theoretical_max_power_kw = num_chargepoints as f64 * power_kw;

        let mut total_energy = 0.0_f64;
        let mut peak = 0.0_f64;
        let mut peak_tick = None;
        let mut vehicles_served = 0;
        let mut no_charge_arrivals = 0;
        let mut completed_sessions = 0;
        let mut occupied_ticks = 0_usize;

        for r in results {
            total_energy += r.energy_kwh;
            if r.power_kw > peak {
                peak = r.power_kw;
                peak_tick = Some(r.tick);
            }
            vehicles_served += r.arrivals;
            no_charge_arrivals += r.no_charge_arrivals;
            completed_sessions += r.completed;
            occupied_ticks += r.occupied;
        }

        let slots = results.len() * num_chargepoints;
        let mean_occupancy_pct = if slots > 0 {
            100.0 * occupied_ticks as f64 / slots as f64
        } else {
            0.0
        };

        Self {
            num_chargepoints,
            ticks: results.len(),
            total_energy_consumed_kwh: total_energy,
            actual_max_power_demand_kw: peak,
            theoretical_max_power_kw,
            concurrency_factor_pct: concurrency_factor_pct(peak, theoretical_max_power_kw),
            vehicles_served,
            no_charge_arrivals,
            completed_sessions,
            mean_occupancy_pct,
            peak_tick,
        }
    }
}

/// Ratio of observed to theoretical peak power, in percent.
///
/// Returns `0.0` for a station with no capacity.
pub fn concurrency_factor_pct(actual_kw: f64, theoretical_kw: f64) -> f64 {
    if theoretical_kw > 0.0 {
        100.0 * actual_kw / theoretical_kw
    } else {
        0.0
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Chargepoints:          {}", self.num_chargepoints)?;
        writeln!(f, "Ticks simulated:       {}", self.ticks)?;
        writeln!(f, "Total energy:          {:.2} kWh", self.total_energy_consumed_kwh)?;
        writeln!(f, "Actual max power:      {:.2} kW", self.actual_max_power_demand_kw)?;
        writeln!(f, "Theoretical max power: {:.2} kW", self.theoretical_max_power_kw)?;
        writeln!(f, "Concurrency factor:    {:.2}%", self.concurrency_factor_pct)?;
        writeln!(f, "Vehicles served:       {}", self.vehicles_served)?;
        writeln!(f, "No-charge arrivals:    {}", self.no_charge_arrivals)?;
        writeln!(f, "Completed sessions:    {}", self.completed_sessions)?;
        write!(f, "Mean occupancy:        {:.2}%", self.mean_occupancy_pct)
    }
}

/// Energy and peak power for one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub day: usize,
    /// Energy delivered during the day (kWh).
    pub energy_kwh: f64,
    /// Highest tick power demand during the day (kW).
    pub peak_power_kw: f64,
    pub arrivals: usize,
}

/// Folds tick records into one summary per simulated day.
///
/// Records are expected in tick order, as returned by the engine.
pub fn daily_series(results: &[TickResult]) -> Vec<DailySummary> {
    let mut days: Vec<DailySummary> = Vec::new();
    for r in results {
        match days.last_mut() {
            Some(d) if d.day == r.day => {
                d.energy_kwh += r.energy_kwh;
                d.peak_power_kw = d.peak_power_kw.max(r.power_kw);
                d.arrivals += r.arrivals;
            }
            _ => days.push(DailySummary {
                day: r.day,
                energy_kwh: r.energy_kwh,
                peak_power_kw: r.power_kw,
                arrivals: r.arrivals,
            }),
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(tick: usize, energy_kwh: f64, occupied: usize) -> TickResult {
        TickResult {
            tick,
            day: tick / 4,
            hour: tick % 4,
            energy_kwh,
            power_kw: occupied as f64 * 11.0,
            occupied,
            arrivals: 0,
            no_charge_arrivals: 0,
            completed: 0,
        }
    }

    #[test]
    fn concurrency_factor() {
        // peak of 2 of 4 chargepoints busy
        let results = vec![make_result(0, 2.75, 1), make_result(1, 5.5, 2), make_result(2, 0.0, 0)];
        let kpi = KpiReport::from_results(&results, 4, 11.0);
        assert_eq!(kpi.theoretical_max_power_kw, 44.0);
        assert_eq!(kpi.actual_max_power_demand_kw, 22.0);
        assert_eq!(kpi.concurrency_factor_pct, 50.0);
        assert_eq!(kpi.peak_tick, Some(1));
        assert!((kpi.total_energy_consumed_kwh - 8.25).abs() < 1e-12);
    }

    #[test]
    fn mean_occupancy() {
        // 3 occupied chargepoint-ticks out of 2 chargepoints x 3 ticks
        let results = vec![make_result(0, 0.0, 1), make_result(1, 0.0, 2), make_result(2, 0.0, 0)];
        let kpi = KpiReport::from_results(&results, 2, 11.0);
        assert!((kpi.mean_occupancy_pct - 50.0).abs() < 1e-12);
    }

    #[test]
    fn empty_station_reports_zero() {
        let results = vec![make_result(0, 0.0, 0); 3];
        let kpi = KpiReport::from_results(&results, 0, 11.0);
        assert_eq!(kpi.theoretical_max_power_kw, 0.0);
        assert_eq!(kpi.concurrency_factor_pct, 0.0);
        assert_eq!(kpi.mean_occupancy_pct, 0.0);
        assert_eq!(kpi.peak_tick, None);
    }

    #[test]
    fn empty_results() {
        let kpi = KpiReport::from_results(&[], 20, 11.0);
        assert_eq!(kpi.ticks, 0);
        assert_eq!(kpi.total_energy_consumed_kwh, 0.0);
    }

    #[test]
    fn daily_series_groups_by_day() {
        let results: Vec<TickResult> = (0..8).map(|t| make_result(t, 1.0, t % 3)).collect();
        let days = daily_series(&results);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, 0);
        assert_eq!(days[0].energy_kwh, 4.0);
        assert_eq!(days[0].peak_power_kw, 22.0);
        assert_eq!(days[1].day, 1);
    }

    #[test]
    fn display_has_labels() {
        let kpi = KpiReport::from_results(&[make_result(0, 2.75, 1)], 1, 11.0);
        let s = format!("{kpi}");
        assert!(s.contains("Total energy:"));
        assert!(s.contains("Concurrency factor:"));
    }
}
