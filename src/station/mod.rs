//! Charging station entities: vehicles, chargepoints, and the station pool.

/// Single-vehicle charging slot and its idle/occupied state machine.
pub mod chargepoint;
/// Energy accumulator for one connected EV.
pub mod vehicle;

pub use chargepoint::{ChargeTick, Chargepoint};
pub use vehicle::Vehicle;

/// A fixed, ordered pool of identical chargepoints.
///
/// Membership never changes after construction; chargepoint `i` always sits
/// at index `i`.
#[derive(Debug, Clone)]
pub struct Station {
    chargepoints: Vec<Chargepoint>,
}

impl Station {
    /// Builds a station of `count` idle chargepoints.
    ///
    /// A count of zero is accepted; such a station never takes a vehicle.
    pub fn new(count: usize, power_kw: f64, dt_hours: f64) -> Self {
        let chargepoints = (0..count)
            .map(|id| Chargepoint::new(id, power_kw, dt_hours))
            .collect();
        Self { chargepoints }
    }

    /// Returns the lowest-indexed idle chargepoint, if any.
    pub fn find_available_chargepoint(&mut self) -> Option<&mut Chargepoint> {
        self.chargepoints.iter_mut().find(|cp| cp.is_idle())
    }

    pub fn total_chargepoints(&self) -> usize {
        self.chargepoints.len()
    }

    /// Number of chargepoints currently holding a vehicle.
    pub fn occupied_count(&self) -> usize {
        self.chargepoints.iter().filter(|cp| cp.is_occupied()).count()
    }

    /// Sum of rated power over all chargepoints (kW).
    pub fn theoretical_max_power_kw(&self) -> f64 {
        self.chargepoints.iter().map(Chargepoint::power_kw).sum()
    }

    pub fn chargepoints(&self) -> &[Chargepoint] {
        &self.chargepoints
    }

    pub fn chargepoints_mut(&mut self) -> &mut [Chargepoint] {
        &mut self.chargepoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fit_prefers_lowest_index() {
        let mut station = Station::new(2, 11.0, 0.25);
        assert_eq!(station.find_available_chargepoint().map(|cp| cp.id()), Some(0));
        assert_eq!(station.find_available_chargepoint().map(|cp| cp.id()), Some(0));
    }

    #[test]
    fn skips_occupied_chargepoints() {
        let mut station = Station::new(3, 11.0, 0.25);
        if let Some(cp) = station.find_available_chargepoint() {
            assert!(cp.assign_ev(Vehicle::new(1, 20.0)));
        }
        assert_eq!(station.find_available_chargepoint().map(|cp| cp.id()), Some(1));
        assert_eq!(station.occupied_count(), 1);
    }

    #[test]
    fn full_station_has_no_available_chargepoint() {
        let mut station = Station::new(2, 11.0, 0.25);
        for id in 1..=2 {
            let assigned = station
                .find_available_chargepoint()
                .map(|cp| cp.assign_ev(Vehicle::new(id, 20.0)));
            assert_eq!(assigned, Some(true));
        }
        assert!(station.find_available_chargepoint().is_none());
    }

    #[test]
    fn released_chargepoint_is_available_on_next_check() {
        let mut station = Station::new(2, 11.0, 0.25);
        for (idx, need) in [(0, 1.0), (1, 50.0)] {
            assert!(station.chargepoints_mut()[idx].assign_ev(Vehicle::new(idx as u64 + 1, need)));
        }
        assert!(station.find_available_chargepoint().is_none());

        let tick = station.chargepoints_mut()[0].process_charging_tick();
        assert!(tick.released.is_some());
        assert_eq!(station.find_available_chargepoint().map(|cp| cp.id()), Some(0));
    }

    #[test]
    fn empty_station() {
        let mut station = Station::new(0, 11.0, 0.25);
        assert_eq!(station.total_chargepoints(), 0);
        assert!(station.find_available_chargepoint().is_none());
        assert_eq!(station.theoretical_max_power_kw(), 0.0);
    }

    #[test]
    fn theoretical_max_is_sum_of_ratings() {
        let station = Station::new(20, 11.0, 0.25);
        assert_eq!(station.total_chargepoints(), 20);
        assert_eq!(station.theoretical_max_power_kw(), 220.0);
    }
}
