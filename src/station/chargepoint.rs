use super::vehicle::Vehicle;

/// Result of one charging tick on a chargepoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeTick {
    /// Energy actually delivered during the tick (kWh).
    pub delivered_kwh: f64,
    /// Id of the vehicle that was charged, if any.
    pub vehicle_id: Option<u64>,
    /// The vehicle, if it became fully charged and was released.
    pub released: Option<Vehicle>,
}

/// A single charging slot with a fixed power rating.
///
/// Two states: idle (no vehicle) and occupied (exactly one vehicle). The
/// chargepoint owns its vehicle for the whole session and hands it back
/// through [`ChargeTick::released`] or [`Chargepoint::release_ev`].
#[derive(Debug, Clone)]
pub struct Chargepoint {
    id: usize,
    power_kw: f64,
    /// Duration of one tick in hours.
    dt_hours: f64,
    vehicle: Option<Vehicle>,
}

impl Chargepoint {
    /// Creates an idle chargepoint.
    ///
    /// # Arguments
    ///
    /// * `id` - Index within the station
    /// * `power_kw` - Rated charging power
    /// * `dt_hours` - Tick duration, `1 / ticks_per_hour`
    pub fn new(id: usize, power_kw: f64, dt_hours: f64) -> Self {
        Self {
            id,
            power_kw,
            dt_hours,
            vehicle: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn power_kw(&self) -> f64 {
        self.power_kw
    }

    /// Energy this chargepoint can deliver in one tick at rated power.
    pub fn energy_per_tick_kwh(&self) -> f64 {
        self.power_kw * self.dt_hours
    }

    pub fn is_idle(&self) -> bool {
        self.vehicle.is_none()
    }

    pub fn is_occupied(&self) -> bool {
        self.vehicle.is_some()
    }

    /// The vehicle currently connected, if any.
    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    /// Connects `vehicle`. Returns `false` and drops the vehicle if the
    /// chargepoint is busy or the vehicle needs no energy.
    ///
    /// Assignment delivers nothing; the first energy arrives with the next
    /// call to [`Chargepoint::process_charging_tick`].
    pub fn assign_ev(&mut self, vehicle: Vehicle) -> bool {
        if self.is_occupied() || vehicle.energy_needed_kwh() <= 0.0 {
            return false;
        }
        self.vehicle = Some(vehicle);
        true
    }

    /// Delivers one tick of energy to the connected vehicle.
    ///
    /// Releases the vehicle within the same call once it is fully charged.
    /// On an idle chargepoint this is a no-op that delivers nothing.
    pub fn process_charging_tick(&mut self) -> ChargeTick {
        let offer_kwh = self.energy_per_tick_kwh();
        let Some(vehicle) = self.vehicle.as_mut() else {
            return ChargeTick::default();
        };

        let delivered_kwh = vehicle.charge(offer_kwh);
        let vehicle_id = Some(vehicle.id());
        let released = if vehicle.is_fully_charged() {
            self.vehicle.take()
        } else {
            None
        };

        ChargeTick {
            delivered_kwh,
            vehicle_id,
            released,
        }
    }

    /// Disconnects the vehicle regardless of its charge level.
    ///
    /// Returns `None` when the chargepoint was already idle.
    pub fn release_ev(&mut self) -> Option<Vehicle> {
        self.vehicle.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp() -> Chargepoint {
        Chargepoint::new(0, 11.0, 0.25)
    }

    #[test]
    fn idle_tick_is_noop() {
        let mut c = cp();
        let tick = c.process_charging_tick();
        assert_eq!(tick.delivered_kwh, 0.0);
        assert!(tick.vehicle_id.is_none());
        assert!(c.is_idle());
    }

    #[test]
    fn assign_then_deliver_rated_energy() {
        let mut c = cp();
        assert!(c.assign_ev(Vehicle::new(1, 18.0)));
        assert!(c.is_occupied());
        assert_eq!(c.vehicle().map(Vehicle::energy_received_kwh), Some(0.0));

        let tick = c.process_charging_tick();
        assert_eq!(tick.delivered_kwh, 2.75);
        assert_eq!(tick.vehicle_id, Some(1));
        assert!(tick.released.is_none());
        assert!(c.is_occupied());
    }

    #[test]
    fn assign_to_occupied_is_rejected() {
        let mut c = cp();
        assert!(c.assign_ev(Vehicle::new(1, 9.0)));
        assert!(!c.assign_ev(Vehicle::new(2, 4.0)));
        assert_eq!(c.vehicle().map(Vehicle::id), Some(1));
        assert_eq!(c.vehicle().map(Vehicle::energy_needed_kwh), Some(9.0));
    }

    #[test]
    fn zero_need_vehicle_is_rejected() {
        let mut c = cp();
        assert!(!c.assign_ev(Vehicle::new(1, 0.0)));
        assert!(!c.assign_ev(Vehicle::new(2, -3.0)));
        assert!(c.is_idle());
    }

    #[test]
    fn releases_in_the_completing_tick() {
        let mut c = cp();
        assert!(c.assign_ev(Vehicle::new(7, 0.9)));
        let tick = c.process_charging_tick();
        assert!((tick.delivered_kwh - 0.9).abs() < 1e-12);
        let released = tick.released.as_ref().map(Vehicle::id);
        assert_eq!(released, Some(7));
        assert!(c.is_idle());
    }

    #[test]
    fn short_final_tick_delivers_remainder() {
        let mut c = cp();
        assert!(c.assign_ev(Vehicle::new(3, 3.0)));
        assert_eq!(c.process_charging_tick().delivered_kwh, 2.75);
        let last = c.process_charging_tick();
        assert!((last.delivered_kwh - 0.25).abs() < 1e-12);
        assert!(last.released.is_some());
    }

    #[test]
    fn explicit_release_is_idempotent() {
        let mut c = cp();
        assert!(c.release_ev().is_none());
        assert!(c.assign_ev(Vehicle::new(1, 5.0)));
        assert_eq!(c.release_ev().map(|v| v.id()), Some(1));
        assert!(c.release_ev().is_none());
        assert!(c.is_idle());
    }
}
