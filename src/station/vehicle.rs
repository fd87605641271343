/// Tolerance (kWh) under which a vehicle counts as fully charged.
///
/// Fractional per-tick deliveries accumulate rounding error, so the target is
/// never compared for exact equality.
pub const FULL_CHARGE_EPSILON_KWH: f64 = 0.0001;

/// An electric vehicle connected for one charging session.
///
/// Invariant: `0 <= energy_received_kwh <= energy_needed_kwh`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: u64,
    energy_needed_kwh: f64,
    energy_received_kwh: f64,
}

impl Vehicle {
    /// Creates a vehicle with an energy demand and nothing received yet.
    ///
    /// Callers should only create vehicles with a strictly positive need;
    /// chargepoints refuse anything else.
    pub fn new(id: u64, energy_needed_kwh: f64) -> Self {
        Self {
            id,
            energy_needed_kwh,
            energy_received_kwh: 0.0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn energy_needed_kwh(&self) -> f64 {
        self.energy_needed_kwh
    }

    pub fn energy_received_kwh(&self) -> f64 {
        self.energy_received_kwh
    }

    /// Energy still missing to reach the target (never negative).
    pub fn remaining_kwh(&self) -> f64 {
        (self.energy_needed_kwh - self.energy_received_kwh).max(0.0)
    }

    /// Offers `amount_kwh` and returns how much was actually accepted.
    pub fn charge(&mut self, amount_kwh: f64) -> f64 {
        let delivered = amount_kwh.min(self.remaining_kwh()).max(0.0);
        self.energy_received_kwh += delivered;
        delivered
    }

    pub fn is_fully_charged(&self) -> bool {
        self.energy_received_kwh >= self.energy_needed_kwh - FULL_CHARGE_EPSILON_KWH
    }
}
