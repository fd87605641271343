/// A tick counter over a fixed budget, aware of the day/hour calendar.
///
/// # Examples
///
/// ```
/// use ev_station_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3, 4, 24);
/// let mut ticks = Vec::new();
///
/// while let Some(tick) = clock.tick() {
///     ticks.push(tick);
/// }
/// assert_eq!(ticks, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Next tick to hand out.
    current: usize,
    /// Tick budget for the run.
    total: usize,
    ticks_per_hour: usize,
    hours_per_day: usize,
}

impl Clock {
    /// Creates a clock that will hand out `total` ticks.
    ///
    /// # Panics
    ///
    /// Panics if `ticks_per_hour` or `hours_per_day` is zero.
    pub fn new(total: usize, ticks_per_hour: usize, hours_per_day: usize) -> Self {
        assert!(ticks_per_hour > 0, "ticks_per_hour must be > 0");
        assert!(hours_per_day > 0, "hours_per_day must be > 0");
        Self {
            current: 0,
            total,
            ticks_per_hour,
            hours_per_day,
        }
    }

    /// Returns the next tick and advances, or `None` once the budget is spent.
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let tick = self.current;
            self.current += 1;
            Some(tick)
        } else {
            None
        }
    }

    /// Ticks already handed out.
    pub fn elapsed(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.total
    }

    pub fn ticks_per_day(&self) -> usize {
        self.ticks_per_hour * self.hours_per_day
    }

    /// Hour of day that `tick` falls into, `0..hours_per_day`.
    pub fn hour_of_day(&self, tick: usize) -> usize {
        (tick % self.ticks_per_day()) / self.ticks_per_hour
    }

    /// Zero-based day that `tick` falls into.
    pub fn day(&self, tick: usize) -> usize {
        tick / self.ticks_per_day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_until_budget_spent() {
        let mut clock = Clock::new(2, 4, 24);
        assert_eq!(clock.tick(), Some(0));
        assert_eq!(clock.tick(), Some(1));
        assert_eq!(clock.tick(), None);
        assert!(clock.is_finished());
        assert_eq!(clock.elapsed(), 2);
    }

    #[test]
    fn empty_budget_hands_out_nothing() {
        let mut clock = Clock::new(0, 4, 24);
        assert!(clock.is_finished());
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn hour_of_day_at_quarter_hour_resolution() {
        let clock = Clock::new(35_040, 4, 24);
        assert_eq!(clock.ticks_per_day(), 96);
        assert_eq!(clock.hour_of_day(0), 0);
        assert_eq!(clock.hour_of_day(3), 0);
        assert_eq!(clock.hour_of_day(4), 1);
        assert_eq!(clock.hour_of_day(95), 23);
        assert_eq!(clock.hour_of_day(96), 0);
        assert_eq!(clock.hour_of_day(96 + 4 * 18 + 2), 18);
    }

    #[test]
    fn day_index() {
        let clock = Clock::new(35_040, 4, 24);
        assert_eq!(clock.day(95), 0);
        assert_eq!(clock.day(96), 1);
        assert_eq!(clock.day(35_039), 364);
    }

    #[test]
    #[should_panic]
    fn zero_ticks_per_hour_panics() {
        Clock::new(10, 0, 24);
    }
}
