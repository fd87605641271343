//! Seeded random stream for reproducible arrival and demand sampling.
//!
//! Implements the Park–Miller "minimal standard" multiplicative linear
//! congruential generator. Each draw mutates a single 31-bit state
//! register, so a run is fully determined by its seed.

/// Modulus of the generator, the Mersenne prime `2^31 - 1`.
const MODULUS: i64 = 2_147_483_647;
/// Multiplier of the generator, `7^5`.
const MULTIPLIER: i64 = 16_807;
/// Largest state value; also the divisor that maps states onto `[0, 1)`.
const MAX_STATE: i64 = MODULUS - 1;

/// Deterministic uniform random stream.
///
/// # Examples
///
/// ```
/// use ev_station_sim::sim::rng::SeededStream;
///
/// let mut a = SeededStream::new(42);
/// let mut b = SeededStream::new(42);
/// assert_eq!(a.next_f64(), b.next_f64());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededStream {
    state: i64,
}

impl SeededStream {
    /// Creates a stream from an arbitrary integer seed.
    ///
    /// The seed is reduced modulo `2^31 - 1`; zero and negative results are
    /// shifted into `[1, 2^31 - 2]` so every seed yields a full-period stream.
    pub fn new(seed: i64) -> Self {
        let mut state = seed % MODULUS;
        if state <= 0 {
            state += MAX_STATE;
        }
        // -(2^31 - 2) lands on zero, the generator's fixed point
        if state == 0 {
            state = MAX_STATE;
        }
        Self { state }
    }

    /// Advances the state and returns a float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        (self.state - 1) as f64 / MAX_STATE as f64
    }

    /// Returns an integer in `[min, max)` using one draw.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        (self.next_f64() * (max - min) as f64).floor() as i64 + min
    }

    /// Current value of the state register.
    pub fn state(&self) -> i64 {
        self.state
    }
}

/// A source of uniform floats in `[0, 1)`.
///
/// The engine and the weighted sampler draw through this trait so tests can
/// feed scripted values.
pub trait UniformSource {
    /// Returns the next float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl UniformSource for SeededStream {
    fn next_f64(&mut self) -> f64 {
        SeededStream::next_f64(self)
    }
}
