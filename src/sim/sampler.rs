//! Weighted choice over a discrete probability table.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

use super::rng::UniformSource;

/// One entry of a discrete distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedValue<T> {
    /// Value returned when this entry is selected.
    pub value: T,
    /// Probability mass of this entry.
    pub probability: f64,
}

impl<T> WeightedValue<T> {
    /// Creates a new table entry.
    pub const fn new(value: T, probability: f64) -> Self {
        Self { value, probability }
    }
}

/// Draws one value from `distribution` using exactly one draw from `rng`.
///
/// Entries are walked in order, accumulating probability; the first entry
/// whose running sum strictly exceeds the draw wins. Tables that sum to
/// slightly less than one fall back to the last entry.
///
/// # Errors
///
/// Returns [`SimError::InvalidArgument`] if `distribution` is empty. No draw
/// is consumed in that case.
pub fn weighted_choice<T: Copy>(
    distribution: &[WeightedValue<T>],
    rng: &mut impl UniformSource,
) -> Result<T, SimError> {
    let Some(last) = distribution.last() else {
        return Err(SimError::invalid("weighted choice over an empty distribution"));
    };

    let r = rng.next_f64();
    let mut cumulative = 0.0;
    for entry in distribution {
        cumulative += entry.probability;
        if cumulative > r {
            return Ok(entry.value);
        }
    }
    Ok(last.value)
}
