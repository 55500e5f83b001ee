//! Random variates and candidate-cell generation.
//!
//! Every stochastic decision in the crate goes through the helpers here so a seeded
//! [`rand::RngCore`] fully determines the outcome.
use rand::RngCore;

pub mod jitter_grid;

pub use jitter_grid::JitterGrid;

/// Generate a random float in the range [0, 1].
///
/// `u32::MAX` maps to exactly 1.0; callers needing an open bound clamp with [`next_down`].
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a random float in `[min, max)`, or exactly `min` when the range is empty.
#[inline]
pub fn rand_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    let v = min + rand01(rng) * (max - min);
    v.min(next_down(max))
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// ensuring bounds are strictly inside a cell. Handles edge cases
/// safely including very small positive values and zero.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
