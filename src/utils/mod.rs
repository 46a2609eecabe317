//! Utility functions.
//!
//! Small building blocks shared by the limiter engine: filters, ramps and ring buffers.

pub mod delay_line;
pub mod filter;
pub mod parameter_interpolator;
pub mod sliding_minimum;

#[allow(unused_imports)]
use num_traits::float::Float;

/// Converts a level in decibels to a linear gain factor.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(0.05 * db)
}

/// Converts a linear gain factor to decibels.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}

#[inline]
pub fn one_pole(out: &mut f32, in_: f32, coefficient: f32) {
    *out += coefficient * (in_ - *out);
}

/// One-pole step with separate coefficients for falling and rising input.
#[inline]
pub fn attack_release(out: &mut f32, in_: f32, attack: f32, release: f32) {
    let coefficient = if in_ < *out { attack } else { release };
    *out += coefficient * (in_ - *out);
}

/// Gain that brings `peak` down to unity, or unity if it is already there.
#[inline]
pub fn safe_gain(peak: f32) -> f32 {
    if peak > 1.0 {
        1.0 / peak
    } else {
        1.0
    }
}
