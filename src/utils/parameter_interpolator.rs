//! Linear interpolation of parameters in rendering loops.

#[allow(unused_imports)]
use num_traits::float::Float;

/// Distance to the target below which a ramp snaps to it instead of interpolating.
const SNAP_THRESHOLD: f32 = 1e-9;

/// Linear ramp towards a target value.
///
/// The increment is recomputed by the caller at a fixed interval with [`Ramp::retarget`]
/// and read per sample with [`Ramp::subsample`].
#[derive(Debug, Clone, Copy)]
pub struct Ramp {
    value: f32,
    target: f32,
    increment: f32,
}

impl Default for Ramp {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Ramp {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            target: value,
            increment: 0.0,
        }
    }

    pub fn init(&mut self, value: f32) {
        *self = Self::new(value);
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn increment(&self) -> f32 {
        self.increment
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Sets the value the next [`Ramp::retarget`] will aim for.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Aims the ramp at the target over `size` samples, or jumps there directly when the
    /// remaining distance is negligible.
    #[inline]
    pub fn retarget(&mut self, size: usize) {
        let delta = self.target - self.value;
        if delta.abs() < SNAP_THRESHOLD {
            self.value = self.target;
            self.increment = 0.0;
        } else {
            self.increment = delta / (size as f32);
        }
    }

    /// Value the ramp would have after `t` more samples, without advancing it.
    #[inline]
    pub fn subsample(&self, t: f32) -> f32 {
        self.value + self.increment * t
    }

    /// Moves the ramp to where it would be after `t` samples.
    #[inline]
    pub fn advance(&mut self, t: usize) {
        self.value += self.increment * (t as f32);
    }
}
