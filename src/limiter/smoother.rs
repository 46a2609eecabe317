//! Three-stage gain smoothing.
//!
//! Two one-pole filters follow the fast and slow sliding minima. The tighter of the two
//! drives the output stage, which moves quickly towards more reduction and at the release
//! rate towards less.

use crate::utils::{attack_release, one_pole};

/// Fast and attack coefficient, per sample, times the look-ahead delay.
const ATTACK_PER_DELAY: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct GainSmoother {
    fast: f32,
    slow: f32,
    gain: f32,
    fast_coefficient: f32,
    slow_coefficient: f32,
    release_coefficient: f32,
}

impl Default for GainSmoother {
    fn default() -> Self {
        Self::new()
    }
}

impl GainSmoother {
    pub fn new() -> Self {
        Self {
            fast: 1.0,
            slow: 1.0,
            gain: 1.0,
            fast_coefficient: 0.0,
            slow_coefficient: 0.0,
            release_coefficient: 0.0,
        }
    }

    /// Sets all stages to unity and derives the coefficients from the look-ahead `delay`
    /// and the slow decimation period. Release starts at `release` seconds.
    pub fn init(&mut self, delay: usize, slow_period: usize, release: f32, sample_rate: f32) {
        self.fast = 1.0;
        self.slow = 1.0;
        self.gain = 1.0;
        self.fast_coefficient = ATTACK_PER_DELAY / (delay as f32);
        self.slow_coefficient = self.fast_coefficient / (slow_period as f32);
        self.set_release(release, sample_rate);
    }

    pub fn set_release(&mut self, seconds: f32, sample_rate: f32) {
        self.release_coefficient = 1.0 / (seconds * sample_rate);
    }

    /// Advances all stages by one sample and returns the output gain.
    #[inline]
    pub fn process(&mut self, fast_minimum: f32, slow_minimum: f32) -> f32 {
        one_pole(&mut self.fast, fast_minimum, self.fast_coefficient);
        one_pole(&mut self.slow, slow_minimum, self.slow_coefficient);
        let target = self.slow.min(self.fast);
        attack_release(
            &mut self.gain,
            target,
            self.fast_coefficient,
            self.release_coefficient,
        );
        self.gain
    }

    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn fast_coefficient(&self) -> f32 {
        self.fast_coefficient
    }

    pub fn slow_coefficient(&self) -> f32 {
        self.slow_coefficient
    }

    pub fn release_coefficient(&self) -> f32 {
        self.release_coefficient
    }
}
