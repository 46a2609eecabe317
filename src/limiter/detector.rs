//! Peak detection between decimation boundaries.
//!
//! Two running peaks are collected: one of the gained signal itself and one of a 500 Hz
//! low-passed copy. Low frequencies need a longer hold before the gain may recover, so the
//! low-passed peak feeds the slow sliding minimum.

use super::MAX_CHANNELS;
use crate::utils::filter::OnePoleLowPass;

#[allow(unused_imports)]
use num_traits::float::Float;

/// Cutoff of the low-pass used for the slow peak, in Hz.
pub const LOW_PASS_CUTOFF: f32 = 500.0;

#[derive(Debug, Default, Clone)]
pub struct PeakDetector {
    peak: f32,
    low_peak: f32,
    low_pass: [OnePoleLowPass; MAX_CHANNELS],
}

impl PeakDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, sample_rate: f32) {
        self.peak = 0.0;
        self.low_peak = 0.0;
        for filter in self.low_pass.iter_mut() {
            filter.init(LOW_PASS_CUTOFF, sample_rate);
        }
    }

    #[inline]
    pub fn process(&mut self, channel: usize, sample: f32) {
        let low = self.low_pass[channel].process(sample);
        self.peak = self.peak.max(sample.abs());
        self.low_peak = self.low_peak.max(low.abs());
    }

    /// Returns the peak since the last call and starts a new one.
    #[inline]
    pub fn take_peak(&mut self) -> f32 {
        core::mem::take(&mut self.peak)
    }

    /// Returns the low-passed peak since the last call and starts a new one.
    #[inline]
    pub fn take_low_peak(&mut self) -> f32 {
        core::mem::take(&mut self.low_peak)
    }
}
