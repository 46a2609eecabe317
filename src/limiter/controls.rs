//! User controls shared between a control thread and the audio thread.
//!
//! Setters convert from user units once and store the result atomically. The engine latches
//! all values at the start of each processing call, so a change takes effect with the next
//! block.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use atomic_float::AtomicF32;

use crate::utils::db_to_gain;

/// Shortest release time in seconds.
pub const MIN_RELEASE: f32 = 1e-3;

/// Longest release time in seconds.
pub const MAX_RELEASE: f32 = 1.0;

/// Release time in seconds after initialisation.
pub const DEFAULT_RELEASE: f32 = 0.01;

#[derive(Debug)]
struct Controls {
    input_gain: AtomicF32,
    threshold_gain: AtomicF32,
    release: AtomicF32,
    true_peak: AtomicBool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            input_gain: AtomicF32::new(1.0),
            threshold_gain: AtomicF32::new(1.0),
            release: AtomicF32::new(DEFAULT_RELEASE),
            true_peak: AtomicBool::new(false),
        }
    }
}

/// Cloneable handle to the controls of one [`PeakLimiter`](super::PeakLimiter).
#[derive(Debug, Clone, Default)]
pub struct ControlHandle {
    controls: Arc<Controls>,
}

impl ControlHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Restores every control to its initial value.
    pub(crate) fn reset(&self) {
        self.controls.input_gain.store(1.0, Ordering::Relaxed);
        self.controls.threshold_gain.store(1.0, Ordering::Relaxed);
        self.controls.release.store(DEFAULT_RELEASE, Ordering::Relaxed);
        self.controls.true_peak.store(false, Ordering::Relaxed);
    }

    /// Sets the input gain in dB. The engine ramps towards it.
    pub fn set_input_gain(&self, db: f32) {
        self.controls
            .input_gain
            .store(db_to_gain(db), Ordering::Relaxed);
    }

    /// Sets the threshold in dBFS.
    pub fn set_threshold(&self, db: f32) {
        self.controls
            .threshold_gain
            .store(db_to_gain(-db), Ordering::Relaxed);
    }

    /// Sets the release time in seconds, clamped to `MIN_RELEASE..=MAX_RELEASE`.
    pub fn set_release(&self, seconds: f32) {
        let seconds = seconds.clamp(MIN_RELEASE, MAX_RELEASE);
        self.controls.release.store(seconds, Ordering::Relaxed);
    }

    /// Stores the true-peak flag. Detection works on sample peaks either way.
    pub fn set_true_peak(&self, enabled: bool) {
        self.controls.true_peak.store(enabled, Ordering::Relaxed);
    }

    /// Linear input gain target.
    pub fn input_gain(&self) -> f32 {
        self.controls.input_gain.load(Ordering::Relaxed)
    }

    /// Inverse of the linear threshold; scales detected peaks so that 1.0 is the threshold.
    pub fn threshold_gain(&self) -> f32 {
        self.controls.threshold_gain.load(Ordering::Relaxed)
    }

    /// Release time in seconds.
    pub fn release(&self) -> f32 {
        self.controls.release.load(Ordering::Relaxed)
    }

    pub fn true_peak(&self) -> bool {
        self.controls.true_peak.load(Ordering::Relaxed)
    }
}
