//! One-pole low-pass filter.

/// Offset added on every step so the state never decays into denormals.
const ANTI_DENORMAL: f32 = 1e-20;

#[derive(Debug, Default, Clone, Copy)]
pub struct OnePoleLowPass {
    coefficient: f32,
    state: f32,
}

impl OnePoleLowPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cutoff from a frequency in Hz using the small-angle approximation
    /// `2π·f/fs`, which is accurate enough well below Nyquist.
    pub fn init(&mut self, cutoff_hz: f32, sample_rate: f32) {
        self.coefficient = 6.28 * cutoff_hz / sample_rate;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        self.state += self.coefficient * (in_ - self.state) + ANTI_DENORMAL;
        self.state
    }
}
