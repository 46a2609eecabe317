//! Limiter with bypass, parameter handling and metering, as driven by a plugin host.

use crate::limiter::PeakLimiter;
use crate::meter::{meter_interval, GainHistory, LevelMeter};
use crate::params::{
    ChannelLayout, Parameters, BYPASS_INPUT_GAIN, BYPASS_RELEASE, BYPASS_THRESHOLD,
};

/// Outputs of one [`LimiterProcessor::run`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Level to show on the host's meter, in dB.
    pub level: f32,
    /// Latency to report to the host, in samples.
    pub latency: usize,
    /// At least one gain history entry was added.
    pub history_updated: bool,
}

#[derive(Debug)]
pub struct LimiterProcessor {
    limiter: PeakLimiter,
    layout: ChannelLayout,
    level: LevelMeter,
    history: GainHistory,
    interval: usize,
    sample_count: usize,
    enabled: bool,
}

impl LimiterProcessor {
    pub fn new(sample_rate: f32, layout: ChannelLayout) -> Self {
        let mut limiter = PeakLimiter::new();
        limiter.init(sample_rate, layout.channels());
        let interval = meter_interval(sample_rate).max(1);

        log::info!(
            "{} limiter at {} Hz, latency {} samples",
            layout,
            sample_rate,
            limiter.latency()
        );

        Self {
            limiter,
            layout,
            level: LevelMeter::new(),
            history: GainHistory::new(),
            interval,
            sample_count: 0,
            enabled: true,
        }
    }

    /// Processes separate input and output buffers.
    pub fn run(
        &mut self,
        params: &Parameters,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
    ) -> RunReport {
        self.apply(params);
        let frames = self.limiter.process(inputs, outputs);
        self.meter(frames)
    }

    /// Processes buffers in place.
    pub fn run_in_place(&mut self, params: &Parameters, channels: &mut [&mut [f32]]) -> RunReport {
        self.apply(params);
        let frames = self.limiter.process_in_place(channels);
        self.meter(frames)
    }

    fn apply(&mut self, params: &Parameters) {
        let params = params.clamped();
        self.enabled = params.enable;
        if params.enable {
            self.limiter.set_input_gain(params.input_gain);
            self.limiter.set_threshold(params.threshold);
            self.limiter.set_release(params.release);
        } else {
            self.limiter.set_input_gain(BYPASS_INPUT_GAIN);
            self.limiter.set_threshold(BYPASS_THRESHOLD);
            self.limiter.set_release(BYPASS_RELEASE);
        }
        self.limiter.set_true_peak(params.true_peak);
    }

    fn meter(&mut self, frames: usize) -> RunReport {
        let mut history_updated = false;
        self.sample_count += frames;
        while self.sample_count >= self.interval {
            self.sample_count -= self.interval;
            let stats = self.limiter.stats();
            self.level.update(stats.peak);
            self.history.push(&stats);
            history_updated = true;
        }

        RunReport {
            level: self.level.display_level(self.enabled),
            latency: self.limiter.latency(),
            history_updated,
        }
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn latency(&self) -> usize {
        self.limiter.latency()
    }

    /// Held level in dB, without the display floor.
    pub fn level(&self) -> f32 {
        self.level.level()
    }

    pub fn history(&self) -> &GainHistory {
        &self.history
    }

    pub fn limiter(&self) -> &PeakLimiter {
        &self.limiter
    }
}
