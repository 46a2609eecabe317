//! Look-ahead peak limiter.
//!
//! The input is delayed by a fixed look-ahead while its peaks are measured at two decimated
//! rates. Every fast decimation period the peak of the gained signal is turned into a safe
//! gain and pushed into a short sliding minimum covering the look-ahead; every slow period
//! the peak of a low-passed copy goes into a longer one. The smoothed minimum of both is
//! applied to the delayed signal, so gain reduction is complete by the time a peak leaves
//! the delay line.
//!
//! Processing never allocates, locks or logs. Delay lines are allocated by
//! [`PeakLimiter::init`].

pub mod controls;
pub mod detector;
pub mod smoother;
pub mod stats;

use alloc::sync::Arc;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::delay_line::DelayLine;
use crate::utils::parameter_interpolator::Ramp;
use crate::utils::safe_gain;
use crate::utils::sliding_minimum::{SlidingMinimum, HISTORY_SIZE};

use controls::{ControlHandle, DEFAULT_RELEASE};
use detector::PeakDetector;
use smoother::GainSmoother;
use stats::{Stats, StatsAccumulator, StatsChannel, StatsReader};

/// Maximum number of channels.
pub const MAX_CHANNELS: usize = 2;

/// Look-ahead time in seconds, rounded up to whole fast periods.
pub const LOOKAHEAD_TIME: f32 = 1.2e-3;

/// Number of fast periods per slow period.
pub const SLOW_PERIOD: usize = 8;

/// Window of the slow sliding minimum in slow periods.
pub const SLOW_WINDOW: usize = 12;

/// Samples per fast decimation period for a sample rate.
///
/// Higher rates use coarser decimation so the look-ahead window stays the same in time.
pub fn fast_period(sample_rate: f32) -> usize {
    if sample_rate > 130000.0 {
        32
    } else if sample_rate > 65000.0 {
        16
    } else {
        8
    }
}

/// Digital peak limiter for up to two channels.
#[derive(Debug)]
pub struct PeakLimiter {
    sample_rate: f32,
    channels: usize,
    fast_period: usize,
    delay: usize,
    mask: usize,
    read_ptr: usize,
    lines: [DelayLine; MAX_CHANNELS],
    fast_countdown: usize,
    slow_countdown: usize,
    input_gain: Ramp,
    detector: PeakDetector,
    fast_minimum: SlidingMinimum,
    slow_minimum: SlidingMinimum,
    smoother: GainSmoother,
    accumulator: StatsAccumulator,
    stats: Arc<StatsChannel>,
    controls: ControlHandle,
}

impl Default for PeakLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl PeakLimiter {
    /// Creates an engine without channels. Call [`PeakLimiter::init`] before processing.
    pub fn new() -> Self {
        Self {
            sample_rate: 0.0,
            channels: 0,
            fast_period: 8,
            delay: 0,
            mask: 0,
            read_ptr: 0,
            lines: [DelayLine::new(), DelayLine::new()],
            fast_countdown: 8,
            slow_countdown: SLOW_PERIOD,
            input_gain: Ramp::new(1.0),
            detector: PeakDetector::new(),
            fast_minimum: SlidingMinimum::new(),
            slow_minimum: SlidingMinimum::new(),
            smoother: GainSmoother::new(),
            accumulator: StatsAccumulator::default(),
            stats: Arc::new(StatsChannel::default()),
            controls: ControlHandle::new(),
        }
    }

    /// Prepares the engine for `sample_rate` and `channels`, which is clamped to
    /// `1..=MAX_CHANNELS`. Resets all state and controls; handles obtained from
    /// [`PeakLimiter::controls`] and [`PeakLimiter::stats_reader`] stay connected.
    pub fn init(&mut self, sample_rate: f32, channels: usize) {
        let channels = channels.clamp(1, MAX_CHANNELS);
        let fast_period = fast_period(sample_rate);
        let fast_window = ((LOOKAHEAD_TIME * sample_rate / (fast_period as f32)).ceil() as usize)
            .clamp(1, HISTORY_SIZE - 1);
        let delay = fast_window * fast_period;

        self.sample_rate = sample_rate;
        self.channels = channels;
        self.fast_period = fast_period;
        self.delay = delay;
        self.read_ptr = 0;

        for (channel, line) in self.lines.iter_mut().enumerate() {
            if channel < channels {
                line.init(delay + fast_period);
            } else {
                *line = DelayLine::new();
            }
        }
        self.mask = self.lines[0].mask();

        self.fast_minimum.init(fast_window + 1);
        self.slow_minimum.init(SLOW_WINDOW);
        self.fast_countdown = fast_period;
        self.slow_countdown = SLOW_PERIOD;
        self.input_gain.init(1.0);
        self.detector.init(sample_rate);
        self.smoother
            .init(delay, SLOW_PERIOD, DEFAULT_RELEASE, sample_rate);

        self.controls.reset();
        self.accumulator.restart(1.0);
        self.stats.clear();

        log::debug!(
            "peak limiter: {} Hz, {} channel(s), decimation {}x{}, delay {} samples, buffer {}",
            sample_rate,
            channels,
            fast_period,
            SLOW_PERIOD,
            delay,
            self.lines[0].size()
        );
    }

    /// Sets the input gain in dB, reached by a linear ramp.
    pub fn set_input_gain(&mut self, db: f32) {
        self.controls.set_input_gain(db);
    }

    /// Sets the threshold in dBFS.
    pub fn set_threshold(&mut self, db: f32) {
        self.controls.set_threshold(db);
    }

    /// Sets the release time in seconds, clamped to 1 ms..1 s.
    pub fn set_release(&mut self, seconds: f32) {
        self.controls.set_release(seconds);
    }

    /// Stores the true-peak flag. Peaks are measured on samples regardless.
    pub fn set_true_peak(&mut self, enabled: bool) {
        self.controls.set_true_peak(enabled);
    }

    pub fn true_peak(&self) -> bool {
        self.controls.true_peak()
    }

    /// Handle for changing the controls from another thread.
    pub fn controls(&self) -> ControlHandle {
        self.controls.clone()
    }

    /// Look-ahead delay in samples. Constant until the next [`PeakLimiter::init`].
    pub fn latency(&self) -> usize {
        self.delay
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Gain applied to the most recent output sample.
    pub fn gain(&self) -> f32 {
        self.smoother.gain()
    }

    /// Returns the statistics since the previous read and starts a new window.
    pub fn stats(&self) -> Stats {
        self.stats.read()
    }

    /// Read side of the statistics, for use on a metering thread.
    pub fn stats_reader(&self) -> StatsReader {
        StatsReader::new(Arc::clone(&self.stats))
    }

    /// Processes separate input and output buffers, one per channel.
    ///
    /// The number of frames is the length of the shortest buffer used. Returns it.
    pub fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) -> usize {
        debug_assert!(inputs.len() >= self.channels && outputs.len() >= self.channels);
        let frames = inputs
            .iter()
            .take(self.channels)
            .map(|input| input.len())
            .chain(outputs.iter().take(self.channels).map(|output| output.len()))
            .min()
            .unwrap_or(0);
        self.run(&mut Separate { inputs, outputs }, frames);
        frames
    }

    /// Processes buffers in place, one per channel. Returns the number of frames.
    pub fn process_in_place(&mut self, channels: &mut [&mut [f32]]) -> usize {
        debug_assert!(channels.len() >= self.channels);
        let frames = channels
            .iter()
            .take(self.channels)
            .map(|channel| channel.len())
            .min()
            .unwrap_or(0);
        self.run(&mut InPlace { channels }, frames);
        frames
    }

    fn run<B: Frames>(&mut self, buffers: &mut B, frames: usize) {
        if self.channels == 0 {
            return;
        }

        self.input_gain.set_target(self.controls.input_gain());
        let threshold_gain = self.controls.threshold_gain();
        self.smoother
            .set_release(self.controls.release(), self.sample_rate);

        if self.stats.was_read() {
            self.accumulator.restart(self.smoother.gain());
        }

        let mut read_ptr = self.read_ptr;
        let mut fast_minimum = self.fast_minimum.minimum();
        let mut slow_minimum = self.slow_minimum.minimum();
        let mut offset = 0;
        let mut remaining = frames;

        while remaining > 0 {
            // Never run past the next fast boundary.
            let n = self.fast_countdown.min(remaining);
            let write_ptr = read_ptr + self.delay;

            for channel in 0..self.channels {
                let line = &mut self.lines[channel];
                for i in 0..n {
                    let gain = self.input_gain.subsample(i as f32);
                    let x = gain * buffers.input(channel, offset + i);
                    line.write(write_ptr + i, x);
                    self.detector.process(channel, x);
                }
            }
            self.input_gain.advance(n);

            self.fast_countdown -= n;
            if self.fast_countdown == 0 {
                self.fast_countdown = self.fast_period;

                let peak = self.detector.take_peak() * threshold_gain;
                self.accumulator.update_peak(peak);
                fast_minimum = self.fast_minimum.write(safe_gain(peak));

                self.slow_countdown -= 1;
                if self.slow_countdown == 0 {
                    self.slow_countdown = SLOW_PERIOD;

                    let peak = self.detector.take_low_peak() * threshold_gain;
                    slow_minimum = self.slow_minimum.write(safe_gain(peak));
                    self.input_gain.retarget(self.fast_period * SLOW_PERIOD);
                }
            }

            for i in 0..n {
                let gain = self.smoother.process(fast_minimum, slow_minimum);
                self.accumulator.update_gain(gain);
                for channel in 0..self.channels {
                    let x = self.lines[channel].read(read_ptr + i);
                    buffers.set_output(channel, offset + i, gain * x);
                }
            }

            read_ptr = (read_ptr + n) & self.mask;
            offset += n;
            remaining -= n;
        }

        self.read_ptr = read_ptr;
        self.stats
            .publish(self.accumulator.stats(), self.smoother.gain());
    }
}

/// Sample access for one processing call.
///
/// Within a sub-block all inputs are read before any output is written, which makes
/// aliased buffers safe.
trait Frames {
    fn input(&self, channel: usize, frame: usize) -> f32;
    fn set_output(&mut self, channel: usize, frame: usize, value: f32);
}

struct Separate<'a, 'b, 'c> {
    inputs: &'a [&'b [f32]],
    outputs: &'a mut [&'c mut [f32]],
}

impl Frames for Separate<'_, '_, '_> {
    #[inline]
    fn input(&self, channel: usize, frame: usize) -> f32 {
        self.inputs[channel][frame]
    }

    #[inline]
    fn set_output(&mut self, channel: usize, frame: usize, value: f32) {
        self.outputs[channel][frame] = value;
    }
}

struct InPlace<'a, 'b> {
    channels: &'a mut [&'b mut [f32]],
}

impl Frames for InPlace<'_, '_> {
    #[inline]
    fn input(&self, channel: usize, frame: usize) -> f32 {
        self.channels[channel][frame]
    }

    #[inline]
    fn set_output(&mut self, channel: usize, frame: usize, value: f32) {
        self.channels[channel][frame] = value;
    }
}
