//! Control parameters and channel layouts of the limiter.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// Input gain range in dB.
pub const INPUT_GAIN_RANGE: (f32, f32) = (-10.0, 30.0);

/// Threshold range in dBFS.
pub const THRESHOLD_RANGE: (f32, f32) = (-10.0, 0.0);

/// Release time range in seconds.
pub const RELEASE_RANGE: (f32, f32) = (0.001, 1.0);

/// Input gain applied while bypassed, in dB.
pub const BYPASS_INPUT_GAIN: f32 = 0.0;

/// Threshold applied while bypassed, high enough that no real signal reaches it.
pub const BYPASS_THRESHOLD: f32 = 40.0;

/// Release time applied while bypassed, in seconds.
pub const BYPASS_RELEASE: f32 = 0.05;

/// Channel layouts the limiter is offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    pub fn channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChannelLayout::Mono => "mono",
            ChannelLayout::Stereo => "stereo",
        }
    }
}

impl FromStr for ChannelLayout {
    type Err = Error;

    /// Parses a variant name, either bare (`"stereo"`) or as the tail of a plugin URI
    /// (`"http://example.org/limiter#stereo"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.rsplit(['#', '/', ':']).next().unwrap_or(s);
        match name {
            "mono" => Ok(ChannelLayout::Mono),
            "stereo" => Ok(ChannelLayout::Stereo),
            _ => Err(Error::UnknownLayout),
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// User parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Limiting enabled. When off the signal passes unchanged apart from the latency.
    /// Default is `true`.
    pub enable: bool,

    /// Input gain in dB in the range from `-10.0` to `30.0`. Default is `0.0`.
    pub input_gain: f32,

    /// Threshold in dBFS in the range from `-10.0` to `0.0`. Default is `0.0`.
    pub threshold: f32,

    /// Release time in seconds in the range from `0.001` to `1.0`. Default is `0.01`.
    pub release: f32,

    /// True-peak detection. Stored only, peaks are measured on samples. Default is `false`.
    pub true_peak: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            enable: true,
            input_gain: 0.0,
            threshold: 0.0,
            release: 0.01,
            true_peak: false,
        }
    }
}

impl Parameters {
    /// Returns a copy with every value clamped to its range.
    pub fn clamped(&self) -> Self {
        Self {
            enable: self.enable,
            input_gain: self.input_gain.clamp(INPUT_GAIN_RANGE.0, INPUT_GAIN_RANGE.1),
            threshold: self.threshold.clamp(THRESHOLD_RANGE.0, THRESHOLD_RANGE.1),
            release: self.release.clamp(RELEASE_RANGE.0, RELEASE_RANGE.1),
            true_peak: self.true_peak,
        }
    }
}
