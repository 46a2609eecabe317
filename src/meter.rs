//! Level display and gain history fed from the limiter statistics.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::limiter::stats::Stats;
use crate::utils::gain_to_db;

/// Number of entries in the gain history.
pub const HISTORY_LENGTH: usize = 60;

/// Metering interval in seconds.
pub const METER_INTERVAL: f32 = 0.05;

/// Lowest level shown, in dB.
pub const LEVEL_FLOOR: f32 = -20.0;

/// Lowest level reported to the host, in dB.
pub const DISPLAY_FLOOR: f32 = -10.0;

/// Fall of the held level per metering interval, in dB (6 dB/s at 50 ms).
pub const LEVEL_FALLOFF: f32 = 0.3;

/// Peaks below this are shown at the floor.
const PEAK_FLOOR: f32 = 0.1;

/// Metering interval in samples.
pub fn meter_interval(sample_rate: f32) -> usize {
    (sample_rate * METER_INTERVAL).ceil() as usize
}

/// Peak level relative to the threshold with a slow fall-off.
#[derive(Debug, Clone, Copy)]
pub struct LevelMeter {
    level: f32,
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelMeter {
    pub fn new() -> Self {
        Self { level: LEVEL_FLOOR }
    }

    pub fn init(&mut self) {
        self.level = LEVEL_FLOOR;
    }

    /// Folds in the peak of one metering interval.
    pub fn update(&mut self, peak: f32) {
        let level = if peak < PEAK_FLOOR {
            LEVEL_FLOOR
        } else {
            gain_to_db(peak)
        };
        if self.level > LEVEL_FLOOR {
            self.level -= LEVEL_FALLOFF;
        }
        if level > self.level {
            self.level = level;
        }
    }

    /// Held level in dB.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Level as reported to the host.
    pub fn display_level(&self, enabled: bool) -> f32 {
        if enabled {
            self.level.max(DISPLAY_FLOOR)
        } else {
            DISPLAY_FLOOR
        }
    }
}

/// Ring of per-interval gain bounds, for drawing the gain reduction over time.
#[derive(Debug, Clone)]
pub struct GainHistory {
    minimum: [f32; HISTORY_LENGTH],
    maximum: [f32; HISTORY_LENGTH],
    position: usize,
}

impl Default for GainHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl GainHistory {
    pub fn new() -> Self {
        Self {
            minimum: [1.0; HISTORY_LENGTH],
            maximum: [1.0; HISTORY_LENGTH],
            position: 0,
        }
    }

    pub fn init(&mut self) {
        *self = Self::new();
    }

    pub fn push(&mut self, stats: &Stats) {
        self.minimum[self.position] = stats.gain_min;
        self.maximum[self.position] = stats.gain_max;
        self.position = (self.position + 1) % HISTORY_LENGTH;
    }

    /// Index the next entry will be written to, i.e. the oldest entry.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn minimum(&self) -> &[f32] {
        &self.minimum
    }

    pub fn maximum(&self) -> &[f32] {
        &self.maximum
    }

    /// Entries from oldest to newest as `(minimum, maximum)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        (0..HISTORY_LENGTH).map(move |i| {
            let index = (self.position + i) % HISTORY_LENGTH;
            (self.minimum[index], self.maximum[index])
        })
    }
}
