//! Peak and gain statistics handed from the audio thread to a metering thread.
//!
//! The audio thread accumulates into a private [`StatsAccumulator`] and publishes it at the
//! end of every processing call through a sequence counter: the counter is odd while a
//! snapshot is being written, and readers retry until they observe the same even value
//! before and after loading the fields. The writer never waits.
//!
//! A read acknowledges the snapshot it returned. The next processing call that finds its
//! latest snapshot acknowledged starts a new accumulation window from the current gain.
//! Reading again before anything new is published returns the empty window.

use alloc::sync::Arc;
use core::sync::atomic::{fence, AtomicU32, Ordering};

use atomic_float::AtomicF32;

/// Statistics over one metering window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Highest detected peak relative to the threshold (1.0 = at threshold).
    pub peak: f32,
    /// Largest applied gain.
    pub gain_max: f32,
    /// Smallest applied gain.
    pub gain_min: f32,
}

impl Stats {
    /// Window with no samples yet, sitting at `gain`.
    pub fn collapsed(gain: f32) -> Self {
        Self {
            peak: 0.0,
            gain_max: gain,
            gain_min: gain,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::collapsed(1.0)
    }
}

/// Running bounds owned by the audio thread.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StatsAccumulator {
    stats: Stats,
}

impl StatsAccumulator {
    pub fn restart(&mut self, gain: f32) {
        self.stats = Stats::collapsed(gain);
    }

    #[inline]
    pub fn update_peak(&mut self, peak: f32) {
        if peak > self.stats.peak {
            self.stats.peak = peak;
        }
    }

    #[inline]
    pub fn update_gain(&mut self, gain: f32) {
        if gain > self.stats.gain_max {
            self.stats.gain_max = gain;
        }
        if gain < self.stats.gain_min {
            self.stats.gain_min = gain;
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

/// Single-writer snapshot of the statistics of one engine.
///
/// The engine publishes at the end of every processing call. Every read records the
/// sequence number of the snapshot it returned; the engine restarts its window only once
/// its latest snapshot has been read, so a read racing with a processing call never loses
/// the samples of that call.
#[derive(Debug)]
pub struct StatsChannel {
    sequence: AtomicU32,
    acknowledged: AtomicU32,
    peak: AtomicF32,
    gain_max: AtomicF32,
    gain_min: AtomicF32,
    gain: AtomicF32,
}

/// Never equal to a published sequence number, which is always even.
const UNREAD: u32 = u32::MAX;

impl Default for StatsChannel {
    fn default() -> Self {
        let stats = Stats::default();
        Self {
            sequence: AtomicU32::new(0),
            acknowledged: AtomicU32::new(UNREAD),
            peak: AtomicF32::new(stats.peak),
            gain_max: AtomicF32::new(stats.gain_max),
            gain_min: AtomicF32::new(stats.gain_min),
            gain: AtomicF32::new(1.0),
        }
    }
}

impl StatsChannel {
    /// Writes a new snapshot. Must only be called from the thread owning the engine.
    pub fn publish(&self, stats: Stats, gain: f32) {
        let sequence = self.sequence.load(Ordering::Relaxed);
        self.sequence
            .store(sequence.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        self.peak.store(stats.peak, Ordering::Relaxed);
        self.gain_max.store(stats.gain_max, Ordering::Relaxed);
        self.gain_min.store(stats.gain_min, Ordering::Relaxed);
        self.gain.store(gain, Ordering::Relaxed);

        self.sequence
            .store(sequence.wrapping_add(2), Ordering::Release);
    }

    /// Returns whether the latest published snapshot has been read, in which case the
    /// writer starts a new window. Must only be called from the thread owning the engine.
    #[inline]
    pub fn was_read(&self) -> bool {
        let published = self.sequence.load(Ordering::Relaxed);
        self.acknowledged.load(Ordering::Acquire) == published
    }

    /// Publishes the initial window and forgets earlier reads.
    pub fn clear(&self) {
        self.acknowledged.store(UNREAD, Ordering::Release);
        self.publish(Stats::default(), 1.0);
    }

    /// Returns the latest snapshot, or the empty window at the current gain if that
    /// snapshot was already returned by an earlier read.
    pub fn read(&self) -> Stats {
        let (stats, gain, sequence) = self.load();
        if self.acknowledged.swap(sequence, Ordering::AcqRel) == sequence {
            Stats::collapsed(gain)
        } else {
            stats
        }
    }

    fn load(&self) -> (Stats, f32, u32) {
        loop {
            let before = self.sequence.load(Ordering::Acquire);
            if before & 1 == 1 {
                core::hint::spin_loop();
                continue;
            }

            let stats = Stats {
                peak: self.peak.load(Ordering::Relaxed),
                gain_max: self.gain_max.load(Ordering::Relaxed),
                gain_min: self.gain_min.load(Ordering::Relaxed),
            };
            let gain = self.gain.load(Ordering::Relaxed);

            fence(Ordering::Acquire);
            if self.sequence.load(Ordering::Relaxed) == before {
                return (stats, gain, before);
            }
        }
    }
}

/// Read side of the statistics of one [`PeakLimiter`](super::PeakLimiter).
///
/// Can be moved to a metering thread. Reads are meant to happen at a low rate (tens of
/// milliseconds); every read resets the accumulation window.
#[derive(Debug)]
pub struct StatsReader {
    channel: Arc<StatsChannel>,
}

impl StatsReader {
    pub(crate) fn new(channel: Arc<StatsChannel>) -> Self {
        Self { channel }
    }

    /// Returns the statistics accumulated since the previous read.
    pub fn read(&self) -> Stats {
        self.channel.read()
    }
}
