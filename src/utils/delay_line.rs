//! Look-ahead delay line.
//!
//! A power-of-two ring buffer allocated once at initialisation. Samples are written at a
//! write cursor and read back at a read cursor trailing it by a fixed delay; both cursors
//! wrap with a bit mask.

use alloc::vec;
use alloc::vec::Vec;

/// Smallest buffer allocated, regardless of the requested delay.
const MIN_SIZE: usize = 64;

#[derive(Debug, Default)]
pub struct DelayLine {
    line: Vec<f32>,
    mask: usize,
}

impl DelayLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a zeroed line holding at least `capacity` samples.
    pub fn init(&mut self, capacity: usize) {
        let size = buffer_size(capacity);
        self.line = vec![0.0; size];
        self.mask = size - 1;
    }

    pub fn reset(&mut self) {
        self.line.fill(0.0);
    }

    pub fn size(&self) -> usize {
        self.line.len()
    }

    #[inline]
    pub fn mask(&self) -> usize {
        self.mask
    }

    #[inline]
    pub fn write(&mut self, position: usize, sample: f32) {
        self.line[position & self.mask] = sample;
    }

    #[inline]
    pub fn read(&self, position: usize) -> f32 {
        self.line[position & self.mask]
    }
}

/// Size of a line able to hold `capacity` samples: the next power of two, at least 64.
pub fn buffer_size(capacity: usize) -> usize {
    capacity.max(MIN_SIZE).next_power_of_two()
}
