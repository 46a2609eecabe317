//! Minimum over a sliding window of recent values.
//!
//! The current minimum is kept together with a hold counter telling for how many more
//! insertions it is guaranteed to stay inside the window. Only when the hold runs out is the
//! history rescanned, which keeps the cost per insertion constant on average and bounded by
//! the window length in the worst case.

/// Capacity of the history. Window lengths must not exceed it.
pub const HISTORY_SIZE: usize = 32;

const HISTORY_MASK: usize = HISTORY_SIZE - 1;

#[derive(Debug, Clone)]
pub struct SlidingMinimum {
    length: usize,
    hold: usize,
    write_ptr: usize,
    minimum: f32,
    history: [f32; HISTORY_SIZE],
}

impl Default for SlidingMinimum {
    fn default() -> Self {
        Self::new()
    }
}

impl SlidingMinimum {
    pub fn new() -> Self {
        Self {
            length: 1,
            hold: 1,
            write_ptr: 0,
            minimum: 1.0,
            history: [1.0; HISTORY_SIZE],
        }
    }

    /// Resets the tracker to unity over a window of `length` insertions.
    ///
    /// `length` is clamped to `1..=HISTORY_SIZE`.
    pub fn init(&mut self, length: usize) {
        debug_assert!(length <= HISTORY_SIZE);
        let length = length.clamp(1, HISTORY_SIZE);
        self.length = length;
        self.hold = length;
        self.write_ptr = 0;
        self.minimum = 1.0;
        self.history.fill(1.0);
    }

    /// Appends `value` and returns the minimum of the last `length` insertions.
    #[inline]
    pub fn write(&mut self, value: f32) -> f32 {
        let i = self.write_ptr;
        self.history[i] = value;

        if value <= self.minimum {
            self.minimum = value;
            self.hold = self.length;
        } else {
            self.hold -= 1;
            if self.hold == 0 {
                // The minimum has left the window. The newest value is the fallback,
                // older entries win only if strictly smaller.
                self.minimum = value;
                self.hold = self.length;
                for age in 1..self.length {
                    let v = self.history[(i + HISTORY_SIZE - age) & HISTORY_MASK];
                    if v < self.minimum {
                        self.minimum = v;
                        self.hold = self.length - age;
                    }
                }
            }
        }

        self.write_ptr = (i + 1) & HISTORY_MASK;
        self.minimum
    }

    #[inline]
    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    pub fn length(&self) -> usize {
        self.length
    }
}
