//! Reviews carousel state
//!
//! Wrap-around slide index bookkeeping. The host owns rendering and the
//! auto-advance timer; this struct only answers "which slide is active".

use std::time::Duration;

const DEFAULT_ADVANCE: Duration = Duration::from_secs(8);

/// Active-slide state for a carousel of `len` slides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
    advance_every: Duration,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current: 0,
            advance_every: DEFAULT_ADVANCE,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Interval at which the host should auto-advance
    pub fn advance_every(&self) -> Duration {
        self.advance_every
    }

    pub fn set_advance_every(&mut self, interval: Duration) {
        self.advance_every = interval;
    }

    /// Advance to the next slide, wrapping past the end
    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
        self.current
    }

    /// Go back one slide, wrapping before the start
    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
        self.current
    }

    /// Jump to a slide (dot navigation). Out-of-range indices are ignored.
    pub fn goto(&mut self, index: usize) -> usize {
        if index < self.len {
            self.current = index;
        }
        self.current
    }

    /// Apply the auto-advances due after `elapsed`; returns how many slides
    /// were advanced
    pub fn auto_advance(&mut self, elapsed: Duration) -> usize {
        if self.len == 0 || self.advance_every.is_zero() {
            return 0;
        }
        let steps = (elapsed.as_nanos() / self.advance_every.as_nanos()) as usize;
        for _ in 0..steps {
            self.next();
        }
        steps
    }
}
