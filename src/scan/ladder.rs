//! Quantities derived from one window size of the ladder

use std::ops::Range;

/// One rung of the window ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowScale {
    /// Window size `w` in samples
    pub size: usize,
    /// Plateau half-width `w/2` averaged for the "inside" power
    pub half: usize,
    /// Look-ahead distance to the "outside" sample, `max(1, w*16/200)`
    pub delta: usize,
}

impl WindowScale {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            half: size / 2,
            delta: (size * 16 / 200).max(1),
        }
    }

    /// Indices the candidate synthesizer walks: `[delta, len - delta)`.
    /// Every index in it can probe `idx - delta` and `idx + delta` without
    /// leaving the spectrum. Empty when the spectrum is too short.
    pub fn scan_range(&self, len: usize) -> Range<usize> {
        let end = len.saturating_sub(self.delta);
        self.delta..end.max(self.delta)
    }

    /// Whether a rise-to-fall distance is plausible at this scale: within
    /// `[2w/3, w]`.
    pub fn accepts_width(&self, width: usize) -> bool {
        width * 3 >= self.size * 2 && width <= self.size
    }
}
