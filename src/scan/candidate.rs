//! Raw candidate synthesis
//!
//! Walks the edge marks of one window pass left to right and pairs each
//! falling edge with the most recent rising edge that has not been closed
//! yet, provided the distance between them is plausible for the window.

use tracing::trace;

use super::edges::EdgeMarks;
use super::ladder::WindowScale;
use super::running_sum::RunningSum;
use crate::spectrum::Spectrum;

/// A rise/fall pair turned into a peak estimate
///
/// `level` and `snr` are in the detector's orientation (transponders are
/// above the floor), see [`crate::Polarity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCandidate {
    /// Index of the rising edge
    pub rise_idx: usize,
    /// Index of the falling edge, always greater than `rise_idx`
    pub fall_idx: usize,
    /// Midpoint of the span
    pub peak_idx: usize,
    /// Frequency of `peak_idx` in kHz
    pub freq_khz: u32,
    /// Frequency distance between the edges in kHz
    pub bandwidth_khz: u32,
    /// Mean power over `[rise_idx, fall_idx)`
    pub level: i32,
    /// `level` minus the lower of the two outside-edge samples
    pub snr: i32,
    /// Window size of the pass that produced the candidate
    pub window: usize,
}

impl RawCandidate {
    pub fn from_span(
        spectrum: &Spectrum,
        rise_idx: usize,
        fall_idx: usize,
        level: i32,
        snr: i32,
        window: usize,
    ) -> Self {
        debug_assert!(rise_idx < fall_idx);
        let peak_idx = (rise_idx + fall_idx) / 2;
        Self {
            rise_idx,
            fall_idx,
            peak_idx,
            freq_khz: spectrum.frequency_at(peak_idx),
            bandwidth_khz: spectrum.frequency_at(fall_idx) - spectrum.frequency_at(rise_idx),
            level,
            snr,
            window,
        }
    }

    /// Whether the inclusive index spans `[rise_idx, fall_idx]` intersect
    pub fn overlaps(&self, rise_idx: usize, fall_idx: usize) -> bool {
        self.rise_idx <= fall_idx && rise_idx <= self.fall_idx
    }
}

/// Everything a window pass reads while synthesizing candidates
pub struct WindowPass<'a> {
    pub spectrum: &'a Spectrum,
    pub power: &'a [i32],
    pub sums: &'a RunningSum,
    pub marks: &'a EdgeMarks,
    pub scale: WindowScale,
}

/// Scan cursor and last-seen edges for the current window pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeCursor {
    pub current_idx: usize,
    pub end_idx: usize,
    pub last_rise_idx: Option<usize>,
    pub last_fall_idx: Option<usize>,
}

impl EdgeCursor {
    /// Fresh cursor over the scan range of a window
    pub fn new(scale: &WindowScale, len: usize) -> Self {
        let range = scale.scan_range(len);
        Self {
            current_idx: range.start,
            end_idx: range.end,
            last_rise_idx: None,
            last_fall_idx: None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_idx >= self.end_idx
    }

    /// A rise is open when no fall has been seen since it. A fall and a rise
    /// on the same index count as fall-then-rise: the edge ends one plateau
    /// and starts the next.
    fn open_rise(&self) -> Option<usize> {
        let rise = self.last_rise_idx?;
        match self.last_fall_idx {
            Some(fall) if fall > rise => None,
            _ => Some(rise),
        }
    }

    /// Advance to the next candidate of this pass, or `None` once the scan
    /// range is exhausted.
    pub fn next_candidate(&mut self, pass: &WindowPass<'_>) -> Option<RawCandidate> {
        while self.current_idx < self.end_idx {
            let idx = self.current_idx;
            self.current_idx += 1;

            let mut candidate = None;
            if pass.marks.is_falling(idx) {
                if let Some(rise) = self.open_rise() {
                    if pass.scale.accepts_width(idx - rise) {
                        candidate = synthesize(pass, rise, idx);
                    }
                }
                self.last_fall_idx = Some(idx);
            }
            if pass.marks.is_rising(idx) {
                self.last_rise_idx = Some(idx);
            }

            if candidate.is_some() {
                return candidate;
            }
        }
        None
    }
}

/// Build the candidate for the span `[rise, fall)`. `None` if either
/// outside-edge probe would leave the spectrum.
fn synthesize(pass: &WindowPass<'_>, rise: usize, fall: usize) -> Option<RawCandidate> {
    let delta = pass.scale.delta;
    let outside_left = *pass.power.get(rise.checked_sub(delta)?)?;
    let outside_right = *pass.power.get(fall + delta)?;

    let level = pass.sums.mean(rise, fall);
    let snr = level.saturating_sub(outside_left.min(outside_right));

    let candidate = RawCandidate::from_span(pass.spectrum, rise, fall, level, snr, pass.scale.size);
    trace!(
        window = pass.scale.size,
        rise,
        fall,
        freq_khz = candidate.freq_khz,
        bandwidth_khz = candidate.bandwidth_khz,
        level,
        snr,
        "raw candidate"
    );
    Some(candidate)
}
