//! Edge marks and edge kernels
//!
//! A falling edge is where the mean power of the plateau to the left of
//! an index exceeds the single sample `delta` bins to the right by more than
//! `threshold`; a rising edge is the mirror image, found by walking the
//! spectrum right to left. An edge is committed on the `mincount`-th
//! consecutive detection, and a run of detections yields a single mark.

use super::ladder::WindowScale;
use super::running_sum::RunningSum;
use super::{try_buffer, ScanError};

const RISING: u8 = 0b01;
const FALLING: u8 = 0b10;

/// Per-sample `RISING`/`FALLING` flags for one window pass
#[derive(Debug, Clone, Default)]
pub struct EdgeMarks {
    flags: Vec<u8>,
}

impl EdgeMarks {
    pub fn with_len(len: usize) -> Result<Self, ScanError> {
        Ok(Self {
            flags: try_buffer("edge marks", len, 0u8)?,
        })
    }

    /// Clear all marks, keeping storage for `len` samples
    pub fn reset(&mut self, len: usize) {
        self.flags.clear();
        self.flags.resize(len, 0);
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn mark_rising(&mut self, idx: usize) {
        self.flags[idx] |= RISING;
    }

    pub fn mark_falling(&mut self, idx: usize) {
        self.flags[idx] |= FALLING;
    }

    pub fn is_rising(&self, idx: usize) -> bool {
        self.flags.get(idx).is_some_and(|f| f & RISING != 0)
    }

    pub fn is_falling(&self, idx: usize) -> bool {
        self.flags.get(idx).is_some_and(|f| f & FALLING != 0)
    }

    pub fn rising(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices(RISING)
    }

    pub fn falling(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices(FALLING)
    }

    fn indices(&self, flag: u8) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(move |(_, f)| *f & flag != 0)
            .map(|(i, _)| i)
    }
}

/// Run-length gate shared by both kernels
struct EdgeRun {
    count: u32,
    mincount: u32,
}

impl EdgeRun {
    fn new(mincount: u32) -> Self {
        Self { count: 0, mincount }
    }

    /// Feed one detection result; true exactly once per run, when it
    /// reaches `mincount`.
    fn step(&mut self, detected: bool) -> bool {
        if detected {
            self.count = self.count.saturating_add(1);
            self.count == self.mincount
        } else {
            self.count = 0;
            false
        }
    }
}

/// Mark trailing (right) transponder edges.
///
/// Walks `i` over `[w/2, len - delta)`, comparing `mean(power[i - w/2 .. i])`
/// against `power[i + delta]`.
pub fn detect_falling(
    power: &[i32],
    sums: &RunningSum,
    scale: &WindowScale,
    threshold: i32,
    mincount: u32,
    marks: &mut EdgeMarks,
) -> usize {
    let len = power.len();
    if len < scale.half + scale.delta + 1 {
        return 0;
    }

    let mut run = EdgeRun::new(mincount);
    let mut found = 0;
    for i in scale.half..len - scale.delta {
        let inside = sums.mean(i - scale.half, i) as i64;
        let outside = power[i + scale.delta] as i64;
        if run.step(inside - outside > threshold as i64) {
            marks.mark_falling(i);
            found += 1;
        }
    }
    found
}

/// Mark leading (left) transponder edges.
///
/// Walks `i` down from `len - w/2 - 1` to `delta`, comparing
/// `mean(power[i .. i + w/2])` against `power[i - delta]`.
pub fn detect_rising(
    power: &[i32],
    sums: &RunningSum,
    scale: &WindowScale,
    threshold: i32,
    mincount: u32,
    marks: &mut EdgeMarks,
) -> usize {
    let len = power.len();
    if len < scale.half + scale.delta + 1 {
        return 0;
    }

    let mut run = EdgeRun::new(mincount);
    let mut found = 0;
    for i in (scale.delta..len - scale.half).rev() {
        let inside = sums.mean(i, i + scale.half) as i64;
        let outside = power[i - scale.delta] as i64;
        if run.step(inside - outside > threshold as i64) {
            marks.mark_rising(i);
            found += 1;
        }
    }
    found
}
