//! Prefix sums over the spectrum
//!
//! `sums[i] = samples[0] + ... + samples[i]`, so the sum of any half-open
//! range is one subtraction. Stored as `i64`; a full 32-bit sample range
//! cannot overflow it for any spectrum that fits in memory.

use super::{try_buffer, ScanError};

#[derive(Debug, Clone, Default)]
pub struct RunningSum {
    sums: Vec<i64>,
}

impl RunningSum {
    /// Allocate storage for `len` samples
    pub fn with_len(len: usize) -> Result<Self, ScanError> {
        Ok(Self {
            sums: try_buffer("running sum", len, 0i64)?,
        })
    }

    /// Recompute the prefix sums in place. The buffer is reused; it only
    /// grows if `samples` is longer than any previous input.
    pub fn rebuild(&mut self, samples: &[i32]) {
        self.sums.resize(samples.len(), 0);
        let mut acc = 0i64;
        for (sum, &sample) in self.sums.iter_mut().zip(samples) {
            acc += sample as i64;
            *sum = acc;
        }
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.sums
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// Sum of `samples[start..end)`
    pub fn range_sum(&self, start: usize, end: usize) -> i64 {
        debug_assert!(start <= end && end <= self.sums.len());
        if start == end {
            return 0;
        }
        let upper = self.sums[end - 1];
        if start == 0 {
            upper
        } else {
            upper - self.sums[start - 1]
        }
    }

    /// Mean of `samples[start..end)`, truncated toward zero. Zero for an
    /// empty range.
    pub fn mean(&self, start: usize, end: usize) -> i32 {
        if start >= end {
            return 0;
        }
        // Mean of i32 samples always fits i32
        (self.range_sum(start, end) / (end - start) as i64) as i32
    }
}
