//! Blind-scan spectrum peak detection
//!
//! Finds candidate transponders (center frequency, bandwidth, symbol-rate
//! estimate, SNR margin) in a power spectrum with no prior knowledge of how
//! many signals are present or where.
//!
//! **Algorithm**:
//! 1. For each window size of the ladder, rebuild the running sum and mark
//!    falling and rising edges at that scale
//! 2. Pair each falling edge with the most recent open rising edge when the
//!    distance between them is plausible for the window (`[2w/3, w]`)
//! 3. Admit the resulting candidate against the peaks accepted so far,
//!    resolving overlaps between scales
//! 4. Sort the surviving peaks by frequency
//!
//! **Module Organization**:
//! - `running_sum` - prefix sums for O(1) window means
//! - `edges` - edge marks and the falling/rising edge kernels
//! - `ladder` - per-window derived quantities and scan range
//! - `candidate` - raw candidate synthesis from edge pairs
//! - `admission` - accepted peaks and overlap resolution
//! - `driver` - scan state machine and entry points

use std::collections::TryReserveError;

use snafu::{ResultExt, Snafu};

use crate::config::ConfigError;

mod running_sum;
mod edges;
mod ladder;
pub mod candidate;
pub mod admission;
pub mod driver;

pub use admission::{admit, AcceptedPeak, Admission};
pub use candidate::RawCandidate;
pub use driver::{scan, scan_many, scan_with, ScanResult, ScanState, ScanStats, Scanner};
pub use edges::{detect_falling, detect_rising, EdgeMarks};
pub use ladder::WindowScale;
pub use running_sum::RunningSum;

#[derive(Debug, Snafu)]
pub enum ScanError {
    /// Spectrum has no samples
    #[snafu(display("spectrum is empty"))]
    EmptySpectrum,

    /// Working storage sized to the spectrum could not be obtained
    #[snafu(display("could not allocate {buffer} for {len} samples"))]
    AllocationFailure {
        buffer: &'static str,
        len: usize,
        source: TryReserveError,
    },

    /// Configuration rejected before scanning
    #[snafu(display("invalid scan configuration"))]
    InvalidConfig { source: ConfigError },

    /// Caller stopped the scan; partial results are discarded
    #[snafu(display("scan cancelled"))]
    Cancelled,
}

/// Allocate a working buffer of `len` copies of `fill`, reporting failure
/// instead of aborting.
pub(crate) fn try_buffer<T: Clone>(buffer: &'static str, len: usize, fill: T) -> Result<Vec<T>, ScanError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(len)
        .context(AllocationFailureSnafu { buffer, len })?;
    storage.resize(len, fill);
    Ok(storage)
}
