//! Scan driver
//!
//! State machine over the window ladder:
//!
//! ```text
//! Start -> Init(w) -> Scanning -> (window exhausted) -> Init(next w) ... -> Done
//! ```
//!
//! `Start` validates the input and allocates working storage, `Init`
//! rebuilds the running sum and edge marks for one window size, `Scanning`
//! hands out raw candidates one at a time, and `finish` sorts the surviving
//! peaks by frequency.

use std::borrow::Cow;

use rayon::prelude::*;
use snafu::ResultExt;
use tracing::{debug, instrument};

use super::admission::{self, AcceptedPeak, Admission};
use super::candidate::{EdgeCursor, RawCandidate, WindowPass};
use super::edges::{detect_falling, detect_rising, EdgeMarks};
use super::ladder::WindowScale;
use super::running_sum::RunningSum;
use super::{AllocationFailureSnafu, InvalidConfigSnafu, ScanError};
use crate::config::ScanConfig;
use crate::spectrum::Spectrum;

/// Where the driver is in the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Window `window_idx` still has to be prepared
    Init,
    /// Handing out candidates of window `window_idx`
    Scanning,
    /// Ladder exhausted
    Done,
}

/// Mutable state of one scan call
#[derive(Debug, Clone)]
pub struct ScanState {
    pub phase: Phase,
    pub window_idx: usize,
    pub cursor: EdgeCursor,
    pub accepted: Vec<AcceptedPeak>,
}

impl ScanState {
    fn new() -> Self {
        Self {
            phase: Phase::Init,
            window_idx: 0,
            cursor: EdgeCursor::default(),
            accepted: Vec::new(),
        }
    }
}

/// Counters reported alongside the peaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Window sizes visited
    pub windows: usize,
    /// Raw candidates synthesized over all windows
    pub raw_candidates: usize,
    /// Rejected for SNR margin below `threshold2`
    pub rejected_low_snr: usize,
    /// Rejected because an overlapping accepted peak beat them
    pub rejected_overlap: usize,
    /// Accepted peaks later displaced by a candidate
    pub superseded: usize,
}

/// Frequency-sorted peaks of a completed scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    peaks: Vec<AcceptedPeak>,
    stats: ScanStats,
}

impl ScanResult {
    pub fn peaks(&self) -> &[AcceptedPeak] {
        &self.peaks
    }

    pub fn into_peaks(self) -> Vec<AcceptedPeak> {
        self.peaks
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Step-by-step blind scan over one spectrum
///
/// Owns all working storage (oriented samples, running sum, edge marks,
/// accepted list); dropping it releases everything, so abandoning a scanner
/// half way is the cancellation path.
pub struct Scanner<'a> {
    spectrum: &'a Spectrum,
    config: &'a ScanConfig,
    power: Cow<'a, [i32]>,
    sums: RunningSum,
    marks: EdgeMarks,
    scale: WindowScale,
    state: ScanState,
    stats: ScanStats,
}

impl<'a> Scanner<'a> {
    pub fn new(spectrum: &'a Spectrum, config: &'a ScanConfig) -> Result<Self, ScanError> {
        if spectrum.is_empty() {
            return Err(ScanError::EmptySpectrum);
        }
        config.validate().context(InvalidConfigSnafu)?;

        let len = spectrum.len();
        let power = match config.polarity {
            crate::Polarity::Peak => Cow::Borrowed(spectrum.samples()),
            crate::Polarity::Dip => {
                let mut oriented = super::try_buffer("oriented samples", len, 0i32)?;
                for (dst, &src) in oriented.iter_mut().zip(spectrum.samples()) {
                    *dst = config.polarity.orient(src);
                }
                Cow::Owned(oriented)
            }
        };

        Ok(Self {
            spectrum,
            config,
            power,
            sums: RunningSum::with_len(len)?,
            marks: EdgeMarks::with_len(len)?,
            scale: WindowScale::new(config.window_ladder.sizes()[0]),
            state: ScanState::new(),
            stats: ScanStats::default(),
        })
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Next raw candidate, moving through the ladder as windows run out.
    /// `None` once every window size has been scanned.
    pub fn next_candidate(&mut self) -> Option<RawCandidate> {
        loop {
            match self.state.phase {
                Phase::Init => self.init_window(),
                Phase::Scanning => {
                    let pass = WindowPass {
                        spectrum: self.spectrum,
                        power: &self.power,
                        sums: &self.sums,
                        marks: &self.marks,
                        scale: self.scale,
                    };
                    if let Some(candidate) = self.state.cursor.next_candidate(&pass) {
                        self.stats.raw_candidates += 1;
                        return Some(candidate);
                    }

                    if self.state.window_idx + 1 < self.config.window_ladder.len() {
                        self.state.window_idx += 1;
                        self.state.phase = Phase::Init;
                    } else {
                        self.state.phase = Phase::Done;
                    }
                }
                Phase::Done => return None,
            }
        }
    }

    fn init_window(&mut self) {
        let Some(size) = self.config.window_ladder.get(self.state.window_idx) else {
            self.state.phase = Phase::Done;
            return;
        };

        let len = self.power.len();
        self.scale = WindowScale::new(size);
        self.marks.reset(len);
        self.sums.rebuild(&self.power);

        let falling = detect_falling(
            &self.power,
            &self.sums,
            &self.scale,
            self.config.threshold,
            self.config.mincount,
            &mut self.marks,
        );
        let rising = detect_rising(
            &self.power,
            &self.sums,
            &self.scale,
            self.config.threshold,
            self.config.mincount,
            &mut self.marks,
        );

        self.state.cursor = EdgeCursor::new(&self.scale, len);
        self.state.phase = Phase::Scanning;
        self.stats.windows += 1;

        debug!(
            window = size,
            delta = self.scale.delta,
            rising,
            falling,
            accepted = self.state.accepted.len(),
            "window pass"
        );
    }

    /// Run admission for a candidate obtained from [`Self::next_candidate`]
    pub fn admit(&mut self, candidate: &RawCandidate) -> Result<Admission, ScanError> {
        self.state
            .accepted
            .try_reserve(1)
            .context(AllocationFailureSnafu {
                buffer: "accepted peaks",
                len: self.state.accepted.len() + 1,
            })?;

        let outcome = admission::admit(
            &mut self.state.accepted,
            candidate,
            self.config.threshold2,
            self.config.symbol_rate_factor,
        );
        match outcome {
            Admission::Accepted { superseded } => self.stats.superseded += superseded,
            Admission::LowSnr => self.stats.rejected_low_snr += 1,
            Admission::Overlapped { .. } => self.stats.rejected_overlap += 1,
        }
        Ok(outcome)
    }

    /// Drive the remaining windows through admission, then sort the accepted
    /// peaks by frequency and report levels in the caller's orientation.
    pub fn finish(mut self) -> Result<ScanResult, ScanError> {
        while let Some(candidate) = self.next_candidate() {
            self.admit(&candidate)?;
        }

        let polarity = self.config.polarity;
        let mut peaks = std::mem::take(&mut self.state.accepted);
        peaks.sort_by_key(|peak| peak.freq_khz);
        for peak in &mut peaks {
            peak.level = polarity.orient(peak.level);
        }

        debug!(
            peaks = peaks.len(),
            windows = self.stats.windows,
            raw_candidates = self.stats.raw_candidates,
            rejected_low_snr = self.stats.rejected_low_snr,
            rejected_overlap = self.stats.rejected_overlap,
            superseded = self.stats.superseded,
            "scan complete"
        );

        Ok(ScanResult {
            peaks,
            stats: self.stats,
        })
    }
}

/// Find candidate transponders in a spectrum
///
/// # Returns
/// Accepted peaks sorted by ascending frequency
#[instrument(skip_all, fields(len = spectrum.len(), start_khz = spectrum.start_frequency()))]
pub fn scan(spectrum: &Spectrum, config: &ScanConfig) -> Result<ScanResult, ScanError> {
    Scanner::new(spectrum, config)?.finish()
}

/// Scan with cooperative cancellation.
///
/// `keep_going` is called once per raw candidate before it is admitted;
/// returning `false` abandons the scan with [`ScanError::Cancelled`] and
/// discards everything accumulated so far.
#[instrument(skip_all, fields(len = spectrum.len(), start_khz = spectrum.start_frequency()))]
pub fn scan_with<F>(spectrum: &Spectrum, config: &ScanConfig, mut keep_going: F) -> Result<ScanResult, ScanError>
where
    F: FnMut(&RawCandidate) -> bool,
{
    let mut scanner = Scanner::new(spectrum, config)?;
    while let Some(candidate) = scanner.next_candidate() {
        if !keep_going(&candidate) {
            debug!(
                window_idx = scanner.state().window_idx,
                raw_candidates = scanner.stats().raw_candidates,
                "scan cancelled"
            );
            return Err(ScanError::Cancelled);
        }
        scanner.admit(&candidate)?;
    }
    scanner.finish()
}

/// Scan several independent spectra (e.g. one per tuner) in parallel.
/// Each scan has its own state; results are in input order.
#[instrument(skip_all, fields(spectra = spectra.len()))]
pub fn scan_many(spectra: &[Spectrum], config: &ScanConfig) -> Vec<Result<ScanResult, ScanError>> {
    spectra.par_iter().map(|spectrum| scan(spectrum, config)).collect()
}
