//! Candidate admission and deduplication
//!
//! The same transponder is usually found at several window sizes, and a
//! wide window can also pick up the skirt of a strong narrow signal plus
//! its surroundings. Admission keeps at most one peak per overlapping span.
//!
//! For a candidate overlapping an accepted peak:
//! - the one whose level is strictly higher by at least `threshold2` wins
//! - otherwise the wider one wins
//! - at equal bandwidth: higher level, then higher SNR, then lower rise
//!   index; a candidate identical on all of these loses to the peak already
//!   accepted
//!
//! A candidate is rejected if any overlapping peak beats it. Only when it
//! beats all of them are they removed and the candidate appended, so a
//! rejected candidate never changes the accepted list.

use std::cmp::Ordering;

use tracing::trace;

use super::candidate::RawCandidate;

/// Member of the running result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedPeak {
    /// Center frequency in kHz
    pub freq_khz: u32,
    /// Estimated occupied bandwidth in kHz
    pub bandwidth_khz: u32,
    /// `bandwidth_khz` times the configured symbol-rate factor
    pub symbol_rate: u64,
    /// Margin of `level` over the noise just outside the edges
    pub snr: i32,
    /// Mean in-band power
    pub level: i32,
    /// Span the peak was synthesized from
    pub rise_idx: usize,
    pub fall_idx: usize,
    /// Window size that found it
    pub window: usize,
}

impl AcceptedPeak {
    pub fn from_candidate(candidate: &RawCandidate, symbol_rate_factor: u32) -> Self {
        Self {
            freq_khz: candidate.freq_khz,
            bandwidth_khz: candidate.bandwidth_khz,
            symbol_rate: candidate.bandwidth_khz as u64 * symbol_rate_factor as u64,
            snr: candidate.snr,
            level: candidate.level,
            rise_idx: candidate.rise_idx,
            fall_idx: candidate.fall_idx,
            window: candidate.window,
        }
    }

    pub fn overlaps(&self, other: &AcceptedPeak) -> bool {
        self.rise_idx <= other.fall_idx && other.rise_idx <= self.fall_idx
    }
}

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Appended, after removing `superseded` overlapping peaks
    Accepted { superseded: usize },
    /// SNR margin below `threshold2`
    LowSnr,
    /// An overlapping accepted peak at `freq_khz` beats the candidate
    Overlapped { freq_khz: u32 },
}

/// Whether `candidate` displaces the overlapping `old` peak
fn candidate_wins(candidate: &RawCandidate, old: &AcceptedPeak, threshold2: i32) -> bool {
    let threshold2 = threshold2 as i64;
    let diff = candidate.level as i64 - old.level as i64;
    // Only a strictly stronger peak can win on level, even at threshold2 = 0
    if diff > 0 && diff >= threshold2 {
        return true;
    }
    if diff < 0 && -diff >= threshold2 {
        return false;
    }

    let order = candidate
        .bandwidth_khz
        .cmp(&old.bandwidth_khz)
        .then(candidate.level.cmp(&old.level))
        .then(candidate.snr.cmp(&old.snr))
        .then(old.rise_idx.cmp(&candidate.rise_idx));
    order == Ordering::Greater
}

/// Accept or reject `candidate` against the accepted list
pub fn admit(
    accepted: &mut Vec<AcceptedPeak>,
    candidate: &RawCandidate,
    threshold2: i32,
    symbol_rate_factor: u32,
) -> Admission {
    if candidate.snr < threshold2 {
        trace!(freq_khz = candidate.freq_khz, snr = candidate.snr, "rejected: low snr");
        return Admission::LowSnr;
    }

    let overlapping = |old: &AcceptedPeak| candidate.overlaps(old.rise_idx, old.fall_idx);

    if let Some(winner) = accepted
        .iter()
        .filter(|old| overlapping(*old))
        .find(|old| !candidate_wins(candidate, old, threshold2))
    {
        trace!(
            freq_khz = candidate.freq_khz,
            bandwidth_khz = candidate.bandwidth_khz,
            by_freq_khz = winner.freq_khz,
            by_bandwidth_khz = winner.bandwidth_khz,
            "rejected: overlapped"
        );
        return Admission::Overlapped {
            freq_khz: winner.freq_khz,
        };
    }

    let before = accepted.len();
    accepted.retain(|old| !overlapping(old));
    let superseded = before - accepted.len();

    accepted.push(AcceptedPeak::from_candidate(candidate, symbol_rate_factor));
    trace!(
        freq_khz = candidate.freq_khz,
        bandwidth_khz = candidate.bandwidth_khz,
        level = candidate.level,
        snr = candidate.snr,
        superseded,
        "accepted"
    );
    Admission::Accepted { superseded }
}
