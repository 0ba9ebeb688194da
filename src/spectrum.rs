//! Power spectrum input
//!
//! A spectrum is a dense sweep of power samples, one per frequency step,
//! starting at `start_frequency`. Powers are fixed-point 0.001 dB units.
//!
//! **Frequencies**: kHz, `u32`. The constructor guarantees that the end of
//! the sweep (`start + len * step`) is representable, so `frequency_at` never
//! overflows for any index in `0..=len`.

use snafu::Snafu;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum SpectrumError {
    /// Bin width of zero
    #[snafu(display("frequency step must be non-zero"))]
    ZeroFrequencyStep,

    /// Sweep end does not fit the frequency type
    #[snafu(display("spectrum of {len} samples from {start_khz} kHz in {step_khz} kHz steps overflows"))]
    FrequencyOverflow { start_khz: u32, step_khz: u32, len: usize },

    /// Frequency range is not a whole number of steps
    #[snafu(display("range {start_khz}..{end_khz} kHz is not a multiple of the {step_khz} kHz step"))]
    UnalignedRange { start_khz: u32, end_khz: u32, step_khz: u32 },

    /// Frequency range and sample count disagree
    #[snafu(display("frequency range holds {expected} samples but {actual} were given"))]
    LengthMismatch { expected: usize, actual: usize },
}

/// Power-vs-frequency sweep, read-only for the duration of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spectrum {
    start_frequency: u32,
    frequency_step: u32,
    samples: Vec<i32>,
}

impl Spectrum {
    /// Build a spectrum from its first frequency, bin width and samples.
    ///
    /// An empty sample vector is accepted here; the scan reports it as
    /// [`crate::ScanError::EmptySpectrum`].
    pub fn new(start_frequency: u32, frequency_step: u32, samples: Vec<i32>) -> Result<Self, SpectrumError> {
        if frequency_step == 0 {
            return Err(SpectrumError::ZeroFrequencyStep);
        }

        let overflow = || SpectrumError::FrequencyOverflow {
            start_khz: start_frequency,
            step_khz: frequency_step,
            len: samples.len(),
        };
        let len = u32::try_from(samples.len()).map_err(|_| overflow())?;
        len.checked_mul(frequency_step)
            .and_then(|span| span.checked_add(start_frequency))
            .ok_or_else(overflow)?;

        Ok(Self {
            start_frequency,
            frequency_step,
            samples,
        })
    }

    /// Build a spectrum from a `[start, end)` range. `end - start` must be a
    /// whole number of steps, equal to the number of samples.
    pub fn from_range(
        start_frequency: u32,
        end_frequency: u32,
        frequency_step: u32,
        samples: Vec<i32>,
    ) -> Result<Self, SpectrumError> {
        if frequency_step == 0 {
            return Err(SpectrumError::ZeroFrequencyStep);
        }
        let span = end_frequency.saturating_sub(start_frequency);
        if span % frequency_step != 0 {
            return Err(SpectrumError::UnalignedRange {
                start_khz: start_frequency,
                end_khz: end_frequency,
                step_khz: frequency_step,
            });
        }
        let expected = (span / frequency_step) as usize;
        if expected != samples.len() {
            return Err(SpectrumError::LengthMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Self::new(start_frequency, frequency_step, samples)
    }

    pub fn start_frequency(&self) -> u32 {
        self.start_frequency
    }

    /// One step past the last sample
    pub fn end_frequency(&self) -> u32 {
        self.frequency_at(self.samples.len())
    }

    pub fn frequency_step(&self) -> u32 {
        self.frequency_step
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Frequency of sample `idx` in kHz. Valid for `idx <= len`.
    pub fn frequency_at(&self, idx: usize) -> u32 {
        debug_assert!(idx <= self.samples.len());
        self.start_frequency + idx as u32 * self.frequency_step
    }
}
