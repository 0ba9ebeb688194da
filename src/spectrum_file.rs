//! Plain-text spectrum files
//!
//! **Format**:
//! - One `frequency_khz power` pair per line, whitespace separated
//! - Power in 0.001 dB units (signed integer)
//! - Frequencies ascending with a uniform step
//! - `#` starts a comment; `# step_khz: N` declares the step, which is
//!   required only when the file holds fewer than two samples
//!
//! The module can operate in two modes:
//! - `parse_spectrum` / `format_spectrum` on strings
//! - `read_spectrum_file` / `write_spectrum_file` on paths

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};

use crate::spectrum::{Spectrum, SpectrumError};

#[derive(Debug, Snafu)]
pub enum SpectrumFileError {
    #[snafu(display("failed to read {}", path.display()))]
    Read { path: PathBuf, source: std::io::Error },

    #[snafu(display("failed to write {}", path.display()))]
    Write { path: PathBuf, source: std::io::Error },

    #[snafu(display("line {line}: {reason}"))]
    Parse { line: usize, reason: String },

    #[snafu(display("line {line}: frequency step {found} kHz differs from {expected} kHz"))]
    NonUniformStep { line: usize, expected: u32, found: i64 },

    #[snafu(display("frequency step unknown: fewer than two samples and no step_khz header"))]
    MissingStep,

    #[snafu(display("invalid spectrum"))]
    Invalid { source: SpectrumError },
}

const STEP_DIRECTIVE: &str = "step_khz:";

fn parse_field<T: std::str::FromStr>(field: Option<&str>, line: usize, what: &str) -> Result<T, SpectrumFileError> {
    let field = field.ok_or_else(|| SpectrumFileError::Parse {
        line,
        reason: format!("missing {}", what),
    })?;
    field.parse().map_err(|_| SpectrumFileError::Parse {
        line,
        reason: format!("invalid {} '{}'", what, field),
    })
}

/// Parse a spectrum from its text form
pub fn parse_spectrum(text: &str) -> Result<Spectrum, SpectrumFileError> {
    let mut declared_step: Option<u32> = None;
    let mut start: Option<u32> = None;
    let mut previous: Option<u32> = None;
    let mut step: Option<u32> = None;
    let mut samples = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim();

        if let Some(comment) = content.strip_prefix('#') {
            if let Some(value) = comment.trim().strip_prefix(STEP_DIRECTIVE) {
                declared_step = Some(parse_field(Some(value.trim()), line, "step_khz")?);
            }
            continue;
        }
        if content.is_empty() {
            continue;
        }

        let mut fields = content.split_whitespace();
        let freq: u32 = parse_field(fields.next(), line, "frequency")?;
        let power: i32 = parse_field(fields.next(), line, "power")?;
        if fields.next().is_some() {
            return Err(SpectrumFileError::Parse {
                line,
                reason: "trailing fields".to_string(),
            });
        }

        match (previous, step) {
            (None, _) => start = Some(freq),
            (Some(prev), None) => {
                let found = freq as i64 - prev as i64;
                if found <= 0 {
                    return Err(SpectrumFileError::NonUniformStep {
                        line,
                        expected: declared_step.unwrap_or(0),
                        found,
                    });
                }
                step = Some(found as u32);
            }
            (Some(prev), Some(expected)) => {
                let found = freq as i64 - prev as i64;
                if found != expected as i64 {
                    return Err(SpectrumFileError::NonUniformStep { line, expected, found });
                }
            }
        }
        previous = Some(freq);
        samples.push(power);
    }

    if let (Some(declared), Some(measured)) = (declared_step, step) {
        if declared != measured {
            return Err(SpectrumFileError::NonUniformStep {
                line: 0,
                expected: declared,
                found: measured as i64,
            });
        }
    }

    let step = step.or(declared_step).ok_or(SpectrumFileError::MissingStep)?;
    Spectrum::new(start.unwrap_or(0), step, samples).context(InvalidSnafu)
}

/// Text form of a spectrum, readable by [`parse_spectrum`]
pub fn format_spectrum(spectrum: &Spectrum) -> String {
    let mut out = String::with_capacity(spectrum.len() * 16 + 32);
    let _ = writeln!(out, "# {} {}", STEP_DIRECTIVE, spectrum.frequency_step());
    for (idx, power) in spectrum.samples().iter().enumerate() {
        let _ = writeln!(out, "{} {}", spectrum.frequency_at(idx), power);
    }
    out
}

pub fn read_spectrum_file<P: AsRef<Path>>(path: P) -> Result<Spectrum, SpectrumFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(ReadSnafu { path })?;
    parse_spectrum(&text)
}

pub fn write_spectrum_file<P: AsRef<Path>>(path: P, spectrum: &Spectrum) -> Result<(), SpectrumFileError> {
    let path = path.as_ref();
    fs::write(path, format_spectrum(spectrum)).context(WriteSnafu { path })
}
