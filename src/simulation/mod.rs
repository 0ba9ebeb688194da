//! Synthetic spectra
//!
//! Renders transponders onto a flat noise floor: powers add in the linear
//! domain, the result is converted back to 0.001 dB and optional Gaussian
//! measurement noise (also in 0.001 dB) is added from a seeded RNG, so a
//! given configuration always yields the same spectrum.

mod transponder;

pub use transponder::TransponderSpec;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, NormalError};
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::spectrum::{Spectrum, SpectrumError};

#[derive(Debug, Snafu)]
pub enum SimulationError {
    #[snafu(display("noise deviation {sigma} must not be negative"))]
    NegativeSigma { sigma: f64 },

    #[snafu(display("invalid noise deviation {sigma}"))]
    Noise { sigma: f64, source: NormalError },

    #[snafu(display("invalid spectrum geometry"))]
    Geometry { source: SpectrumError },
}

/// Sweep geometry and noise model
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub start_khz: u32,
    pub step_khz: u32,
    pub len: usize,
    /// Noise floor, 0.001 dB units
    pub floor: i32,
    /// Standard deviation of the measurement noise, 0.001 dB units
    pub noise_sigma: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_khz: 950_000,
            step_khz: 500,
            len: 2400,
            floor: -5000,
            noise_sigma: 0.0,
            seed: 1,
        }
    }
}

/// mdB → linear power
fn to_linear(mdb: f64) -> f64 {
    10f64.powf(mdb / 10_000.0)
}

/// linear power → mdB
fn to_mdb(linear: f64) -> f64 {
    10_000.0 * linear.log10()
}

/// Render `transponders` into a spectrum
pub fn synthesize(config: &SimulationConfig, transponders: &[TransponderSpec]) -> Result<Spectrum, SimulationError> {
    if config.noise_sigma < 0.0 {
        return Err(SimulationError::NegativeSigma {
            sigma: config.noise_sigma,
        });
    }

    let floor_linear = to_linear(config.floor as f64);
    let noise = if config.noise_sigma != 0.0 {
        Some(Normal::new(0.0, config.noise_sigma).context(NoiseSnafu { sigma: config.noise_sigma })?)
    } else {
        None
    };
    let mut rng = StdRng::seed_from_u64(config.seed);

    let samples = (0..config.len)
        .map(|idx| {
            let freq = config.start_khz as f64 + idx as f64 * config.step_khz as f64;
            let signal: f64 = transponders
                .iter()
                .map(|tp| {
                    let plateau = to_linear(config.floor as f64 + tp.level as f64) - floor_linear;
                    plateau * tp.shape(freq)
                })
                .sum();
            // Negative-level transponders can cancel the floor entirely
            let mut mdb = to_mdb((floor_linear + signal).max(f64::MIN_POSITIVE));
            if let Some(noise) = &noise {
                mdb += noise.sample(&mut rng);
            }
            mdb.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
        })
        .collect();

    debug!(
        len = config.len,
        transponders = transponders.len(),
        noise_sigma = config.noise_sigma,
        "synthesized spectrum"
    );
    Spectrum::new(config.start_khz, config.step_khz, samples).context(GeometrySnafu)
}
