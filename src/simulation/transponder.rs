//! Transponder power-spectral shapes

use std::f64::consts::PI;

/// One simulated transponder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransponderSpec {
    /// Center frequency in kHz
    pub center_khz: u32,
    /// Occupied bandwidth in kHz (flat top plus half of each skirt)
    pub bandwidth_khz: u32,
    /// Plateau height above the noise floor, 0.001 dB units
    pub level: i32,
    /// Raised-cosine roll-off factor, 0.0 for a rectangular spectrum
    pub rolloff: f64,
}

impl TransponderSpec {
    pub fn new(center_khz: u32, bandwidth_khz: u32, level: i32) -> Self {
        Self {
            center_khz,
            bandwidth_khz,
            level,
            rolloff: 0.0,
        }
    }

    pub fn with_rolloff(mut self, rolloff: f64) -> Self {
        self.rolloff = rolloff.clamp(0.0, 1.0);
        self
    }

    /// Relative power (0.0..=1.0) of the transponder at `freq_khz`
    pub fn shape(&self, freq_khz: f64) -> f64 {
        let half = self.bandwidth_khz as f64 / 2.0;
        let distance = (freq_khz - self.center_khz as f64).abs();
        let alpha = self.rolloff;

        let flat = half * (1.0 - alpha);
        let edge = half * (1.0 + alpha);
        if distance <= flat {
            1.0
        } else if distance > edge || alpha == 0.0 {
            0.0
        } else {
            0.5 * (1.0 + (PI * (distance - flat) / (2.0 * alpha * half)).cos())
        }
    }
}
