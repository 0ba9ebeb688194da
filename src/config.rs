//! Scan configuration
//!
//! Supplied once per scan. All levels are in the same 0.001 dB fixed-point
//! units as the spectrum samples.

use snafu::Snafu;

/// Empirical bandwidth (kHz) to symbol-rate factor used for the estimate
/// reported with each peak.
pub const SYMBOL_RATE_PER_KHZ: u32 = 1250;

/// Default window sizes, in samples. Fine steps at the small end, four
/// steps per octave above 8, so consecutive sizes never grow by more than
/// 3/2 and every plateau width falls inside some `[2w/3, w]` acceptance band.
pub const DEFAULT_WINDOW_SIZES: [usize; 36] = [
    2, 4, 6, 8, 10, 12, 14, 16, 20, 24, 28, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256,
    320, 384, 448, 512, 640, 768, 896, 1024, 1280, 1536, 1792, 2048,
];

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ConfigError {
    #[snafu(display("window ladder is empty"))]
    EmptyLadder,

    #[snafu(display("window size {size} is below the minimum of 2 samples"))]
    WindowTooSmall { size: usize },

    #[snafu(display("window ladder is not strictly ascending at {size}"))]
    LadderNotAscending { size: usize },

    #[snafu(display("mincount must be at least 1"))]
    ZeroMincount,

    #[snafu(display("{name} must not be negative (got {value})"))]
    NegativeThreshold { name: &'static str, value: i32 },

    #[snafu(display("symbol rate factor must be non-zero"))]
    ZeroSymbolRateFactor,
}

/// Ordered sequence of window sizes visited by the scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowLadder(Vec<usize>);

impl WindowLadder {
    pub fn new(sizes: Vec<usize>) -> Self {
        Self(sizes)
    }

    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<usize> {
        self.0.get(idx).copied()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::EmptyLadder);
        }
        let mut previous = 0;
        for &size in &self.0 {
            if size < 2 {
                return Err(ConfigError::WindowTooSmall { size });
            }
            if size <= previous {
                return Err(ConfigError::LadderNotAscending { size });
            }
            previous = size;
        }
        Ok(())
    }
}

impl Default for WindowLadder {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_SIZES.to_vec())
    }
}

/// How transponders show up in the acquired samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Transponders raise power above the noise floor
    #[default]
    Peak,
    /// Transponders appear as dips below the surrounding level
    Dip,
}

impl Polarity {
    /// Map a caller-units value into the orientation the detectors use, or
    /// back again; the mapping is its own inverse.
    pub fn orient(self, value: i32) -> i32 {
        match self {
            Polarity::Peak => value,
            Polarity::Dip => value.saturating_neg(),
        }
    }
}

/// Configuration for one blind-scan pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Window sizes to visit, ascending
    pub window_ladder: WindowLadder,
    /// Minimum power drop across an edge
    pub threshold: i32,
    /// Minimum SNR margin for a peak, and the level difference that makes
    /// one overlapping peak "significantly stronger" than another
    pub threshold2: i32,
    /// Consecutive detections needed to commit an edge mark
    pub mincount: u32,
    /// Sign convention of the samples
    pub polarity: Polarity,
    /// Bandwidth (kHz) to symbol-rate factor
    pub symbol_rate_factor: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_ladder: WindowLadder::default(),
            threshold: 2000,
            threshold2: 1000,
            mincount: 2,
            polarity: Polarity::Peak,
            symbol_rate_factor: SYMBOL_RATE_PER_KHZ,
        }
    }
}

impl ScanConfig {
    pub fn with_window_ladder(mut self, sizes: Vec<usize>) -> Self {
        self.window_ladder = WindowLadder::new(sizes);
        self
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_threshold2(mut self, threshold2: i32) -> Self {
        self.threshold2 = threshold2;
        self
    }

    pub fn with_mincount(mut self, mincount: u32) -> Self {
        self.mincount = mincount;
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_symbol_rate_factor(mut self, factor: u32) -> Self {
        self.symbol_rate_factor = factor;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window_ladder.validate()?;
        if self.mincount == 0 {
            return Err(ConfigError::ZeroMincount);
        }
        if self.threshold < 0 {
            return Err(ConfigError::NegativeThreshold {
                name: "threshold",
                value: self.threshold,
            });
        }
        if self.threshold2 < 0 {
            return Err(ConfigError::NegativeThreshold {
                name: "threshold2",
                value: self.threshold2,
            });
        }
        if self.symbol_rate_factor == 0 {
            return Err(ConfigError::ZeroSymbolRateFactor);
        }
        Ok(())
    }
}
