
pub mod config;
pub mod scan;
pub mod simulation;
pub mod spectrum;
pub mod spectrum_file;
pub mod tracing_init;

pub use config::{Polarity, ScanConfig, WindowLadder, SYMBOL_RATE_PER_KHZ};
pub use scan::{scan, scan_many, scan_with, AcceptedPeak, ScanError, ScanResult, ScanStats, Scanner};
pub use spectrum::{Spectrum, SpectrumError};
