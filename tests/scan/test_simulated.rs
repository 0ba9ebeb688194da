//! Realistic L-band sweeps: raised-cosine transponders on a noisy floor

use rustyscan::simulation::{synthesize, SimulationConfig, TransponderSpec};
use rustyscan::spectrum_file::{format_spectrum, parse_spectrum};
use rustyscan::{scan, ScanConfig};

#[path = "../test_utils.rs"]
mod test_utils;
use test_utils::{assert_well_formed, init_test_tracing};

fn lineup() -> Vec<TransponderSpec> {
    vec![
        TransponderSpec::new(1_100_000, 34_000, 5000).with_rolloff(0.2),
        TransponderSpec::new(1_250_000, 8_000, 3000).with_rolloff(0.2),
        TransponderSpec::new(1_500_000, 45_000, 6000).with_rolloff(0.25),
        TransponderSpec::new(1_800_000, 20_000, 4000).with_rolloff(0.35),
    ]
}

fn assert_finds_lineup(sigma: f64, seed: u64) {
    let sim = SimulationConfig {
        noise_sigma: sigma,
        seed,
        ..SimulationConfig::default()
    };
    let spectrum = synthesize(&sim, &lineup()).unwrap();
    let config = ScanConfig::default();
    let result = scan(&spectrum, &config).unwrap();

    assert_well_formed(&spectrum, result.peaks(), config.threshold2);
    assert_eq!(result.len(), 4, "sigma {} seed {}: {:?}", sigma, seed, result.peaks());
    for (peak, tp) in result.peaks().iter().zip(lineup()) {
        let offset = peak.freq_khz.abs_diff(tp.center_khz);
        assert!(offset <= tp.bandwidth_khz / 4, "{:?} vs {:?}", peak, tp);
        assert!(
            peak.bandwidth_khz * 10 >= tp.bandwidth_khz * 6 && peak.bandwidth_khz * 10 <= tp.bandwidth_khz * 13,
            "{:?} vs {:?}",
            peak,
            tp
        );
        assert_eq!(peak.symbol_rate, peak.bandwidth_khz as u64 * 1250);
    }
}

#[test]
fn test_clean_sweep() {
    init_test_tracing();
    assert_finds_lineup(0.0, 1);
}

#[test]
fn test_noisy_sweeps() {
    init_test_tracing();
    for seed in 1..=5 {
        assert_finds_lineup(200.0, seed);
    }
}

#[test]
fn test_scan_after_file_round_trip() {
    let sim = SimulationConfig {
        noise_sigma: 150.0,
        seed: 42,
        ..SimulationConfig::default()
    };
    let spectrum = synthesize(&sim, &lineup()).unwrap();

    let path = std::env::temp_dir().join(format!("rustyscan_sweep_{}.txt", std::process::id()));
    rustyscan::spectrum_file::write_spectrum_file(&path, &spectrum).unwrap();
    let loaded = rustyscan::spectrum_file::read_spectrum_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, spectrum);
    assert_eq!(parse_spectrum(&format_spectrum(&spectrum)).unwrap(), spectrum);

    let config = ScanConfig::default();
    assert_eq!(scan(&loaded, &config).unwrap(), scan(&spectrum, &config).unwrap());
}
