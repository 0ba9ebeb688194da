//! Hand-built spectra with known answers
//!
//! Transponders are drawn as dips below a -5 dB floor, so these run with
//! `Polarity::Dip`. The peak-polarity mirror images are checked at the end.

use rustyscan::{scan, scan_with, Polarity, ScanConfig, ScanError, Spectrum};

#[path = "../test_utils.rs"]
mod test_utils;
use test_utils::{assert_well_formed, grid_freq, grid_spectrum, init_test_tracing, plateau_samples, spans, FLOOR};

fn dip_config() -> ScanConfig {
    ScanConfig::default()
        .with_threshold(1000)
        .with_threshold2(1000)
        .with_mincount(1)
        .with_polarity(Polarity::Dip)
}

#[test]
fn test_flat_spectrum() {
    init_test_tracing();
    let spectrum = grid_spectrum(vec![FLOOR; 1000]);

    let result = scan(&spectrum, &ScanConfig::default()).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.stats().raw_candidates, 0);
    assert_eq!(result.stats().windows, 36);

    let result = scan(&spectrum, &dip_config()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_single_rectangular_dip() {
    init_test_tracing();
    let spectrum = grid_spectrum(plateau_samples(1000, FLOOR, &[(400, 420, -8000)]));
    let config = dip_config();
    let result = scan(&spectrum, &config).unwrap();

    assert_eq!(result.len(), 1);
    let peak = result.peaks()[0];
    assert_eq!((peak.rise_idx, peak.fall_idx), (400, 419));
    assert_eq!(peak.freq_khz, grid_freq(409));
    assert_eq!(peak.bandwidth_khz, 1900);
    assert_eq!(peak.symbol_rate, 1900 * 1250);
    assert_eq!(peak.level, -8000);
    assert_eq!(peak.snr, 3000);
    assert_eq!(peak.window, 20);

    // Seen again at w=24 and dropped as a duplicate
    assert_eq!(result.stats().raw_candidates, 2);
    assert_eq!(result.stats().rejected_overlap, 1);
    assert_well_formed(&spectrum, result.peaks(), config.threshold2);
}

#[test]
fn test_single_dip_with_mincount_two() {
    let spectrum = grid_spectrum(plateau_samples(1000, FLOOR, &[(400, 420, -8000)]));
    let config = dip_config().with_mincount(2);
    let result = scan(&spectrum, &config).unwrap();

    // Edges are committed one sample further out
    assert_eq!(spans(result.peaks()), vec![(399, 420)]);
    let peak = result.peaks()[0];
    assert_eq!(peak.freq_khz, grid_freq(409));
    assert_eq!(peak.bandwidth_khz, 2100);
    assert_eq!(peak.window, 24);
    assert_eq!(peak.level, -7857);
    assert_eq!(peak.snr, 2857);
}

#[test]
fn test_two_separated_dips() {
    init_test_tracing();
    let spectrum = grid_spectrum(plateau_samples(1000, FLOOR, &[(200, 210, -8000), (600, 640, -8000)]));
    let config = dip_config();
    let result = scan(&spectrum, &config).unwrap();

    assert_eq!(spans(result.peaks()), vec![(200, 209), (602, 637)]);
    let (narrow, wide) = (result.peaks()[0], result.peaks()[1]);
    assert_eq!(narrow.freq_khz, grid_freq(204));
    assert_eq!(narrow.bandwidth_khz, 900);
    assert_eq!(narrow.window, 10);
    assert_eq!(wide.freq_khz, grid_freq(619));
    assert_eq!(wide.bandwidth_khz, 3500);
    assert_eq!(wide.window, 40);
    assert!(wide.bandwidth_khz > 3 * narrow.bandwidth_khz);

    assert_eq!(result.stats().raw_candidates, 4);
    assert_eq!(result.stats().rejected_overlap, 2);
    assert_well_formed(&spectrum, result.peaks(), config.threshold2);
}

#[test]
fn test_nested_dips_keep_the_deeper() {
    init_test_tracing();
    // Wide shallow shelf with a narrow deep notch in the middle
    let spectrum = grid_spectrum(plateau_samples(1000, FLOOR, &[(300, 500, -6500), (390, 410, -9500)]));
    let config = dip_config();
    let result = scan(&spectrum, &config).unwrap();

    assert_eq!(spans(result.peaks()), vec![(390, 409)]);
    let peak = result.peaks()[0];
    assert_eq!(peak.level, -9500);
    assert_eq!(peak.snr, 3000);
    assert_eq!(peak.freq_khz, grid_freq(399));

    // Second sighting of the notch plus two shelf candidates, all rejected
    assert_eq!(result.stats().raw_candidates, 4);
    assert_eq!(result.stats().rejected_overlap, 3);
    assert_eq!(result.stats().superseded, 0);
}

#[test]
fn test_empty_spectrum() {
    let spectrum = Spectrum::new(950_000, 100, Vec::new()).unwrap();
    assert!(matches!(scan(&spectrum, &dip_config()), Err(ScanError::EmptySpectrum)));

    let mut seen = 0;
    let result = scan_with(&spectrum, &dip_config(), |_| {
        seen += 1;
        true
    });
    assert!(matches!(result, Err(ScanError::EmptySpectrum)));
    assert_eq!(seen, 0);
}

#[test]
fn test_peak_polarity_mirror() {
    let dips = plateau_samples(1000, FLOOR, &[(200, 210, -8000), (600, 640, -8000)]);
    let bumps = plateau_samples(1000, FLOOR, &[(200, 210, -2000), (600, 640, -2000)]);

    let dip_result = scan(&grid_spectrum(dips), &dip_config()).unwrap();
    let peak_config = dip_config().with_polarity(Polarity::Peak);
    let peak_result = scan(&grid_spectrum(bumps), &peak_config).unwrap();

    assert_eq!(spans(dip_result.peaks()), spans(peak_result.peaks()));
    for (dip, bump) in dip_result.peaks().iter().zip(peak_result.peaks()) {
        assert_eq!(dip.freq_khz, bump.freq_khz);
        assert_eq!(dip.bandwidth_khz, bump.bandwidth_khz);
        assert_eq!(dip.snr, bump.snr);
        assert_eq!(bump.level, -2000);
    }
}

#[test]
fn test_threshold_above_edge_height() {
    // 3 dB bump never clears a 3 dB edge threshold (strict comparison)
    let spectrum = grid_spectrum(plateau_samples(1000, FLOOR, &[(400, 420, -2000)]));
    let config = ScanConfig::default().with_threshold(3000).with_mincount(1);
    let result = scan(&spectrum, &config).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.stats().raw_candidates, 0);
}

#[test]
fn test_snr_below_threshold2() {
    let spectrum = grid_spectrum(plateau_samples(1000, FLOOR, &[(400, 420, -2000)]));
    let config = ScanConfig::default()
        .with_threshold(1000)
        .with_threshold2(3001)
        .with_mincount(1);
    let result = scan(&spectrum, &config).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.stats().raw_candidates, 2);
    assert_eq!(result.stats().rejected_low_snr, 2);
}

#[test]
fn test_pulse_at_the_edges_of_the_sweep() {
    // Plateaus touching either end have no outside samples to compare to
    let spectrum = grid_spectrum(plateau_samples(300, FLOOR, &[(0, 20, -2000), (280, 300, -2000)]));
    let config = ScanConfig::default().with_threshold(1000).with_mincount(1);
    let result = scan(&spectrum, &config).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.stats().raw_candidates, 0);
}
