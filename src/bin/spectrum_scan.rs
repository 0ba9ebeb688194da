//! Blind-scan Spectrum Analyzer
//!
//! Reads a spectrum file and lists candidate transponders.
//!
//! **Usage**:
//! ```bash
//! cargo run --bin spectrum_scan -- [OPTIONS] <spectrum.txt>
//! ```
//!
//! Options:
//!   -t, --threshold <mdB>    Minimum edge drop (default: 2000)
//!   -s, --snr <mdB>          Minimum SNR margin, threshold2 (default: 1000)
//!   -m, --mincount <n>       Consecutive detections per edge (default: 2)
//!   -d, --dip                Transponders appear as dips in the samples
//!   -h, --help               Show this help message
//!
//! **Output**:
//! One line per candidate: frequency, bandwidth, symbol-rate estimate, SNR
//! and level. Set `RUST_LOG=rustyscan=debug` for per-window detail.

use rustyscan::spectrum_file::read_spectrum_file;
use rustyscan::tracing_init::init_tracing;
use rustyscan::{scan, Polarity, ScanConfig};

struct CliConfig {
    input_path: String,
    scan: ScanConfig,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <spectrum.txt>", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --threshold <mdB>    Minimum edge drop (default: 2000)");
    eprintln!("  -s, --snr <mdB>          Minimum SNR margin (default: 1000)");
    eprintln!("  -m, --mincount <n>       Consecutive detections per edge (default: 2)");
    eprintln!("  -d, --dip                Transponders appear as dips");
    eprintln!("  -h, --help               Show this help message");
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let value = args.get(i).ok_or_else(|| format!("Missing value for {}", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

impl CliConfig {
    fn parse_args(args: &[String]) -> Result<Option<Self>, String> {
        let mut scan = ScanConfig::default();
        let mut input_path = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-t" | "--threshold" => {
                    i += 1;
                    scan.threshold = parse_value(args, i, "--threshold")?;
                }
                "-s" | "--snr" => {
                    i += 1;
                    scan.threshold2 = parse_value(args, i, "--snr")?;
                }
                "-m" | "--mincount" => {
                    i += 1;
                    scan.mincount = parse_value(args, i, "--mincount")?;
                }
                "-d" | "--dip" => scan.polarity = Polarity::Dip,
                "-h" | "--help" => return Ok(None),
                arg if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
                arg => {
                    if input_path.is_some() {
                        return Err(format!("Unexpected argument: {}", arg));
                    }
                    input_path = Some(arg.to_string());
                }
            }
            i += 1;
        }

        let input_path = input_path.ok_or_else(|| "Missing input spectrum file".to_string())?;
        Ok(Some(Self { input_path, scan }))
    }
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("spectrum_scan");

    let config = match CliConfig::parse_args(&args) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_usage(program);
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            std::process::exit(1);
        }
    };

    let spectrum = match read_spectrum_file(&config.input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading spectrum: {}", e);
            std::process::exit(1);
        }
    };

    println!("Reading spectrum: {}", config.input_path);
    println!(
        "  Range: {} - {} kHz ({} samples, {} kHz step)",
        spectrum.start_frequency(),
        spectrum.end_frequency(),
        spectrum.len(),
        spectrum.frequency_step()
    );
    println!();

    let result = match scan(&spectrum, &config.scan) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Scan failed: {}", e);
            std::process::exit(1);
        }
    };

    if result.is_empty() {
        println!("No transponders detected.");
        return;
    }

    println!("Detected {} candidate transponder(s)", result.len());
    println!();
    println!("  Freq (kHz)  BW (kHz)   SR (sym/s)   SNR (dB)  Level (dB)");
    println!("  ----------  --------  -----------  --------  ----------");
    for peak in result.peaks() {
        println!(
            "  {:10}  {:8}  {:11}  {:8.2}  {:10.2}",
            peak.freq_khz,
            peak.bandwidth_khz,
            peak.symbol_rate,
            peak.snr as f64 / 1000.0,
            peak.level as f64 / 1000.0
        );
    }

    let stats = result.stats();
    println!();
    println!(
        "  {} windows, {} raw candidates, {} low SNR, {} overlapped, {} superseded",
        stats.windows, stats.raw_candidates, stats.rejected_low_snr, stats.rejected_overlap, stats.superseded
    );
}
