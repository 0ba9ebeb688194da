//! Spectrum Simulator
//!
//! Generate a blind-scan power spectrum with synthetic transponders:
//! - Adjustable noise floor and measurement noise
//! - Any number of transponders with raised-cosine skirts
//!
//! Usage:
//!   cargo run --bin spectrum_sim -- [OPTIONS] <output.txt>
//!
//! Options:
//!   -t, --transponder <center_khz:bw_khz:level_mdB[:rolloff]>  Add a transponder (repeatable)
//!   -f, --start <kHz>     First frequency (default: 950000)
//!   -w, --step <kHz>      Frequency step (default: 500)
//!   -l, --len <n>         Number of samples (default: 2400)
//!   -b, --floor <mdB>     Noise floor (default: -5000)
//!   -n, --noise <mdB>     Measurement noise standard deviation (default: 0)
//!   -r, --seed <n>        RNG seed (default: 1)
//!   -h, --help            Show this help message
//!
//! Examples:
//!   # Two transponders on a clean floor
//!   spectrum_sim -t 1100000:27500:4000 -t 1250000:8000:3000:0.2 out.txt
//!
//!   # Same with 0.2 dB measurement noise
//!   spectrum_sim -n 200 -t 1100000:27500:4000 out.txt

use rustyscan::simulation::{synthesize, SimulationConfig, TransponderSpec};
use rustyscan::spectrum_file::write_spectrum_file;
use rustyscan::tracing_init::init_tracing;

struct SimConfig {
    output_path: String,
    simulation: SimulationConfig,
    transponders: Vec<TransponderSpec>,
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let value = args.get(i).ok_or_else(|| format!("Missing value for {}", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

fn parse_transponder(text: &str) -> Result<TransponderSpec, String> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("Transponder must be center:bw:level[:rolloff], got {}", text));
    }
    let field = |idx: usize, name: &str| -> Result<i64, String> {
        parts[idx]
            .parse()
            .map_err(|_| format!("Invalid transponder {}: {}", name, parts[idx]))
    };

    let center = u32::try_from(field(0, "center")?).map_err(|_| format!("Invalid center in {}", text))?;
    let bandwidth = u32::try_from(field(1, "bandwidth")?).map_err(|_| format!("Invalid bandwidth in {}", text))?;
    let level = i32::try_from(field(2, "level")?).map_err(|_| format!("Invalid level in {}", text))?;

    let mut transponder = TransponderSpec::new(center, bandwidth, level);
    if let Some(rolloff) = parts.get(3) {
        let rolloff: f64 = rolloff
            .parse()
            .map_err(|_| format!("Invalid transponder rolloff: {}", rolloff))?;
        transponder = transponder.with_rolloff(rolloff);
    }
    Ok(transponder)
}

impl SimConfig {
    fn parse_args() -> Result<Option<Self>, String> {
        let args: Vec<String> = std::env::args().collect();

        let mut simulation = SimulationConfig::default();
        let mut transponders = Vec::new();
        let mut output_path = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-t" | "--transponder" => {
                    i += 1;
                    let text = args.get(i).ok_or("Missing value for --transponder")?;
                    transponders.push(parse_transponder(text)?);
                }
                "-f" | "--start" => {
                    i += 1;
                    simulation.start_khz = parse_value(&args, i, "--start")?;
                }
                "-w" | "--step" => {
                    i += 1;
                    simulation.step_khz = parse_value(&args, i, "--step")?;
                }
                "-l" | "--len" => {
                    i += 1;
                    simulation.len = parse_value(&args, i, "--len")?;
                }
                "-b" | "--floor" => {
                    i += 1;
                    simulation.floor = parse_value(&args, i, "--floor")?;
                }
                "-n" | "--noise" => {
                    i += 1;
                    simulation.noise_sigma = parse_value(&args, i, "--noise")?;
                }
                "-r" | "--seed" => {
                    i += 1;
                    simulation.seed = parse_value(&args, i, "--seed")?;
                }
                "-h" | "--help" => return Ok(None),
                arg if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
                arg => {
                    if output_path.is_some() {
                        return Err(format!("Unexpected argument: {}", arg));
                    }
                    output_path = Some(arg.to_string());
                }
            }
            i += 1;
        }

        let output_path = output_path.ok_or("Missing output file")?;
        Ok(Some(Self {
            output_path,
            simulation,
            transponders,
        }))
    }
}

fn print_usage() {
    eprintln!("Usage: spectrum_sim [OPTIONS] <output.txt>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --transponder <center_khz:bw_khz:level_mdB[:rolloff]>  Add a transponder");
    eprintln!("  -f, --start <kHz>     First frequency (default: 950000)");
    eprintln!("  -w, --step <kHz>      Frequency step (default: 500)");
    eprintln!("  -l, --len <n>         Number of samples (default: 2400)");
    eprintln!("  -b, --floor <mdB>     Noise floor (default: -5000)");
    eprintln!("  -n, --noise <mdB>     Measurement noise deviation (default: 0)");
    eprintln!("  -r, --seed <n>        RNG seed (default: 1)");
    eprintln!("  -h, --help            Show this help message");
}

fn main() {
    init_tracing();

    let config = match SimConfig::parse_args() {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    let spectrum = match synthesize(&config.simulation, &config.transponders) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = write_spectrum_file(&config.output_path, &spectrum) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!(
        "Wrote {} samples ({} - {} kHz) with {} transponder(s) to {}",
        spectrum.len(),
        spectrum.start_frequency(),
        spectrum.end_frequency(),
        config.transponders.len(),
        config.output_path
    );
}
