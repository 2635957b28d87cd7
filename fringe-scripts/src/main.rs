use std::env;
use std::f64::consts::PI;
use std::fs::File;
use std::path::PathBuf;

use fringe_lib::samples::{read_interference, SampleWriter};
use fringe_lib::{ExperimentParameters, WindowConfig};
use rand::Rng;

fn main() {
    let mut args = env::args().skip(1);
    let Some(cmd) = args.next() else {
        print_help();
        return;
    };

    match cmd.as_str() {
        "synth" => synth_cmd(args.collect()),
        "preview" => preview_cmd(args.collect()),
        "-h" | "--help" => print_help(),
        _ => {
            eprintln!("Unknown command: {}", cmd);
            print_help();
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Option<T> {
    let Some(value) = value else {
        eprintln!("{} requires a value", flag);
        return None;
    };
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("Invalid {} value: {}", flag, value);
            None
        }
    }
}

/// Write a synthetic interferogram: a cosine fringe under a gaussian
/// coherence envelope centred in the scan, on a DC offset, plus noise.
fn synth_cmd(args: Vec<String>) {
    let mut out_path: Option<PathBuf> = None;
    let mut samples: u64 = 200_000;
    let mut amplitude: f64 = 10_000.0;
    let mut offset: f64 = 12_000.0;
    let mut noise: f64 = 50.0;
    let mut coherence: f64 = 0.1;
    let mut params = ExperimentParameters::default();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" => match iter.next() {
                Some(path) => out_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--out requires a path");
                    return;
                }
            },
            "--params" => {
                let Some(path) = iter.next() else {
                    eprintln!("--params requires a path");
                    return;
                };
                match ExperimentParameters::from_json_file(&path) {
                    Ok(parsed) => params = parsed,
                    Err(err) => {
                        eprintln!("Failed to read {}: {}", path, err);
                        return;
                    }
                }
            }
            "--samples" => match parse_value("--samples", iter.next()) {
                Some(value) => samples = value,
                None => return,
            },
            "--amplitude" => match parse_value("--amplitude", iter.next()) {
                Some(value) => amplitude = value,
                None => return,
            },
            "--offset" => match parse_value("--offset", iter.next()) {
                Some(value) => offset = value,
                None => return,
            },
            "--noise" => match parse_value("--noise", iter.next()) {
                Some(value) => noise = value,
                None => return,
            },
            "--coherence" => match parse_value("--coherence", iter.next()) {
                Some(value) => coherence = value,
                None => return,
            },
            "-h" | "--help" => {
                print_synth_help();
                return;
            }
            _ => {
                eprintln!("Unknown synth arg: {}", arg);
                print_synth_help();
                return;
            }
        }
    }

    let Some(out_path) = out_path else {
        eprintln!("synth requires --out <path>");
        print_synth_help();
        return;
    };

    let config = match WindowConfig::from_parameters(&params) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid parameters: {}", err);
            return;
        }
    };

    let file = match File::create(&out_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Failed to create {}: {}", out_path.display(), err);
            return;
        }
    };

    // Fringe period in samples and envelope width, both from the scan geometry.
    let period = config.wavelength() / config.spatial_step();
    let centre = samples as f64 / 2.0;
    let width = (coherence * samples as f64).max(1.0);

    let mut rng = rand::thread_rng();
    let mut writer = SampleWriter::new(file);
    let signal = (0..samples).map(|i| {
        let t = i as f64;
        let envelope = (-((t - centre) / width).powi(2)).exp();
        let fringe = (2.0 * PI * t / period).cos();
        let jitter = if noise > 0.0 {
            rng.gen_range(-noise..noise)
        } else {
            0.0
        };
        (offset + amplitude * envelope * fringe + jitter)
            .round()
            .clamp(i32::MIN as f64, i32::MAX as f64) as i32
    });

    if let Err(err) = writer.write_samples(signal) {
        eprintln!("Failed to write {}: {}", out_path.display(), err);
        return;
    }
    let written = writer.samples_written();
    if let Err(err) = writer.finish() {
        eprintln!("Failed to write {}: {}", out_path.display(), err);
        return;
    }

    println!(
        "Wrote {} samples to {} (fringe period {:.2} samples, window {} samples)",
        written,
        out_path.display(),
        period,
        config.window_size()
    );
}

/// Print the first raw samples of a stream file, one per line.
fn preview_cmd(args: Vec<String>) {
    let mut path: Option<PathBuf> = None;
    let mut count: usize = 100;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--count" => match parse_value("--count", iter.next()) {
                Some(value) => count = value,
                None => return,
            },
            "-h" | "--help" => {
                print_preview_help();
                return;
            }
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => {
                eprintln!("Unknown preview arg: {}", arg);
                print_preview_help();
                return;
            }
        }
    }

    let Some(path) = path else {
        eprintln!("preview requires a stream file");
        print_preview_help();
        return;
    };

    match read_interference(&path, count) {
        Ok(samples) => {
            for sample in samples {
                println!("{}", sample);
            }
        }
        Err(err) => eprintln!("{}", err),
    }
}

fn print_help() {
    println!(
        "fringe-scripts\n\nCommands:\n  synth      Write a synthetic interferometer stream file\n  preview    Print the first raw samples of a stream file\n\nRun 'fringe-scripts <command> --help' for options."
    );
}

fn print_synth_help() {
    println!(
        "Usage: fringe-scripts synth --out <path> [options]\n\nOptions:\n  --out <path>         Destination .bin file\n  --params <path>      Experiment parameters JSON (defaults to the bench setup)\n  --samples <n>        Number of records (default 200000)\n  --amplitude <a>      Fringe amplitude (default 10000)\n  --offset <dc>        DC level (default 12000)\n  --noise <a>          Uniform noise amplitude (default 50)\n  --coherence <f>      Envelope width as a fraction of the scan (default 0.1)\n  -h, --help           Show this help"
    );
}

fn print_preview_help() {
    println!(
        "Usage: fringe-scripts preview <path> [options]\n\nOptions:\n  --count <n>    Number of samples to print (default 100)\n  -h, --help     Show this help"
    );
}
