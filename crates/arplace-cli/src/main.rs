use std::{error::Error, fs, path::Path};

use arplace_pipeline::{PlacementConfig, ReplayInput, ReplayReport, run_replay};
use clap::Parser;
use log::{LevelFilter, info};

/// Replay a recorded tracking session through the placement pipeline.
#[derive(Debug, Parser)]
#[command(author, version, about = "AR placement replay")]
struct Args {
    /// Path to JSON file containing a ReplayInput.
    #[arg(long)]
    input: String,

    /// Optional path to JSON PlacementConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    let value = serde_json::from_str(&data)
        .map_err(|err| format!("cannot parse {}: {err}", path.display()))?;
    Ok(value)
}

fn write_report_json(report: &ReplayReport) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn run_replay_from_files(
    input_path: &str,
    config_path: Option<&str>,
) -> Result<String, Box<dyn Error>> {
    let input: ReplayInput = load_json_file(Path::new(input_path))?;

    let config = if let Some(cfg_path) = config_path {
        load_json_file::<PlacementConfig>(Path::new(cfg_path))?
    } else {
        PlacementConfig::default()
    };

    let report = run_replay(&input, &config)?;
    info!(
        "{} frame(s), {} placed object(s)",
        report.frames.len(),
        report.objects.len()
    );
    write_report_json(&report)
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);
    let json = run_replay_from_files(&args.input, args.config.as_deref())?;
    println!("{}", json);
    Ok(())
}
