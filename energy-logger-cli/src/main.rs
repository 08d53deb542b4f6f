//! Energy Logger Reader CLI Application
//!
//! This is the command-line interface for the energy logger data reader.
//! It uses the energy-logger-decoder library and adds:
//! - File discovery (file name → sensor id)
//! - Tariff configuration (command line + TOML file)
//! - Per-sensor decoding, one sensor per worker
//! - Report generation (text/JSON)

use anyhow::{bail, Context, Result};
use clap::Parser;
use energy_logger_decoder::tariff::{self, parse_time_of_day, TimeOfDay};
use energy_logger_decoder::{cost, Decoder, SensorDataset, TariffSchedule};
use log::LevelFilter;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod discovery;
mod report;

use config::{AppConfig, OutputFormat};
use report::SensorReport;

/// Energy Logger Reader - Decode energy logger data files and price consumption
#[derive(Parser, Debug)]
#[command(name = "energy-logger")]
#[command(about = "Decode energy logger data files and compute tariff costs", long_about = None)]
#[command(version)]
struct Args {
    /// Logger data files; the first letter of each name selects the sensor (A = 0 ... J = 9)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Apply tariff 1 starting at this time each day (can be repeated). Format: hh[:mm[:ss]]
    #[arg(long, value_name = "TIME", value_parser = parse_time_of_day)]
    tariff1: Vec<TimeOfDay>,

    /// Apply tariff 2 starting at this time each day (can be repeated). Format: hh[:mm[:ss]]
    #[arg(long, value_name = "TIME", value_parser = parse_time_of_day)]
    tariff2: Vec<TimeOfDay>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (default: text, or the config file's choice)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Energy Logger Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", energy_logger_decoder::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let schedule = build_schedule(&app_config, &args)?;
    for window in &schedule.windows {
        log::info!("Tariff 1 window: {}", window);
    }

    let groups = discovery::group_by_sensor(&args.files)?;
    let decoder = Decoder::new();

    // Sensors are independent; files of one sensor are decoded in order.
    let mut reports = groups
        .into_par_iter()
        .map(|(sensor_id, paths)| decode_sensor(&decoder, &schedule, sensor_id, &paths))
        .collect::<Result<Vec<_>>>()?;
    reports.sort_by_key(|report| report.sensor_id);

    let format = args.format.unwrap_or(app_config.output.format);
    let rendered = match format {
        OutputFormat::Text => report::render_text(&schedule, &reports),
        OutputFormat::Json => {
            report::render_json(&schedule, &reports).context("Failed to serialize report")?
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Merge configured and command-line tariff start times
fn build_schedule(app_config: &AppConfig, args: &Args) -> Result<TariffSchedule> {
    let (mut tariff1, mut tariff2) = app_config.tariff.start_times()?;
    tariff1.extend(args.tariff1.iter().copied());
    tariff2.extend(args.tariff2.iter().copied());
    Ok(tariff::merge(&tariff1, &tariff2))
}

/// Decode every file of one sensor, in the given order
fn decode_sensor(
    decoder: &Decoder,
    schedule: &TariffSchedule,
    sensor_id: u8,
    paths: &[PathBuf],
) -> Result<SensorReport> {
    let mut dataset = SensorDataset::new();

    for path in paths {
        accumulate_file(decoder, &mut dataset, sensor_id, path)?;
    }

    if let Some(header_id) = dataset.sensor_id() {
        if header_id != sensor_id {
            bail!(
                "Sensor {} files contain a header for sensor {}",
                sensor_id,
                header_id
            );
        }
    }

    let unresolved = dataset
        .records()
        .iter()
        .filter(|record| record.timestamp.is_none())
        .count();
    if unresolved > 0 {
        log::warn!(
            "Sensor {}: {} record(s) without timestamp (no header file given?)",
            sensor_id,
            unresolved
        );
    }

    let interval = decoder.config().sample_interval()?;
    let costs = cost::cost_series(&dataset, schedule, interval);
    Ok(SensorReport {
        sensor_id,
        dataset,
        costs,
    })
}

fn accumulate_file(
    decoder: &Decoder,
    dataset: &mut SensorDataset,
    sensor_id: u8,
    path: &Path,
) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let kind = decoder.accumulate(dataset, &data).with_context(|| {
        format!("Failed to decode {:?} for sensor {}", path, sensor_id)
    })?;
    log::info!("Sensor {}: decoded {:?} block from {:?}", sensor_id, kind, path);
    Ok(())
}

/// Level for this tool's own log targets: `-q` wins over any `-v`
fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Route decoder and CLI logs to stderr at the requested level.
///
/// Other crates stay at warnings unless `RUST_LOG` says otherwise.
fn init_logging(verbose: u8, quiet: bool) {
    use std::io::Write;

    let level = log_level(verbose, quiet);
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("energy_logger_decoder", level)
        .filter_module("energy_logger", level)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} {}: {}",
                record.level(),
                record.module_path().unwrap_or_else(|| record.target()),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        path
    }

    fn header_bytes(sensor_id: u8) -> Vec<u8> {
        let mut data = b"INFO:".to_vec();
        data.extend([0u8; 9 + 30 + 20 + 20]);
        data.push(sensor_id);
        data.extend([0, 5, 0, 0]); // 0.5
        data.extend([0, 2, 5, 0]); // 0.25
        data.extend([8, 0, 1, 15, 24]); // 2024-01-15 08:00
        data.extend([0xFF; 4]);
        data
    }

    #[test]
    fn test_log_level_from_flags() {
        assert_eq!(log_level(0, false), LevelFilter::Info);
        assert_eq!(log_level(1, false), LevelFilter::Debug);
        assert_eq!(log_level(4, false), LevelFilter::Trace);
        assert_eq!(log_level(2, true), LevelFilter::Error);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "energy-logger",
            "--tariff1",
            "22:00",
            "--tariff2",
            "6",
            "-f",
            "json",
            "A.BIN",
            "B.BIN",
        ])
        .unwrap();
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.tariff2[0].to_string(), "06:00:00");
        assert_eq!(args.format, Some(OutputFormat::Json));

        assert!(Args::try_parse_from(["energy-logger", "--tariff1", "25", "A.BIN"]).is_err());
        assert!(Args::try_parse_from(["energy-logger"]).is_err());
    }

    #[test]
    fn test_decode_sensor_with_header_and_stream() {
        let dir = tempfile::tempdir().unwrap();
        let header = write_file(dir.path(), "B_INFO.BIN", &header_bytes(1));
        let stream = write_file(
            dir.path(),
            "B_DATA.BIN",
            &[0x09, 0x60, 0x13, 0x88, 0x64, 0xFF, 0xFF, 0xFF], // 240 V, 5 A, 1.0
        );

        let schedule = tariff::merge(&[parse_time_of_day("08:00").unwrap()], &[]);
        let report = decode_sensor(&Decoder::new(), &schedule, 1, &[stream, header]).unwrap();

        assert_eq!(
            report.dataset.records()[0].timestamp.unwrap().to_string(),
            "2024-01-15 08:00:00"
        );
        assert_eq!(report.costs.len(), 1);
        assert!((report.total_cost() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_decode_sensor_id_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let header = write_file(dir.path(), "C_INFO.BIN", &header_bytes(4));

        let err = decode_sensor(&Decoder::new(), &TariffSchedule::default(), 2, &[header])
            .unwrap_err();
        assert!(err.to_string().contains("header for sensor 4"));
    }

    #[test]
    fn test_decode_error_names_file_and_sensor() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = header_bytes(0);
        bad.pop();
        let path = write_file(dir.path(), "A_INFO.BIN", &bad);

        let err = decode_sensor(&Decoder::new(), &TariffSchedule::default(), 0, &[path])
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("A_INFO.BIN"));
        assert!(message.contains("sensor 0"));
        assert!(message.contains("Bad header trailer"));
    }
}
