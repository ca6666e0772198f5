//! Tablet-mode CLI
//!
//! Capture, inspect and replay accelerometer data of a 2-in-1 convertible.
//!
//! # Commands
//!
//! - `record`: labelled raw captures for building datasets
//! - `angles`: raw readings with tilt angles of both halves
//! - `angle`: hinge angle between the two halves
//! - `detect`: live threshold classification
//! - `filter`: smooth a recorded capture for the regression tool
//! - `watch`: long-running monitor reporting posture changes

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use tabletmode::classifier::{TabletDetector, ThresholdClassifier};
use tabletmode::config::SensingConfig;
use tabletmode::error::{Result, SensingError};
use tabletmode::export::{
    filter_recording, AngleRow, CaptureRow, HingeRow, ANGLE_HEADER, CAPTURE_HEADER,
    CAPTURE_SEPARATOR, EXPORT_SEPARATOR, HINGE_HEADER,
};
use tabletmode::pipeline::{monitor_from_config, MonitorEvent};
use tabletmode::source::{SensorSource, SysfsSource};
use tabletmode::vector::tilt_angles;

/// Tablet-mode detection from two accelerometers
#[derive(Parser)]
#[command(name = "tabletmode")]
#[command(version)]
#[command(about = "Tablet-mode detection for 2-in-1 convertibles")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the IIO devices directory
    #[arg(long, global = true)]
    iio_root: Option<PathBuf>,

    /// Override the touchscreen IIO device name
    #[arg(long, global = true)]
    touchscreen: Option<String>,

    /// Override the keyboard IIO device name
    #[arg(long, global = true)]
    keyboard: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print labelled raw captures
    Record {
        /// Label written in the is_tablet column
        #[arg(long, action = clap::ArgAction::Set)]
        label: bool,
        /// Seconds between two captures
        #[arg(long, default_value_t = 0.2)]
        delay: f64,
        /// Stop after this many rows
        #[arg(long)]
        count: Option<u64>,
    },
    /// Print raw readings and tilt angles
    Angles {
        #[arg(long, default_value_t = 10)]
        count: u64,
    },
    /// Print the angle between the two halves
    Angle {
        #[arg(long, default_value_t = 1)]
        count: u64,
        /// Seconds between two readings
        #[arg(long, default_value_t = 1.0)]
        delay: f64,
    },
    /// Classify live readings with the threshold table
    Detect {
        /// Seconds between two classifications
        #[arg(long, default_value_t = 3.0)]
        delay: f64,
        #[arg(long)]
        count: Option<u64>,
    },
    /// Smooth a recorded capture
    Filter {
        /// Capture file, `;` or space separated
        path: PathBuf,
        /// Skip the first line
        #[arg(long)]
        has_header: bool,
    },
    /// Monitor the posture and report changes
    Watch,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Record {
            label,
            delay,
            count,
        } => record(&config, label, seconds(delay)?, count),
        Commands::Angles { count } => angles(&config, count),
        Commands::Angle { count, delay } => hinge(&config, count, seconds(delay)?),
        Commands::Detect { delay, count } => detect(&config, seconds(delay)?, count),
        Commands::Filter { path, has_header } => filter(&config, &path, has_header),
        Commands::Watch => watch(&config),
    }
}

fn load_config(cli: &Cli) -> Result<SensingConfig> {
    let mut config = match &cli.config {
        Some(path) => SensingConfig::load(path)?,
        None => SensingConfig::default(),
    };
    if let Some(root) = &cli.iio_root {
        config.sensors.iio_root = root.clone();
    }
    if let Some(name) = &cli.touchscreen {
        config.sensors.touchscreen = name.clone();
    }
    if let Some(name) = &cli.keyboard {
        config.sensors.keyboard = name.clone();
    }
    config.validate()?;
    Ok(config)
}

fn seconds(value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| SensingError::Config(format!("invalid delay {value}: {e}")))
}

/// Rows to go: `None` runs until interrupted.
fn remaining(count: Option<u64>, done: u64) -> bool {
    count.map_or(true, |limit| done < limit)
}

fn record(config: &SensingConfig, label: bool, delay: Duration, count: Option<u64>) -> Result<()> {
    let mut source = SysfsSource::from_config(&config.sensors);
    println!("{CAPTURE_HEADER}");

    let mut done = 0;
    while remaining(count, done) {
        let sample = source.read_pair()?;
        println!("{}", CaptureRow::new(sample, label).to_csv_line(CAPTURE_SEPARATOR));
        done += 1;
        thread::sleep(delay);
    }
    Ok(())
}

fn angles(config: &SensingConfig, count: u64) -> Result<()> {
    let mut source = SysfsSource::from_config(&config.sensors);
    println!("{ANGLE_HEADER}");

    for _ in 0..count {
        let sample = source.read_pair()?;
        let tilts = tilt_angles(&sample.touchscreen.as_f64())
            .and_then(|ts| tilt_angles(&sample.keyboard.as_f64()).map(|kb| (ts, kb)));
        let (touchscreen_tilt, keyboard_tilt) = match tilts {
            Ok(tilts) => tilts,
            Err(err) => {
                warn!(
                    error = %err,
                    ts = %sample.touchscreen,
                    kb = %sample.keyboard,
                    "skipping sample"
                );
                continue;
            }
        };
        let row = AngleRow {
            sample,
            touchscreen_tilt,
            keyboard_tilt,
            timestamp_ms: unix_millis(),
        };
        println!("{}", row.to_csv_line());
    }
    Ok(())
}

fn hinge(config: &SensingConfig, count: u64, delay: Duration) -> Result<()> {
    let mut source = SysfsSource::from_config(&config.sensors);
    println!("{HINGE_HEADER}");

    for done in 0..count {
        if done > 0 {
            thread::sleep(delay);
        }
        let sample = source.read_pair()?;
        match HingeRow::from_sample(sample) {
            Ok(row) => println!("{}", row.to_csv_line()),
            Err(err) => {
                warn!(
                    error = %err,
                    ts = %sample.touchscreen,
                    kb = %sample.keyboard,
                    "skipping sample"
                );
            }
        }
    }
    Ok(())
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn detect(config: &SensingConfig, delay: Duration, count: Option<u64>) -> Result<()> {
    let mut source = SysfsSource::from_config(&config.sensors);

    let mut done = 0;
    while remaining(count, done) {
        let sample = source.read_pair()?;
        let wide = sample.as_f64();
        let is_tablet = ThresholdClassifier.is_tablet(&wide.touchscreen, &wide.keyboard);
        println!(
            "ts: ({})  kb: ({}) {}",
            sample.touchscreen, sample.keyboard, is_tablet
        );
        done += 1;
        thread::sleep(delay);
    }
    Ok(())
}

fn filter(config: &SensingConfig, path: &Path, has_header: bool) -> Result<()> {
    let input = fs::read_to_string(path).map_err(|source| SensingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    for line in filter_recording(&input, has_header, config.filter_config()?, EXPORT_SEPARATOR)? {
        println!("{line}");
    }
    Ok(())
}

fn watch(config: &SensingConfig) -> Result<()> {
    let mut monitor = monitor_from_config(config)?;
    let interval = config.monitor.poll_interval();
    info!(
        detectors = ?monitor.policy().detectors(),
        interval_ms = config.monitor.poll_interval_ms,
        "watching posture"
    );

    loop {
        // Failed polls (sensor or lid) are logged by the monitor; keep polling.
        if let Ok(outcome) = monitor.poll() {
            match outcome.event {
                MonitorEvent::EnteredTablet => println!("tablet"),
                MonitorEvent::LeftTablet => println!("laptop"),
                MonitorEvent::Unchanged => {}
            }
        }
        thread::sleep(interval);
    }
}
