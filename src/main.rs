//! fanctl — entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │ ThermalZoneSensor FanDriver<SysfsPin> LogSink      SystemClock │
//! │ (SensorPort)      (FanPort)           (CoolingLog) (ClockPort) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │    Supervisor ─▶ Scheduler | ForceRunner  (pure logic) │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ctrlc handler ─▶ Shutdown token                               │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};
use tracing_subscriber::EnvFilter;

use fanctl::adapters::log_sink::LogSink;
use fanctl::adapters::time::SystemClock;
use fanctl::app::commands::RunMode;
use fanctl::app::service::{Outcome, Supervisor};
use fanctl::config::FanConfig;
use fanctl::control::policy::PolicyVariant;
use fanctl::drivers::fan::FanDriver;
use fanctl::drivers::gpio::SysfsPin;
use fanctl::error::{ConfigError, Error};
use fanctl::sensors::temperature::ThermalZoneSensor;
use fanctl::shutdown::Shutdown;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// First stage max(MIN_TIMER, t/2)
    Halved,
    /// First stage max(MIN_TIMER, t)
    Whole,
}

impl From<PolicyArg> for PolicyVariant {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Halved => Self::Halved,
            PolicyArg::Whole => Self::Whole,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "fanctl", version)]
#[command(about = "Run the CPU fan when the SoC gets hot", long_about = None)]
struct Args {
    /// Run the fan now for SECONDS (default 15), ignoring temperature
    #[arg(short, long, value_name = "SECONDS", num_args = 0..=1, default_missing_value = "15")]
    force: Option<u64>,

    /// Evaluate a single tick immediately, then exit
    #[arg(short, long)]
    once: bool,

    /// Sampling interval in seconds (min 10) [default: 30]
    #[arg(short, long, value_name = "SECONDS")]
    interval: Option<u64>,

    /// Trigger threshold in °C (min 5) [default: 48]
    #[arg(short, long, value_name = "DEGREES", allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Fan GPIO, BCM numbering [default: 17]
    #[arg(short, long)]
    pin: Option<u32>,

    /// Append cooling records to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Thermal zone file [default: /sys/class/thermal/thermal_zone0/temp]
    #[arg(long, value_name = "PATH")]
    sensor: Option<PathBuf>,

    /// Cooling duration policy
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Merge file, defaults and flags into one validated configuration.
fn build_config(args: &Args) -> core::result::Result<FanConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => FanConfig::load(path)?,
        None => FanConfig::default(),
    };

    if let Some(pin) = args.pin {
        config.pin = pin;
    }
    if let Some(interval) = args.interval {
        config.interval_secs = interval;
    }
    if let Some(threshold) = args.threshold {
        config.threshold_c = threshold;
    }
    if let Some(log) = &args.log {
        config.log_path = Some(log.clone());
    }
    if let Some(sensor) = &args.sensor {
        config.sensor_path = sensor.clone();
    }
    if let Some(policy) = args.policy {
        config.policy = policy.into();
    }

    config.mode = match (args.force, args.once) {
        (Some(_), true) => return Err(ConfigError::ConflictingModes),
        (Some(secs), false) => RunMode::Force { secs },
        (None, true) => RunMode::Once,
        (None, false) => config.mode,
    };

    config.validate()?;
    Ok(config)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Outcome> {
    let config = build_config(args).map_err(Error::from)?;
    info!("fanctl v{} on GPIO{}", env!("CARGO_PKG_VERSION"), config.pin);

    let shutdown = Shutdown::new();
    let handler = shutdown.clone();
    ctrlc::set_handler(move || handler.request()).context("failed to install signal handler")?;

    let mut sensor = ThermalZoneSensor::new(&config.sensor_path);
    let mut log = LogSink::from_path(config.log_path.as_deref());
    let mut clock = SystemClock::new();

    let outcome = Supervisor::new(&config).run(
        |cfg| SysfsPin::claim(cfg.pin).map(|pin| FanDriver::new(pin, cfg.pin)),
        &mut sensor,
        &mut log,
        &mut clock,
        &shutdown,
    );
    info!("exiting after {}s", clock.uptime().as_secs());
    Ok(outcome)
}

fn main() {
    init_logging();
    let args = Args::parse();

    let code = match run(&args) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!("{e:#}");
            e.downcast_ref::<Error>().map_or(1, Error::exit_code)
        }
    };
    process::exit(code);
}
