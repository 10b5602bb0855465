//! Unified error types for fanctl.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! supervisor's exit-path handling uniform.  All variants are `Copy` so
//! they pass through the scheduler and supervisor without allocation;
//! I/O failures are reduced to their [`io::ErrorKind`].

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the control loop funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The temperature sensor could not be read or returned garbage.
    Sensor(SensorError),
    /// The fan output channel could not be claimed or driven.
    Actuator(ActuatorError),
    /// Shutdown was requested (SIGINT / SIGTERM).
    Interrupted,
    /// Configuration is invalid.
    Config(ConfigError),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Interruption and actuator faults both exit with 1; configuration
    /// errors get their own code because nothing was claimed.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Sensor(_) | Self::Actuator(_) | Self::Interrupted => 1,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor file could not be opened or read.
    Unreadable(io::ErrorKind),
    /// The sensor returned something that is not a number.
    Malformed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(kind) => write!(f, "sensor unreadable ({kind})"),
            Self::Malformed => write!(f, "malformed sensor value"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The output channel could not be exported or configured.
    Claim(io::ErrorKind),
    /// Writing the output level failed.
    Write(io::ErrorKind),
    /// The channel was already released.
    Released,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claim(kind) => write!(f, "channel claim failed ({kind})"),
            Self::Write(kind) => write!(f, "GPIO write failed ({kind})"),
            Self::Released => write!(f, "channel already released"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Sampling interval below the supported minimum (value in seconds).
    IntervalTooShort(u64),
    /// Force mode and single-shot mode were both requested.
    ConflictingModes,
    /// Threshold is NaN or infinite.
    NonFiniteThreshold,
    /// Threshold below the shortest cooling run, so a triggering reading
    /// could map to a run shorter than `MIN_TIMER_SECS`.
    ThresholdTooLow,
    /// The configuration file could not be read.
    Unreadable(io::ErrorKind),
    /// The configuration file is not valid JSON for [`FanConfig`](crate::config::FanConfig).
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntervalTooShort(secs) => write!(
                f,
                "interval {secs}s is below the minimum of {}s",
                crate::config::INTERVAL_MIN_SECS
            ),
            Self::ConflictingModes => write!(f, "force and once modes are mutually exclusive"),
            Self::NonFiniteThreshold => write!(f, "threshold must be a finite number"),
            Self::ThresholdTooLow => write!(
                f,
                "threshold must be at least {}\u{00b0}C",
                crate::control::policy::MIN_TIMER_SECS
            ),
            Self::Unreadable(kind) => write!(f, "config file unreadable ({kind})"),
            Self::Malformed => write!(f, "config file malformed"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Cooling log errors
// ---------------------------------------------------------------------------

/// A record line could not be written.  Never fatal to the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogError {
    Io(io::ErrorKind),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "cooling log write failed ({kind})"),
        }
    }
}

impl From<io::Error> for LogError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.kind())
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
