//! System configuration parameters
//!
//! All tunable parameters for fanctl.  Built once at start-up from an
//! optional JSON file overlaid with command-line flags, validated, then
//! passed by reference for the rest of the process lifetime.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::commands::RunMode;
use crate::control::policy::{MIN_TIMER_SECS, PolicyVariant};
use crate::error::ConfigError;
use crate::pins;

/// Shortest supported sampling interval (seconds).
pub const INTERVAL_MIN_SECS: u64 = 10;
/// Default sampling interval (seconds).
pub const DEFAULT_INTERVAL_SECS: u64 = 30;
/// Default trigger threshold (°C).
pub const DEFAULT_THRESHOLD_C: f64 = 48.0;
/// Default force-mode duration when `-f` is given without a value.
pub const DEFAULT_FORCE_SECS: u64 = 15;
/// Consecutive sensor failures before the fault is surfaced.
pub const DEFAULT_SENSOR_FAULT_LIMIT: u32 = 3;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    // --- Hardware ---
    /// BCM GPIO number driving the fan transistor.
    pub pin: u32,
    /// Thermal zone file reporting millidegrees Celsius.
    pub sensor_path: PathBuf,

    // --- Control ---
    /// Temperature (°C) above which a tick triggers cooling.
    pub threshold_c: f64,
    /// Sampling interval (seconds).
    pub interval_secs: u64,
    /// Duration policy variant.
    pub policy: PolicyVariant,
    /// Scheduled, forced or single-shot run.
    pub mode: RunMode,

    // --- Output ---
    /// Cooling log file; `None` writes record lines to stdout.
    pub log_path: Option<PathBuf>,

    // --- Safety ---
    /// Consecutive sensor failures before escalating to `error!`.
    pub sensor_fault_limit: u32,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            pin: pins::FAN_GPIO,
            sensor_path: PathBuf::from(pins::CPU_THERMAL_ZONE),

            threshold_c: DEFAULT_THRESHOLD_C,
            interval_secs: DEFAULT_INTERVAL_SECS,
            policy: PolicyVariant::default(),
            mode: RunMode::Scheduled,

            log_path: None,

            sensor_fault_limit: DEFAULT_SENSOR_FAULT_LIMIT,
        }
    }
}

impl FanConfig {
    /// Load a configuration file.  Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable(e.kind()))?;
        serde_json::from_str(&raw).map_err(|_| ConfigError::Malformed)
    }

    /// Reject values the control loop cannot honour.
    ///
    /// Invalid ranges are rejected, not silently clamped.  A threshold
    /// of at least `MIN_TIMER_SECS` °C keeps every triggered run at
    /// `MIN_TIMER_SECS` or longer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs < INTERVAL_MIN_SECS {
            return Err(ConfigError::IntervalTooShort(self.interval_secs));
        }
        if !self.threshold_c.is_finite() {
            return Err(ConfigError::NonFiniteThreshold);
        }
        if self.threshold_c < MIN_TIMER_SECS as f64 {
            return Err(ConfigError::ThresholdTooLow);
        }
        Ok(())
    }
}
