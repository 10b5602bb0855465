//! Cooling action record and its log-line rendering.
//!
//! A record line is written in two halves around the actuation:
//!
//! ```text
//!   before fan ON:   2024-03-09 07:05:09 + 28s: 50.0°C
//!   after fan OFF:                                    -> 44.5°C\n
//! ```
//!
//! A run that never produces an after reading (interrupted hold, failed
//! resample) closes the line with a bare newline.

use core::fmt;

use chrono::{DateTime, Utc};

/// Timestamp layout of a record line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything known when the fan is about to be switched on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingStart {
    /// UTC time the fan was switched on.
    pub started_at: DateTime<Utc>,
    /// Seconds the fan will be held on.
    pub duration_secs: u64,
    /// Reading that triggered (or labelled) the run.
    pub temp_before: f64,
}

impl CoolingStart {
    /// `YYYY-MM-DD HH:MM:SS + {d}s: {t}°C`, no newline.
    pub fn line_prefix(&self) -> String {
        format!(
            "{} + {}s: {}\u{00b0}C",
            self.started_at.format(TIMESTAMP_FORMAT),
            self.duration_secs,
            Celsius(self.temp_before),
        )
    }

    pub fn finished(self, temp_after: f64) -> CoolingAction {
        CoolingAction {
            started_at: self.started_at,
            duration_secs: self.duration_secs,
            temp_before: self.temp_before,
            temp_after,
        }
    }
}

/// Closing half of a record line, newline included.
pub fn line_suffix(temp_after: Option<f64>) -> String {
    match temp_after {
        Some(t) => format!(" -> {}\u{00b0}C\n", Celsius(t)),
        None => "\n".to_string(),
    }
}

/// One completed cooling run.  Lives just long enough to be logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingAction {
    /// UTC time the fan was switched on.
    pub started_at: DateTime<Utc>,
    /// Seconds the fan was held on.
    pub duration_secs: u64,
    /// Reading that triggered (or labelled) the run.
    pub temp_before: f64,
    /// Reading taken after the fan was switched off.
    pub temp_after: f64,
}

impl CoolingAction {
    pub fn start(&self) -> CoolingStart {
        CoolingStart {
            started_at: self.started_at,
            duration_secs: self.duration_secs,
            temp_before: self.temp_before,
        }
    }

    /// Render the whole record line, newline included:
    /// `YYYY-MM-DD HH:MM:SS + {d}s: {t}°C -> {t_after}°C`.
    pub fn log_line(&self) -> String {
        self.start().line_prefix() + &line_suffix(Some(self.temp_after))
    }
}

/// Temperature as the cooling log has always printed it: shortest
/// round-trip decimal, whole numbers keep a trailing `.0`.
#[derive(Debug, Clone, Copy)]
pub struct Celsius(pub f64);

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 {
            write!(f, "{v:.1}")
        } else {
            write!(f, "{v}")
        }
    }
}
