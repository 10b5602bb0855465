//! SoC temperature from a Linux thermal zone.
//!
//! The kernel reports millidegrees Celsius as an ASCII integer, e.g.
//! `48312\n` for 48.312 °C.  Each read reopens the file so the value is
//! always fresh.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::ports::SensorPort;
use crate::error::SensorError;

const MILLIDEGREES_PER_DEGREE: f64 = 1000.0;

pub struct ThermalZoneSensor {
    path: PathBuf,
}

impl ThermalZoneSensor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SensorPort for ThermalZoneSensor {
    fn read_celsius(&mut self) -> Result<f64, SensorError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| SensorError::Unreadable(e.kind()))?;
        parse_millidegrees(&raw)
    }
}

/// Parse a thermal zone value into °C.
pub fn parse_millidegrees(raw: &str) -> Result<f64, SensorError> {
    let milli: f64 = raw.trim().parse().map_err(|_| SensorError::Malformed)?;
    if !milli.is_finite() {
        return Err(SensorError::Malformed);
    }
    Ok(milli / MILLIDEGREES_PER_DEGREE)
}
