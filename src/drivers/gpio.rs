//! Linux sysfs GPIO output pin.
//!
//! Claims a line through `/sys/class/gpio/export`, configures it as an
//! output driven low, and exposes it as an `embedded-hal` [`OutputPin`].
//! Dropping the pin drives it low and unexports the line, so the next
//! process invocation can claim it again.
//!
//! The root directory is injectable; tests point it at a temp dir laid
//! out like sysfs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::{self, ErrorType, OutputPin};
use log::{debug, warn};

use crate::error::ActuatorError;
use crate::pins;

/// udev may take a moment to hand the new `gpioN/` files to our group.
const DIRECTION_RETRIES: u32 = 10;
const DIRECTION_RETRY_DELAY: Duration = Duration::from_millis(50);

// ── Error type ────────────────────────────────────────────────

/// A sysfs write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError(pub io::ErrorKind);

impl digital::Error for GpioError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl From<GpioError> for ActuatorError {
    fn from(e: GpioError) -> Self {
        Self::Write(e.0)
    }
}

// ── SysfsPin ──────────────────────────────────────────────────

pub struct SysfsPin {
    number: u32,
    root: PathBuf,
    line: PathBuf,
}

impl SysfsPin {
    /// Claim `number` under the system sysfs GPIO root.
    pub fn claim(number: u32) -> Result<Self, ActuatorError> {
        Self::claim_at(Path::new(pins::SYSFS_GPIO_ROOT), number)
    }

    /// Claim `number` under an arbitrary sysfs-shaped root.
    ///
    /// A line left exported by an earlier run is reused.
    pub fn claim_at(root: &Path, number: u32) -> Result<Self, ActuatorError> {
        let line = root.join(format!("gpio{number}"));
        if line.exists() {
            debug!("gpio{number}: already exported, reusing");
        } else {
            fs::write(root.join("export"), number.to_string())
                .map_err(|e| ActuatorError::Claim(e.kind()))?;
        }

        // "low" sets output direction and level in one write.
        let direction = line.join("direction");
        let mut attempt = 0;
        loop {
            match fs::write(&direction, "low") {
                Ok(()) => break,
                Err(e) if attempt + 1 < DIRECTION_RETRIES => {
                    debug!("gpio{number}: direction not writable yet ({e})");
                    attempt += 1;
                    thread::sleep(DIRECTION_RETRY_DELAY);
                }
                Err(e) => return Err(ActuatorError::Claim(e.kind())),
            }
        }

        Ok(Self {
            number,
            root: root.to_path_buf(),
            line,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    fn write_value(&self, high: bool) -> Result<(), GpioError> {
        fs::write(self.line.join("value"), if high { "1" } else { "0" })
            .map_err(|e| GpioError(e.kind()))
    }
}

impl ErrorType for SysfsPin {
    type Error = GpioError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_value(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_value(true)
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        if let Err(e) = self.write_value(false) {
            warn!("gpio{}: final low write failed: {:?}", self.number, e);
        }
        if let Err(e) = fs::write(self.root.join("unexport"), self.number.to_string()) {
            warn!("gpio{}: unexport failed: {e}", self.number);
        }
    }
}
