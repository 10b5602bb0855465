//! Sensor fault monitor.
//!
//! A failed reading only costs the current tick, but a sensor that stays
//! unreadable means the fan is no longer protecting anything.  The
//! monitor counts consecutive failures and latches a fault once the
//! configured limit is reached.
//!
//! ## Fault lifecycle
//!
//! 1. Each failed read increments the streak; each good read resets it.
//! 2. When the streak reaches the limit the fault latches and is logged
//!    once at `error`.
//! 3. The next good read clears the fault and logs the recovery.

use log::{error, info, warn};

use crate::error::SensorError;

pub struct SensorFaultMonitor {
    limit: u32,
    /// Consecutive failed reads.
    streak: u32,
    /// Latched once `streak >= limit`.
    faulted: bool,
}

impl SensorFaultMonitor {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            streak: 0,
            faulted: false,
        }
    }

    /// Record a good reading.
    pub fn record_ok(&mut self) {
        if self.faulted {
            info!("SENSOR FAULT CLEARED after {} failed reads", self.streak);
        }
        self.streak = 0;
        self.faulted = false;
    }

    /// Record a failed reading.  Returns `true` while the fault is latched.
    pub fn record_err(&mut self, err: SensorError) -> bool {
        self.streak = self.streak.saturating_add(1);
        if !self.faulted && self.streak >= self.limit {
            error!(
                "SENSOR FAULT SET: {} consecutive failures (last: {err})",
                self.streak
            );
            self.faulted = true;
        } else if !self.faulted {
            warn!("sensor read failed ({err}), skipping tick");
        }
        self.faulted
    }

    /// True while the fault is latched.
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Current run of consecutive failures.
    pub fn streak(&self) -> u32 {
        self.streak
    }
}
