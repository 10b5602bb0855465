//! System clock adapter.
//!
//! Monotonic ticks from `std::time::Instant`, UTC wall time from
//! `chrono`, and waits that wake early on shutdown.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::app::ports::ClockPort;
use crate::error::Error;
use crate::shutdown::Shutdown;

pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the clock was created (monotonic).
    pub fn uptime(&self) -> Duration {
        self.start.elapsed()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep_until(&mut self, deadline: Instant, shutdown: &Shutdown) -> Result<(), Error> {
        shutdown.sleep_until(deadline)
    }
}
