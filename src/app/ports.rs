//! Port traits — the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Scheduler / ForceRunner / Supervisor
//! ```
//!
//! Driven adapters (thermal zone, GPIO fan, cooling log, clock) implement
//! these traits.  The core consumes them via generics, so it never
//! touches sysfs directly and every path is testable with mocks.

use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::app::events::CoolingStart;
use crate::error::{ActuatorError, Error, LogError, SensorError};
use crate::shutdown::Shutdown;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → core)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the core calls this for a fresh reading.
pub trait SensorPort {
    /// Current temperature in °C.  No retry; the caller decides.
    fn read_celsius(&mut self) -> Result<f64, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Fan port (driven adapter: core → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single cooling fan.
pub trait FanPort {
    /// Switch the fan on or off.
    fn set(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Drive the output low and give the channel back.
    ///
    /// Must be idempotent and must not fail; errors are logged inside.
    fn release(&mut self);

    /// Last commanded state.
    fn is_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Cooling log port (driven adapter: core → file / stdout)
// ───────────────────────────────────────────────────────────────

/// Durable record of cooling actions: one line per action, written in
/// two halves around the actuation.
pub trait CoolingLog {
    /// Write the start of the line.  Called before the fan is switched
    /// on and must reach the sink before returning.
    fn begin(&mut self, start: &CoolingStart) -> Result<(), LogError>;

    /// Close the line opened by [`begin`](Self::begin).  `None` when the
    /// run ended without an after reading.
    fn finish(&mut self, temp_after: Option<f64>) -> Result<(), LogError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: core ↔ time)
// ───────────────────────────────────────────────────────────────

/// Monotonic time, wall time, and interruptible waiting.
pub trait ClockPort {
    /// Monotonic now, used for tick anchoring.
    fn now(&self) -> Instant;

    /// Wall-clock now, used for record timestamps.
    fn wall_now(&self) -> DateTime<Utc>;

    /// Block until `deadline` or until `shutdown` fires.
    ///
    /// Returns [`Error::Interrupted`] in the second case.
    fn sleep_until(&mut self, deadline: Instant, shutdown: &Shutdown) -> Result<(), Error>;
}
