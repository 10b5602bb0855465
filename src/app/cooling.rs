//! One cooling run, shared by the scheduler and force mode.
//!
//! ```text
//!  log begin ─▶ fan ON ─▶ hold (interruptible) ─▶ fan OFF ─▶ resample ─▶ log finish
//! ```
//!
//! The fan is switched off before the hold result is inspected, so an
//! interrupted hold still leaves the output low.  A line opened with
//! `begin` is always closed, with or without an after reading.

use std::time::Duration;

use log::{info, warn};

use crate::app::events::{Celsius, CoolingAction, CoolingStart};
use crate::app::ports::{ClockPort, CoolingLog, FanPort, SensorPort};
use crate::error::{Error, Result};
use crate::shutdown::Shutdown;

/// Hold the fan on for `duration_secs` and log the run.
///
/// Actuator faults, interruption and a failed resample are returned
/// after the fan is off.  Cooling-log failures are logged and swallowed.
pub(crate) fn cool<F, S, L, C>(
    temp_before: f64,
    duration_secs: u64,
    fan: &mut F,
    sensor: &mut S,
    log: &mut L,
    clock: &mut C,
    shutdown: &Shutdown,
) -> Result<CoolingAction>
where
    F: FanPort + ?Sized,
    S: SensorPort + ?Sized,
    L: CoolingLog + ?Sized,
    C: ClockPort + ?Sized,
{
    info!(
        "cooling: {}\u{00b0}C, fan on for {}s",
        Celsius(temp_before),
        duration_secs
    );

    let start = CoolingStart {
        started_at: clock.wall_now(),
        duration_secs,
        temp_before,
    };
    if let Err(e) = log.begin(&start) {
        warn!("{e}; continuing");
    }

    if let Err(e) = fan.set(true) {
        close_line(log, None);
        return Err(e.into());
    }
    let deadline = clock.now() + Duration::from_secs(duration_secs);
    let held = clock.sleep_until(deadline, shutdown);
    let off = fan.set(false).map_err(Error::from);
    if let Err(e) = held.and(off) {
        close_line(log, None);
        return Err(e);
    }

    let temp_after = match sensor.read_celsius() {
        Ok(t) => t,
        Err(e) => {
            warn!("post-cooling read failed ({e})");
            close_line(log, None);
            return Err(e.into());
        }
    };
    close_line(log, Some(temp_after));

    info!(
        "cooling done: {}\u{00b0}C -> {}\u{00b0}C",
        Celsius(temp_before),
        Celsius(temp_after)
    );
    Ok(start.finished(temp_after))
}

fn close_line<L: CoolingLog + ?Sized>(log: &mut L, temp_after: Option<f64>) {
    if let Err(e) = log.finish(temp_after) {
        warn!("{e}; continuing");
    }
}
