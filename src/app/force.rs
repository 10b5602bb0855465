//! Force mode: run the fan once, unconditionally.

use log::warn;

use crate::app::cooling::cool;
use crate::app::events::CoolingAction;
use crate::app::ports::{ClockPort, CoolingLog, FanPort, SensorPort};
use crate::error::Result;
use crate::shutdown::Shutdown;

/// One-shot alternative to the scheduler.  Never looks at the threshold.
pub struct ForceRunner {
    secs: u64,
}

impl ForceRunner {
    pub fn new(secs: u64) -> Self {
        Self { secs }
    }

    /// Run the fan for exactly `secs`, then return.
    ///
    /// The current temperature is read only to label the record line.
    /// A sensor failure, before or after the run, is returned as
    /// [`Error::Sensor`](crate::error::Error::Sensor).
    pub fn run<F, S, L, C>(
        &self,
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
        shutdown.check()?;
        let label = sensor.read_celsius().inspect_err(|e| {
            warn!("force: cannot label run ({e})");
        })?;
        cool(label, self.secs, fan, sensor, log, clock, shutdown)
    }

    pub fn duration_secs(&self) -> u64 {
        self.secs
    }
}
