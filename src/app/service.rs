//! Supervisor — the lifecycle owner.
//!
//! [`Supervisor`] claims the fan, forces it off, dispatches to the
//! scheduler or the force runner, and releases the fan on every way out.
//!
//! ```text
//!   claim ─▶ fan OFF ─▶ ┌ Force ─────▶ ForceRunner ─────┐
//!                       ├ Once ──────▶ Scheduler::tick ─┼─▶ release ─▶ Outcome
//!                       └ Scheduled ─▶ Scheduler::run ──┘
//! ```
//!
//! Release happens here for normal returns, interruption, sensor
//! failures outside the periodic loop, and actuator faults.  A panic unwinding through [`Supervisor::run`] drops the fan,
//! and [`FanDriver`](crate::drivers::fan::FanDriver) releases on drop.

use log::{error, info, warn};

use crate::app::commands::RunMode;
use crate::app::force::ForceRunner;
use crate::app::ports::{ClockPort, CoolingLog, FanPort, SensorPort};
use crate::config::FanConfig;
use crate::error::{ActuatorError, Error, Result};
use crate::scheduler::Scheduler;
use crate::shutdown::Shutdown;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Force or single-shot mode finished.
    Completed,
    /// Shutdown was requested.  Cleanup ran; not a crash.
    Interrupted,
    /// An unrecoverable fault stopped the run.
    Failed(Error),
}

impl Outcome {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Completed => 0,
            Self::Interrupted => 1,
            Self::Failed(e) => e.exit_code(),
        }
    }
}

pub struct Supervisor<'a> {
    config: &'a FanConfig,
}

impl<'a> Supervisor<'a> {
    pub fn new(config: &'a FanConfig) -> Self {
        Self { config }
    }

    /// Claim the fan via `claim`, run the configured mode, release.
    pub fn run<F, S, L, C>(
        &self,
        claim: impl FnOnce(&FanConfig) -> core::result::Result<F, ActuatorError>,
        sensor: &mut S,
        log: &mut L,
        clock: &mut C,
        shutdown: &Shutdown,
    ) -> Outcome
    where
        F: FanPort,
        S: SensorPort + ?Sized,
        L: CoolingLog + ?Sized,
        C: ClockPort + ?Sized,
    {
        let mut fan = match claim(self.config) {
            Ok(fan) => fan,
            Err(e) => {
                error!("cannot claim fan on GPIO{}: {e}", self.config.pin);
                return Outcome::Failed(e.into());
            }
        };
        info!("fan claimed on GPIO{}", self.config.pin);

        let result = self.dispatch(&mut fan, sensor, log, clock, shutdown);
        fan.release();

        match result {
            Ok(()) => {
                info!("done");
                Outcome::Completed
            }
            Err(Error::Interrupted) => {
                warn!("interrupted, fan released");
                Outcome::Interrupted
            }
            Err(e) => {
                error!("stopped: {e}; fan released");
                Outcome::Failed(e)
            }
        }
    }

    fn dispatch<F, S, L, C>(
        &self,
        fan: &mut F,
        sensor: &mut S,
        log: &mut L,
        clock: &mut C,
        shutdown: &Shutdown,
    ) -> Result<()>
    where
        F: FanPort,
        S: SensorPort + ?Sized,
        L: CoolingLog + ?Sized,
        C: ClockPort + ?Sized,
    {
        // Known state before anything is sampled.
        fan.set(false)?;

        match self.config.mode {
            RunMode::Force { secs } => {
                info!("force mode: {secs}s");
                ForceRunner::new(secs).run(fan, sensor, log, clock, shutdown)?;
                Ok(())
            }
            RunMode::Once => {
                let outcome = Scheduler::new(self.config).tick(fan, sensor, log, clock, shutdown)?;
                info!("{outcome}");
                Ok(())
            }
            RunMode::Scheduled => {
                Scheduler::new(self.config).run(fan, sensor, log, clock, shutdown)
            }
        }
    }
}
