//! Periodic cooling scheduler.
//!
//! Samples the temperature once per interval and, when it is above the
//! trigger threshold, runs the fan for the duration the policy computes.
//!
//! ```text
//!            tick                    t > threshold
//!   ┌──────┐ ───▶ ┌──────────┐ ─────────────────▶ ┌─────────┐
//!   │ Idle │      │ Sampling │                    │ Cooling │
//!   └──────┘ ◀─── └──────────┘ ◀───────────────── └─────────┘
//!      ▲    t ≤ threshold / sensor error   fan off, record   │
//!      └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timing
//!
//! Ticks are fixed-rate, anchored at `origin + n * interval`.  Cooling
//! blocks the worker, so a tick can never overlap a running fan; ticks
//! missed while busy are skipped, not queued.  With the policy capping
//! the run at `interval - 2` this only happens on a slow sensor.

use core::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::app::cooling::cool;
use crate::app::events::{Celsius, CoolingAction};
use crate::app::ports::{ClockPort, CoolingLog, FanPort, SensorPort};
use crate::config::FanConfig;
use crate::control::policy::{PolicyVariant, compute_duration};
use crate::error::{Error, Result};
use crate::safety::SensorFaultMonitor;
use crate::shutdown::Shutdown;

// ═══════════════════════════════════════════════════════════════
//  Types
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next tick.
    Idle,
    /// Reading the sensor and deciding.
    Sampling,
    /// Fan on for a computed duration.
    Cooling,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// At or below threshold; nothing happened.
    BelowThreshold(f64),
    /// The fan ran.
    Cooled(CoolingAction),
}

/// Console echo of a tick: the reading, or `before -> after`.
impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowThreshold(t) => write!(f, "{}", Celsius(*t)),
            Self::Cooled(action) => write!(
                f,
                "{} -> {}",
                Celsius(action.temp_before),
                Celsius(action.temp_after)
            ),
        }
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

/// Owned by the supervisor; there is no process-wide instance.
pub struct Scheduler {
    interval_secs: u64,
    threshold_c: f64,
    policy: PolicyVariant,
    monitor: SensorFaultMonitor,
    state: SchedulerState,
    ticks: u64,
}

impl Scheduler {
    pub fn new(config: &FanConfig) -> Self {
        Self {
            interval_secs: config.interval_secs,
            threshold_c: config.threshold_c,
            policy: config.policy,
            monitor: SensorFaultMonitor::new(config.sensor_fault_limit),
            state: SchedulerState::Idle,
            ticks: 0,
        }
    }

    /// Tick every interval until shutdown or an actuator fault.
    ///
    /// Sensor errors cost only the tick they happen in.  Never returns
    /// `Ok`: the loop ends with [`Error::Interrupted`] (controlled
    /// shutdown) or the fault that stopped it.
    pub fn run<F, S, L, C>(
        &mut self,
        fan: &mut F,
        sensor: &mut S,
        log: &mut L,
        clock: &mut C,
        shutdown: &Shutdown,
    ) -> Result<()>
    where
        F: FanPort + ?Sized,
        S: SensorPort + ?Sized,
        L: CoolingLog + ?Sized,
        C: ClockPort + ?Sized,
    {
        let interval = Duration::from_secs(self.interval_secs);
        let origin = clock.now();
        info!(
            "scheduler: every {}s, threshold {}\u{00b0}C, policy {:?}",
            self.interval_secs,
            Celsius(self.threshold_c),
            self.policy
        );

        loop {
            let deadline = next_deadline(origin, interval, clock.now());
            clock.sleep_until(deadline, shutdown)?;
            match self.tick(fan, sensor, log, clock, shutdown) {
                Ok(_) | Err(Error::Sensor(_)) => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// Run one SAMPLING step and, if triggered, one COOLING step.
    ///
    /// Sensor errors are counted by the fault monitor and returned; the
    /// fan is already off when a post-cooling read fails.
    pub fn tick<F, S, L, C>(
        &mut self,
        fan: &mut F,
        sensor: &mut S,
        log: &mut L,
        clock: &mut C,
        shutdown: &Shutdown,
    ) -> Result<TickOutcome>
    where
        F: FanPort + ?Sized,
        S: SensorPort + ?Sized,
        L: CoolingLog + ?Sized,
        C: ClockPort + ?Sized,
    {
        shutdown.check()?;
        self.ticks += 1;
        self.state = SchedulerState::Sampling;

        let temperature = match sensor.read_celsius() {
            Ok(t) => {
                self.monitor.record_ok();
                t
            }
            Err(e) => {
                self.monitor.record_err(e);
                self.state = SchedulerState::Idle;
                return Err(e.into());
            }
        };

        if temperature <= self.threshold_c {
            debug!("tick {}: {}\u{00b0}C", self.ticks, Celsius(temperature));
            self.state = SchedulerState::Idle;
            return Ok(TickOutcome::BelowThreshold(temperature));
        }

        let duration_secs = compute_duration(self.policy, temperature, self.interval_secs);
        self.state = SchedulerState::Cooling;
        let result = cool(temperature, duration_secs, fan, sensor, log, clock, shutdown);
        self.state = SchedulerState::Idle;

        match result {
            Ok(action) => Ok(TickOutcome::Cooled(action)),
            Err(Error::Sensor(e)) => {
                self.monitor.record_err(e);
                Err(Error::Sensor(e))
            }
            Err(e) => Err(e),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Ticks evaluated so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// True while the sensor fault is latched.
    pub fn sensor_faulted(&self) -> bool {
        self.monitor.is_faulted()
    }
}

/// First tick boundary strictly after `now`.
///
/// Boundaries sit at `origin + n * interval` for `n >= 1`; any that
/// already passed are skipped.  Arithmetic is done in `u128`
/// nanoseconds; an unrepresentable boundary falls back to
/// `now + interval`.
pub fn next_deadline(origin: Instant, interval: Duration, now: Instant) -> Instant {
    let elapsed_ns = now.saturating_duration_since(origin).as_nanos();
    let interval_ns = interval.as_nanos().max(1);
    let offset_ns = (elapsed_ns / interval_ns + 1) * interval_ns;
    u64::try_from(offset_ns / NANOS_PER_SEC)
        .ok()
        .map(|secs| Duration::new(secs, (offset_ns % NANOS_PER_SEC) as u32))
        .and_then(|offset| origin.checked_add(offset))
        .unwrap_or(now + interval)
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
