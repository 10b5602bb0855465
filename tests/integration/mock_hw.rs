//! Mock adapters for integration tests.
//!
//! Records every fan call so tests can assert on the full command
//! history, scripts sensor readings, and runs a virtual clock so a
//! 30-second interval costs nothing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone, Utc};

use fanctl::app::events::{CoolingStart, line_suffix};
use fanctl::app::ports::{ClockPort, CoolingLog, FanPort, SensorPort};
use fanctl::error::{ActuatorError, Error, LogError, SensorError};
use fanctl::shutdown::Shutdown;

// ── Fan call record ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanCall {
    Set(bool),
    Release,
}

// ── MockFan ───────────────────────────────────────────────────

/// Clones share one history, so a test can keep a handle after handing
/// the fan to the supervisor.
#[derive(Clone, Default)]
pub struct MockFan {
    calls: Arc<Mutex<Vec<FanCall>>>,
    /// Fail the n-th `set(true)` (1-based).
    fail_on_nth_on: Option<usize>,
    on: bool,
}

#[allow(dead_code)]
impl MockFan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_nth_on(n: usize) -> Self {
        Self {
            fail_on_nth_on: Some(n),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<FanCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Output level implied by the history: off after release.
    pub fn output_high(&self) -> bool {
        self.calls()
            .iter()
            .rev()
            .find_map(|c| match c {
                FanCall::Set(on) => Some(*on),
                FanCall::Release => Some(false),
            })
            .unwrap_or(false)
    }

    pub fn released(&self) -> bool {
        self.calls().last() == Some(&FanCall::Release)
    }

    pub fn on_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == FanCall::Set(true))
            .count()
    }
}

impl FanPort for MockFan {
    fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        if on && self.fail_on_nth_on == Some(self.on_count() + 1) {
            return Err(ActuatorError::Write(std::io::ErrorKind::PermissionDenied));
        }
        self.calls.lock().unwrap().push(FanCall::Set(on));
        self.on = on;
        Ok(())
    }

    fn release(&mut self) {
        self.calls.lock().unwrap().push(FanCall::Release);
        self.on = false;
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

// ── ScriptedSensor ────────────────────────────────────────────

/// Returns scripted readings in order.  When the script runs out it
/// requests shutdown (if given a token) and reports a malformed value.
pub struct ScriptedSensor {
    script: VecDeque<Result<f64, SensorError>>,
    on_exhausted: Option<Shutdown>,
    pub reads: usize,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn new(readings: &[f64]) -> Self {
        Self {
            script: readings.iter().copied().map(Ok).collect(),
            on_exhausted: None,
            reads: 0,
        }
    }

    pub fn with_results(results: Vec<Result<f64, SensorError>>) -> Self {
        Self {
            script: results.into(),
            on_exhausted: None,
            reads: 0,
        }
    }

    pub fn stop_when_exhausted(mut self, shutdown: &Shutdown) -> Self {
        self.on_exhausted = Some(shutdown.clone());
        self
    }
}

impl SensorPort for ScriptedSensor {
    fn read_celsius(&mut self) -> Result<f64, SensorError> {
        self.reads += 1;
        match self.script.pop_front() {
            Some(r) => r,
            None => {
                if let Some(shutdown) = &self.on_exhausted {
                    shutdown.request();
                }
                Err(SensorError::Malformed)
            }
        }
    }
}

// ── MemoryLog ─────────────────────────────────────────────────

/// Collects record lines.  A line opened by `begin` shows up in
/// `lines` straight away, without its newline until `finish`.
#[derive(Default)]
pub struct MemoryLog {
    pub lines: Vec<String>,
    pub fail: bool,
}

#[allow(dead_code)]
impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            lines: Vec::new(),
            fail: true,
        }
    }
}

impl CoolingLog for MemoryLog {
    fn begin(&mut self, start: &CoolingStart) -> Result<(), LogError> {
        if self.fail {
            return Err(LogError::Io(std::io::ErrorKind::StorageFull));
        }
        self.lines.push(start.line_prefix());
        Ok(())
    }

    fn finish(&mut self, temp_after: Option<f64>) -> Result<(), LogError> {
        if self.fail {
            return Err(LogError::Io(std::io::ErrorKind::StorageFull));
        }
        let line = self
            .lines
            .last_mut()
            .expect("finish without a matching begin");
        line.push_str(&line_suffix(temp_after));
        Ok(())
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Virtual time: `sleep_until` jumps straight to the deadline.
pub struct ManualClock {
    base: Instant,
    offset: Duration,
    wall_base: DateTime<Utc>,
    /// Every completed sleep, as (start offset, length).
    pub sleeps: Vec<(Duration, Duration)>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Duration::ZERO,
            wall_base: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            sleeps: Vec::new(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.offset
    }

    /// Every sleep length in whole seconds, tick waits and holds alike.
    pub fn sleep_lengths(&self) -> Vec<u64> {
        self.sleeps.iter().map(|(_, d)| d.as_secs()).collect()
    }
}

impl ClockPort for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset
    }

    fn wall_now(&self) -> DateTime<Utc> {
        self.wall_base + chrono::Duration::from_std(self.offset).unwrap()
    }

    fn sleep_until(&mut self, deadline: Instant, shutdown: &Shutdown) -> Result<(), Error> {
        shutdown.check()?;
        let now = self.now();
        if deadline > now {
            let len = deadline - now;
            self.sleeps.push((self.offset, len));
            self.offset += len;
        }
        Ok(())
    }
}
