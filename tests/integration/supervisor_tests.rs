//! Supervisor lifecycle: force mode, interruption, and the release
//! guarantee on every exit path.

use std::fs;
use std::io::ErrorKind;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use fanctl::adapters::log_sink::FileLog;
use fanctl::adapters::time::SystemClock;
use fanctl::app::commands::RunMode;
use fanctl::app::ports::SensorPort;
use fanctl::app::service::{Outcome, Supervisor};
use fanctl::config::FanConfig;
use fanctl::drivers::fan::FanDriver;
use fanctl::drivers::gpio::SysfsPin;
use fanctl::error::{ActuatorError, Error, SensorError};
use fanctl::sensors::temperature::ThermalZoneSensor;
use fanctl::shutdown::Shutdown;
use tempfile::TempDir;

use crate::mock_hw::{FanCall, ManualClock, MemoryLog, MockFan, ScriptedSensor};

fn force(secs: u64) -> FanConfig {
    FanConfig {
        mode: RunMode::Force { secs },
        ..FanConfig::default()
    }
}

/// sysfs GPIO tree with `gpio<n>/` already exported.
fn fake_sysfs(number: u32) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("export"), "").unwrap();
    fs::write(dir.path().join("unexport"), "").unwrap();
    let line = dir.path().join(format!("gpio{number}"));
    fs::create_dir(&line).unwrap();
    fs::write(line.join("direction"), "in").unwrap();
    fs::write(line.join("value"), "0").unwrap();
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ── Force mode ────────────────────────────────────────────────

#[test]
fn force_ignores_threshold() {
    let cfg = FanConfig {
        threshold_c: 1000.0,
        ..force(2)
    };
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::new(&[30.0, 29.0]);
    let fan = MockFan::new();
    let handle = fan.clone();
    let mut log = MemoryLog::new();
    let mut clock = ManualClock::new();

    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(clock.sleep_lengths(), vec![2]);
    assert_eq!(log.lines, vec!["2024-01-01 00:00:00 + 2s: 30.0°C -> 29.0°C\n"]);
    assert_eq!(
        handle.calls(),
        vec![
            FanCall::Set(false),
            FanCall::Set(true),
            FanCall::Set(false),
            FanCall::Release,
        ]
    );
}

#[test]
fn force_holds_for_real_duration() {
    let cfg = force(2);
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::new(&[50.0, 49.0]);
    let fan = MockFan::new();
    let mut log = MemoryLog::new();
    let mut clock = SystemClock::new();

    let start = Instant::now();
    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);
    let elapsed = start.elapsed();

    assert_eq!(outcome, Outcome::Completed);
    assert!(elapsed >= Duration::from_secs(2), "returned after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "returned after {elapsed:?}");
    assert_eq!(log.lines.len(), 1);
}

#[test]
fn force_unreadable_sensor_fails_before_actuation() {
    let cfg = force(5);
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::with_results(vec![
        Err(SensorError::Unreadable(ErrorKind::NotFound)),
        Err(SensorError::Unreadable(ErrorKind::NotFound)),
    ]);
    let fan = MockFan::new();
    let handle = fan.clone();
    let mut log = MemoryLog::new();
    let mut clock = ManualClock::new();

    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);

    assert_eq!(
        outcome,
        Outcome::Failed(Error::Sensor(SensorError::Unreadable(ErrorKind::NotFound)))
    );
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(handle.on_count(), 0);
    assert_eq!(handle.calls(), vec![FanCall::Set(false), FanCall::Release]);
    assert!(clock.sleeps.is_empty());
    assert!(log.lines.is_empty());
}

#[test]
fn force_failed_resample_exits_nonzero() {
    let cfg = force(15);
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::new(&[50.0]);
    let fan = MockFan::new();
    let handle = fan.clone();
    let mut log = MemoryLog::new();
    let mut clock = ManualClock::new();

    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);

    assert_eq!(outcome, Outcome::Failed(Error::Sensor(SensorError::Malformed)));
    assert_eq!(clock.sleep_lengths(), vec![15]);
    assert_eq!(log.lines, vec!["2024-01-01 00:00:00 + 15s: 50.0°C\n"]);
    assert!(handle.released());
    assert!(!handle.output_high());
}

// ── Interruption ──────────────────────────────────────────────

#[test]
fn interrupt_during_hold_turns_fan_off() {
    let cfg = force(10);
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::new(&[50.0]);
    let fan = MockFan::new();
    let handle = fan.clone();
    let mut log = MemoryLog::new();
    let mut clock = SystemClock::new();

    let trigger = shutdown.clone();
    let signaller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        trigger.request();
    });

    let start = Instant::now();
    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);
    signaller.join().unwrap();

    assert_eq!(outcome, Outcome::Interrupted);
    assert_eq!(outcome.exit_code(), 1);
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(
        handle.calls(),
        vec![
            FanCall::Set(false),
            FanCall::Set(true),
            FanCall::Set(false),
            FanCall::Release,
        ]
    );
    // the start of the record was written before the fan came on
    assert_eq!(log.lines.len(), 1);
    assert!(log.lines[0].ends_with(" + 10s: 50.0°C\n"), "{:?}", log.lines);
    assert_eq!(sensor.reads, 1);
}

#[test]
fn interrupted_once_run_leaves_start_line_on_disk() {
    let work = tempfile::tempdir().unwrap();
    let log_path = work.path().join("fan.log");
    let cfg = FanConfig {
        mode: RunMode::Once,
        ..FanConfig::default()
    };
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::new(&[60.0]);
    let fan = MockFan::new();
    let handle = fan.clone();
    let mut log = FileLog::new(&log_path);
    let mut clock = SystemClock::new();

    let trigger = shutdown.clone();
    let signaller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        trigger.request();
    });

    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);
    signaller.join().unwrap();

    assert_eq!(outcome, Outcome::Interrupted);
    let text = read(&log_path);
    assert_eq!(text.lines().count(), 1, "{text:?}");
    assert!(text.ends_with(" + 28s: 60.0°C\n"), "{text:?}");
    assert!(handle.released());
    assert!(!handle.output_high());
}

#[test]
fn interrupt_while_idle_never_samples() {
    let cfg = FanConfig {
        interval_secs: 10,
        ..FanConfig::default()
    };
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::new(&[60.0]);
    let fan = MockFan::new();
    let handle = fan.clone();
    let mut log = MemoryLog::new();
    let mut clock = SystemClock::new();

    let trigger = shutdown.clone();
    let signaller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        trigger.request();
    });

    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);
    signaller.join().unwrap();

    assert_eq!(outcome, Outcome::Interrupted);
    assert_eq!(sensor.reads, 0);
    assert_eq!(handle.calls(), vec![FanCall::Set(false), FanCall::Release]);
}

#[test]
fn shutdown_before_start_still_releases() {
    let cfg = force(15);
    let shutdown = Shutdown::new();
    shutdown.request();
    let mut sensor = ScriptedSensor::new(&[50.0]);
    let fan = MockFan::new();
    let handle = fan.clone();
    let mut log = MemoryLog::new();
    let mut clock = ManualClock::new();

    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);

    assert_eq!(outcome, Outcome::Interrupted);
    assert_eq!(handle.calls(), vec![FanCall::Set(false), FanCall::Release]);
    assert_eq!(sensor.reads, 0);
}

// ── Actuator faults ───────────────────────────────────────────

#[test]
fn claim_failure_touches_nothing() {
    let cfg = FanConfig::default();
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::new(&[60.0]);
    let mut log = MemoryLog::new();
    let mut clock = ManualClock::new();

    let outcome = Supervisor::new(&cfg).run(
        |_| Err::<MockFan, _>(ActuatorError::Claim(ErrorKind::PermissionDenied)),
        &mut sensor,
        &mut log,
        &mut clock,
        &shutdown,
    );

    assert_eq!(
        outcome,
        Outcome::Failed(Error::Actuator(ActuatorError::Claim(
            ErrorKind::PermissionDenied
        )))
    );
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(sensor.reads, 0);
}

#[test]
fn force_actuation_failure_releases() {
    let cfg = force(15);
    let shutdown = Shutdown::new();
    let mut sensor = ScriptedSensor::new(&[50.0]);
    let fan = MockFan::failing_on_nth_on(1);
    let handle = fan.clone();
    let mut log = MemoryLog::new();
    let mut clock = ManualClock::new();

    let outcome =
        Supervisor::new(&cfg).run(|_| Ok(fan), &mut sensor, &mut log, &mut clock, &shutdown);

    assert!(matches!(
        outcome,
        Outcome::Failed(Error::Actuator(ActuatorError::Write(_)))
    ));
    assert_eq!(handle.calls(), vec![FanCall::Set(false), FanCall::Release]);
    assert_eq!(log.lines, vec!["2024-01-01 00:00:00 + 15s: 50.0°C\n"]);
}

// ── Real adapters on a fake sysfs ─────────────────────────────

#[test]
fn full_stack_force_run() {
    let sysfs = fake_sysfs(17);
    let work = tempfile::tempdir().unwrap();
    let zone = work.path().join("temp");
    fs::write(&zone, "48312\n").unwrap();
    let log_path = work.path().join("fan.log");

    let cfg = force(0);
    let shutdown = Shutdown::new();
    let mut sensor = ThermalZoneSensor::new(&zone);
    let mut log = FileLog::new(&log_path);
    let mut clock = SystemClock::new();

    let outcome = Supervisor::new(&cfg).run(
        |cfg| SysfsPin::claim_at(sysfs.path(), cfg.pin).map(|pin| FanDriver::new(pin, cfg.pin)),
        &mut sensor,
        &mut log,
        &mut clock,
        &shutdown,
    );

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(read(&sysfs.path().join("gpio17/value")), "0");
    assert_eq!(read(&sysfs.path().join("unexport")), "17");
    let line = read(&log_path);
    assert!(line.ends_with(" + 0s: 48.312°C -> 48.312°C\n"), "{line:?}");
}

struct PanickingSensor;

impl SensorPort for PanickingSensor {
    fn read_celsius(&mut self) -> Result<f64, SensorError> {
        panic!("sensor exploded");
    }
}

#[test]
fn panic_unwinds_through_release() {
    let sysfs = fake_sysfs(17);
    let cfg = FanConfig {
        mode: RunMode::Once,
        ..FanConfig::default()
    };
    let shutdown = Shutdown::new();
    let mut sensor = PanickingSensor;
    let mut log = MemoryLog::new();
    let mut clock = ManualClock::new();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        Supervisor::new(&cfg).run(
            |cfg| {
                SysfsPin::claim_at(sysfs.path(), cfg.pin).map(|pin| FanDriver::new(pin, cfg.pin))
            },
            &mut sensor,
            &mut log,
            &mut clock,
            &shutdown,
        )
    }));

    assert!(result.is_err());
    assert_eq!(read(&sysfs.path().join("gpio17/value")), "0");
    assert_eq!(read(&sysfs.path().join("unexport")), "17");
}
