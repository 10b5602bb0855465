//! Cooling duration policy.
//!
//! Maps a triggering temperature and the scheduler interval to the number
//! of seconds the fan is held on.  Pure; exhaustively unit tested.
//!
//! ## Known quirk
//!
//! Both variants compute a first-stage duration (`max(MIN_TIMER, ⌊t/2⌋)`
//! or `max(MIN_TIMER, ⌊t⌋)`) and then overwrite it with
//! `min(t, interval - 2)`.  The first stage never reaches the result.
//! This matches the deployed controller and is kept for log
//! compatibility; it is a candidate defect, not a design.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::INTERVAL_MIN_SECS;

/// Shortest cooling run (seconds).
pub const MIN_TIMER_SECS: u64 = 5;

/// Headroom left between the end of a cooling run and the next tick.
const TICK_HEADROOM_SECS: u64 = 2;

const _: () = assert!(INTERVAL_MIN_SECS >= MIN_TIMER_SECS + TICK_HEADROOM_SECS);

/// Which first-stage formula runs before the overwrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyVariant {
    /// `max(MIN_TIMER, ⌊t / 2⌋)`.
    #[default]
    Halved,
    /// `max(MIN_TIMER, ⌊t⌋)`.
    Whole,
}

/// Compute the cooling duration in whole seconds.
///
/// `temperature` is expected above the trigger threshold; the caller
/// filters.  The result is `min(t, interval - 2)` truncated and clamped
/// at zero.
pub fn compute_duration(variant: PolicyVariant, temperature: f64, interval_secs: u64) -> u64 {
    let first_stage = match variant {
        PolicyVariant::Halved => to_secs(temperature / 2.0).max(MIN_TIMER_SECS),
        PolicyVariant::Whole => to_secs(temperature).max(MIN_TIMER_SECS),
    };

    // Overwrites the first stage.
    let ceiling = interval_secs.saturating_sub(TICK_HEADROOM_SECS);
    let duration = to_secs(temperature).min(ceiling);

    trace!(
        "policy {:?}: t={} interval={}s first_stage={}s (discarded) -> {}s",
        variant, temperature, interval_secs, first_stage, duration
    );
    duration
}

/// Floor to whole seconds, clamping negatives and NaN to zero.
fn to_secs(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.floor() as u64
    }
}
