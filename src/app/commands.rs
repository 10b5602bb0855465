//! Run modes the supervisor dispatches on.

use serde::{Deserialize, Serialize};

/// What a single process invocation does.  Exactly one per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Periodic sampling until interrupted.
    #[default]
    Scheduled,
    /// Run the fan for `secs` regardless of temperature, then exit.
    Force { secs: u64 },
    /// Evaluate one tick immediately, then exit.
    Once,
}
