//! Cooperative shutdown token.
//!
//! The signal handler is the only producer; the control loop is the only
//! consumer.  Every blocking wait in the loop goes through
//! [`Shutdown::sleep_until`], which wakes as soon as a shutdown is
//! requested instead of sleeping out the remaining time.
//!
//! ```text
//! ┌─────────────┐  request()  ┌────────────┐  sleep_until()  ┌──────────────┐
//! │ SIGINT/TERM │────────────▶│  Shutdown  │◀────────────────│ Scheduler /  │
//! │ handler     │             │ (Condvar)  │────────────────▶│ ForceRunner  │
//! └─────────────┘             └────────────┘   Interrupted   └──────────────┘
//! ```

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::error::Error;

/// Cloneable handle; all clones observe the same request.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    requested: Mutex<bool>,
    wake: Condvar,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter.  Idempotent.
    pub fn request(&self) {
        *self.lock() = true;
        self.inner.wake.notify_all();
    }

    pub fn is_requested(&self) -> bool {
        *self.lock()
    }

    /// Fail fast with [`Error::Interrupted`] if shutdown was requested.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_requested() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Block until `deadline` or until shutdown is requested.
    ///
    /// Returns `Err(Error::Interrupted)` in the latter case, including when
    /// the request was already pending on entry.
    pub fn sleep_until(&self, deadline: Instant) -> Result<(), Error> {
        let mut requested = self.lock();
        loop {
            if *requested {
                return Err(Error::Interrupted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            // Spurious wake-ups loop back round.
            requested = self
                .inner
                .wake
                .wait_timeout(requested, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner.requested.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
