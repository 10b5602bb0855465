//! On/off cooling fan driver.
//!
//! Drives any `embedded-hal` [`OutputPin`]: HIGH = fan on.
//!
//! ## Safety contract
//!
//! Once claimed, the fan must end up OFF and the pin given back however
//! the process leaves.  [`FanPort::release`] does that explicitly and is
//! idempotent; `Drop` calls the same path as a backstop for panics.

use embedded_hal::digital::OutputPin;
use log::{debug, info, warn};

use crate::app::ports::FanPort;
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanState {
    Off,
    On,
}

pub struct FanDriver<P: OutputPin> {
    /// `None` once released.
    pin: Option<P>,
    state: FanState,
    gpio: u32,
}

impl<P: OutputPin> FanDriver<P> {
    /// Wrap a claimed pin.  The fan is assumed off until commanded.
    pub fn new(pin: P, gpio: u32) -> Self {
        Self {
            pin: Some(pin),
            state: FanState::Off,
            gpio,
        }
    }

    pub fn state(&self) -> FanState {
        self.state
    }

    pub fn is_released(&self) -> bool {
        self.pin.is_none()
    }

    fn release_pin(&mut self) {
        let Some(mut pin) = self.pin.take() else {
            return;
        };
        if let Err(e) = pin.set_low() {
            warn!("fan GPIO{}: low on release failed: {:?}", self.gpio, e);
        }
        self.state = FanState::Off;
        drop(pin);
        info!("fan GPIO{}: released", self.gpio);
    }
}

impl<P> FanPort for FanDriver<P>
where
    P: OutputPin,
    P::Error: Into<ActuatorError>,
{
    fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let pin = self.pin.as_mut().ok_or(ActuatorError::Released)?;
        let written: Result<(), ActuatorError> = if on {
            pin.set_high().map_err(Into::into)
        } else {
            pin.set_low().map_err(Into::into)
        };
        written?;
        self.state = if on { FanState::On } else { FanState::Off };
        debug!("fan GPIO{}: {:?}", self.gpio, self.state);
        Ok(())
    }

    fn release(&mut self) {
        self.release_pin();
    }

    fn is_on(&self) -> bool {
        self.state == FanState::On
    }
}

impl<P: OutputPin> Drop for FanDriver<P> {
    fn drop(&mut self) {
        self.release_pin();
    }
}
