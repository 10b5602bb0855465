//! Actuator drivers.

pub mod fan;
pub mod gpio;
