//! fanctl library.
//!
//! Threshold-triggered cooling fan control for single-board computers.
//! The control core (scheduler, policy, supervisor) is hardware-agnostic
//! and reaches sysfs only through the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod safety;
pub mod scheduler;
pub mod shutdown;

mod pins;

pub mod adapters;
pub mod drivers;
pub mod sensors;
