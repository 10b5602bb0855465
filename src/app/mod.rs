//! Application core — control logic, zero direct I/O.
//!
//! The supervisor, force runner and the shared cooling run live here.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without a real board.

pub mod commands;
pub(crate) mod cooling;
pub mod events;
pub mod force;
pub mod ports;
pub mod service;
