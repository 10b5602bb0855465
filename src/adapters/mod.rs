//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter            | Implements   | Connects to                |
//! |--------------------|--------------|----------------------------|
//! | `log_sink`         | CoolingLog   | append-only file / stdout  |
//! | `time`             | ClockPort    | `Instant` + UTC wall clock |
//!
//! The sensor and fan live under [`sensors`](crate::sensors) and
//! [`drivers`](crate::drivers) and implement their ports directly.

pub mod log_sink;
pub mod time;
