//! Control policy.

pub mod policy;
