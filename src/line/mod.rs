// src/line/mod.rs

//! Bus lines the controller drives.
//!
//! A [`PeriodicLine`] polls a permanently wired module on a fixed interval.
//! A [`RegistrationLine`] is the line a configurator plugs new modules into.

pub mod periodic;
pub mod registration;

pub use periodic::{PeriodicLine, PollOutcome};
pub use registration::RegistrationLine;
