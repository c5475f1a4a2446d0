// src/lib.rs

#![cfg_attr(not(test), no_std)] // no_std outside of unit tests

pub mod client;
pub mod common;
pub mod line;
pub mod registry;
pub mod system;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

// Re-export key types for convenience
pub use common::{LineId, Packet, UniConfig, UniError};
pub use line::{PeriodicLine, RegistrationLine};
pub use system::UniSystem;
