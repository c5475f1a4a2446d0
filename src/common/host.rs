// src/common/host.rs

//! Interface to the controller's module framework.
//!
//! The framework owns named modules, each with an array of state objects per
//! [`StateKind`]. This crate only allocates states, looks them up and pushes
//! readings into them; it never owns or frees them.

use super::types::{Reading, StateKind};

/// The host module framework.
pub trait HostFramework {
    /// Handle to a named module.
    type Module: Copy;
    /// Handle to one state object inside a module.
    type State: Copy;

    /// Looks a module up by its symbolic name.
    fn module_by_name(&self, name: &str) -> Option<Self::Module>;

    /// Adds a state object of `kind` at `index` to `module`, with "no data" content.
    fn allocate_state(&mut self, module: Self::Module, kind: StateKind, index: u8);

    /// Returns the state object of `kind` at `index`, if one exists.
    fn get_state(&self, module: Self::Module, kind: StateKind, index: u8) -> Option<Self::State>;

    /// Number of state objects of `kind` in `module`.
    fn count_states(&self, module: Self::Module, kind: StateKind) -> u8;

    /// Stores a new reading in a state object.
    fn push_reading(&mut self, state: Self::State, reading: Reading);
}

/// Controller-wide settings.
pub trait ControllerSettings {
    /// Identifier modules are stamped with when registered to this controller.
    fn controller_id(&self) -> u8;
}
