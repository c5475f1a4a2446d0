// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod config;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod host;
pub mod line;
pub mod packet;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::BusCommand;

// From config.rs
pub use config::{UniConfig, INDICES_STORAGE_OFFSET};

// From crc.rs
pub use crc::{calculate_crc8, verify_packet_crc8};

// From error.rs
pub use error::UniError;

// From hal_traits.rs
pub use hal_traits::{BusInstant, BusTimer, NonVolatileStorage, OneWireBus};

// From host.rs
pub use host::{ControllerSettings, HostFramework};

// From line.rs
pub use line::LineId;

// From packet.rs
pub use packet::{Packet, PacketHeader, Slot, MAX_SLOTS, PACKET_SIZE};

// From timing.rs (constants - users can access via common::timing::*)

// From types.rs
pub use types::{
    Humidity, Reading, SensorCategory, StateKind, Temperature, NO_LUMINOSITY_DATA,
    NO_TEMPERATURE_DATA, UNASSIGNED,
};
