// src/line/registration.rs

use crate::client::ClientKind;
use crate::common::{
    error::UniError,
    hal_traits::{BusTimer, NonVolatileStorage, OneWireBus},
    host::{ControllerSettings, HostFramework},
    line::LineId,
    packet::Packet,
};
use crate::system::UniSystem;
use log::{debug, info, warn};

/// The line a configurator uses to pair new modules with this controller.
///
/// The configurator reads the module's packet through
/// [`is_module_present`](Self::is_module_present) and [`copy_out`](Self::copy_out),
/// edits the slot assignments, hands the result back with
/// [`set_data`](Self::set_data) and finally calls [`register`](Self::register).
#[derive(Debug, Clone)]
pub struct RegistrationLine {
    line: LineId,
    packet: Packet,
}

impl RegistrationLine {
    /// Starts out with a blank buffer (every byte `0xFF`).
    pub fn new(line: LineId) -> Self {
        RegistrationLine {
            line,
            packet: Packet::blank(),
        }
    }

    #[inline]
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Reads the module's packet into the internal buffer.
    ///
    /// Returns false when nothing valid answered; the buffer is left as it was.
    pub fn is_module_present<IF, H, S>(&mut self, system: &mut UniSystem<IF, H, S>) -> bool
    where
        IF: OneWireBus + BusTimer,
        H: HostFramework + ControllerSettings,
        S: NonVolatileStorage,
    {
        match system.read_packet(self.line) {
            Ok(packet) => {
                self.packet = packet;
                true
            }
            Err(e) if e.is_transient() => {
                debug!("{}: no module to register: {:?}", self.line, e);
                false
            }
            Err(e) => {
                warn!("{}: read failed: {:?}", self.line, e);
                false
            }
        }
    }

    /// The buffered packet.
    #[inline]
    pub fn copy_out(&self) -> Packet {
        self.packet
    }

    /// True if `packet` has the same type as the buffered one.
    #[inline]
    pub fn is_same_packet_type(&self, packet: &Packet) -> bool {
        self.packet.packet_type() == packet.packet_type()
    }

    /// Replaces the buffer with `packet`. A packet of another type is refused
    /// and the buffer kept.
    pub fn set_data(&mut self, packet: &Packet) -> Result<(), UniError> {
        if !self.is_same_packet_type(packet) {
            return Err(UniError::PacketTypeMismatch {
                loaded: self.packet.packet_type(),
                candidate: packet.packet_type(),
            });
        }
        self.packet = *packet;
        Ok(())
    }

    /// Pairs the buffered module with this controller.
    ///
    /// The client's registration hook runs first (so its sensors exist even if
    /// the bus write fails), then the buffer is written back stamped with the
    /// controller id and committed to the module's EEPROM.
    pub fn register<IF, H, S>(
        &mut self,
        system: &mut UniSystem<IF, H, S>,
    ) -> Result<(), UniError<IF::Error>>
    where
        IF: OneWireBus + BusTimer,
        H: HostFramework + ControllerSettings,
        S: NonVolatileStorage,
    {
        let kind = ClientKind::for_packet(&self.packet);
        system.register_client(kind, &self.packet);

        system.write_packet(self.line, &mut self.packet)?;
        system.commit(self.line)?;

        info!(
            "{}: module registered to controller {}",
            self.line, self.packet.header.controller_id
        );
        Ok(())
    }
}
