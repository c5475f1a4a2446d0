// src/transport/sync_transport/mod.rs

mod io_helpers;

use crate::common::{
    command::BusCommand,
    config::UniConfig,
    error::UniError,
    hal_traits::{BusTimer, OneWireBus},
    line::LineId,
    packet::{Packet, PACKET_SIZE},
    timing,
};
use core::fmt::Debug;
use core::time::Duration;
use log::debug;

/// Blocking packet transactions with universal modules.
///
/// Owns the bus driver and the one transaction buffer shared by every line;
/// `&mut self` on every operation keeps transactions strictly sequential.
///
/// Every failure here means "module not currently present". Callers drop the
/// operation and retry on their next cycle.
#[derive(Debug)]
pub struct SyncTransport<IF>
where
    IF: OneWireBus + BusTimer,
{
    interface: IF,
    scratch: [u8; PACKET_SIZE],
    byte_io_timeout: Duration,
    commit_settle: Duration,
}

impl<IF> SyncTransport<IF>
where
    IF: OneWireBus + BusTimer,
    IF::Error: Debug,
{
    pub fn new(interface: IF) -> Self {
        SyncTransport {
            interface,
            scratch: [0xFF; PACKET_SIZE],
            byte_io_timeout: timing::BYTE_IO_TIMEOUT,
            commit_settle: timing::COMMIT_SETTLE,
        }
    }

    pub fn with_config(interface: IF, config: &UniConfig) -> Self {
        SyncTransport {
            interface,
            scratch: [0xFF; PACKET_SIZE],
            byte_io_timeout: config.byte_io_timeout,
            commit_settle: config.commit_settle,
        }
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    pub fn release(self) -> IF {
        self.interface
    }

    /// Current time on the bus timer.
    pub fn now(&self) -> IF::Instant {
        self.interface.now()
    }

    // --- Public Blocking Methods ---

    /// Reads the packet of the module on `line`.
    ///
    /// A packet with a bad checksum is reported as [`UniError::NoModule`],
    /// exactly like an empty line.
    pub fn read(&mut self, line: LineId) -> Result<Packet, UniError<IF::Error>> {
        self.begin(line, BusCommand::ReadScratchpad)?;

        for i in 0..PACKET_SIZE {
            self.scratch[i] = self.receive_byte(line)?;
        }

        Packet::from_bytes(&self.scratch).map_err(|e| {
            debug!("{}: discarding packet: {}", line, e);
            UniError::NoModule
        })
    }

    /// Stamps `controller_id` into `packet`, seals it and writes it to the module's scratchpad.
    ///
    /// Succeeds if the closing reset still sees the module. Nothing is read back.
    pub fn write(
        &mut self,
        line: LineId,
        packet: &mut Packet,
        controller_id: u8,
    ) -> Result<(), UniError<IF::Error>> {
        packet.header.controller_id = controller_id;
        self.scratch = packet.to_bytes();

        self.begin(line, BusCommand::WriteScratchpad)?;
        for i in 0..PACKET_SIZE {
            let byte = self.scratch[i];
            self.send_byte(line, byte)?;
        }

        self.finish(line)
    }

    /// Asks the module to start a conversion. Does not wait for it to finish;
    /// the caller must leave the module enough time before the next [`read`](Self::read).
    pub fn trigger_measurement(&mut self, line: LineId) -> Result<(), UniError<IF::Error>> {
        self.begin(line, BusCommand::StartMeasurement)?;
        self.finish(line)
    }

    /// Asks the module to save its scratchpad into its own EEPROM and waits for it.
    pub fn commit(&mut self, line: LineId) -> Result<(), UniError<IF::Error>> {
        self.begin(line, BusCommand::SaveToEeprom)?;
        let settle_ms = self.commit_settle.as_millis() as u32;
        self.interface.delay_ms(settle_ms);
        self.finish(line)
    }

    // --- Transaction framing (Private) ---

    /// Reset, broadcast addressing, function command.
    fn begin(&mut self, line: LineId, command: BusCommand) -> Result<(), UniError<IF::Error>> {
        if !self.reset(line)? {
            return Err(UniError::NoModule);
        }
        self.send_byte(line, BusCommand::SkipRom.code())?;
        self.send_byte(line, command.code())
    }

    /// Closing reset; the module must still answer.
    fn finish(&mut self, line: LineId) -> Result<(), UniError<IF::Error>> {
        if self.reset(line)? {
            Ok(())
        } else {
            Err(UniError::NoModule)
        }
    }
}
