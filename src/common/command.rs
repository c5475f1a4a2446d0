//! Bus command codes.
//!
//! Every transaction is `reset`, [`BusCommand::SkipRom`], then one function
//! command. The codes follow the 1-Wire scratchpad convention the universal
//! modules implement.

/// Single-byte function commands understood by a universal module.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum BusCommand {
    /// Broadcast addressing: the next command goes to whatever module is on the line.
    SkipRom = 0xCC,
    /// Module sends its whole packet, checksum last.
    ReadScratchpad = 0xBE,
    /// Module receives a whole packet, checksum last.
    WriteScratchpad = 0x4E,
    /// Module starts a conversion of all its sensors.
    StartMeasurement = 0x44,
    /// Module copies its scratchpad into its own non-volatile memory.
    SaveToEeprom = 0x25,
}

impl BusCommand {
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Tries to convert a raw byte into a command.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0xCC => Some(BusCommand::SkipRom),
            0xBE => Some(BusCommand::ReadScratchpad),
            0x4E => Some(BusCommand::WriteScratchpad),
            0x44 => Some(BusCommand::StartMeasurement),
            0x25 => Some(BusCommand::SaveToEeprom),
            _ => None,
        }
    }
}
