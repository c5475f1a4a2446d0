// src/common/error.rs

/// Errors raised by packet decoding and bus transactions.
///
/// Generic over the HAL error `E` so that validation-only paths (packet
/// decoding, line construction) can use `UniError<()>` while bus paths carry
/// the driver's own error type.
#[derive(Debug, thiserror::Error)]
pub enum UniError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the bus driver or storage medium.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A byte-level bus operation kept returning `WouldBlock` past its deadline.
    #[error("Operation timed out")]
    Timeout,

    /// No presence pulse after a bus reset. Checksum failures on read are
    /// reported the same way.
    #[error("No module present on the line")]
    NoModule,

    /// Received CRC does not match calculated CRC.
    #[error("CRC mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    CrcMismatch { expected: u8, calculated: u8 },

    /// Buffer provided had the wrong size for a packet.
    #[error("Buffer size mismatch: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// A candidate packet tried to change the type of an already detected module.
    #[error(
        "Packet type mismatch: loaded {loaded:#04x}, candidate {candidate:#04x}"
    )]
    PacketTypeMismatch { loaded: u8, candidate: u8 },

    /// Line number 0 does not address any bus.
    #[error("Invalid bus line: {0}")]
    InvalidLine(u8),
}

impl<E: core::fmt::Debug> From<E> for UniError<E> {
    fn from(e: E) -> Self {
        UniError::Io(e)
    }
}

impl<E: core::fmt::Debug> UniError<E> {
    /// True for every condition the line pollers log as "module currently
    /// absent" rather than as a fault.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UniError::Io(_)
                | UniError::Timeout
                | UniError::NoModule
                | UniError::CrcMismatch { .. }
        )
    }
}
