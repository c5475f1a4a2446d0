// src/transport/sync_transport/io_helpers.rs

use super::SyncTransport;
use crate::common::{
    error::UniError,
    hal_traits::{BusTimer, OneWireBus},
    line::LineId,
    timing,
};
use core::fmt::Debug;
use core::time::Duration;
use nb::Result as NbResult;

// Implementation block for I/O related helpers
impl<IF> SyncTransport<IF>
where
    IF: OneWireBus + BusTimer,
    IF::Error: Debug,
{
    /// Executes a non-blocking bus operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout error.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, UniError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;

        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(UniError::Timeout);
                    }
                    self.interface.delay_us(timing::WOULD_BLOCK_BACKOFF_US);
                }
                Err(nb::Error::Other(e)) => return Err(UniError::Io(e)),
            }
        }
    }

    /// Bus reset; `Ok(true)` when a presence pulse was seen.
    pub(super) fn reset(&mut self, line: LineId) -> Result<bool, UniError<IF::Error>> {
        let timeout = self.byte_io_timeout;
        self.execute_blocking_io_with_timeout(timeout, |iface| iface.reset(line))
    }

    pub(super) fn send_byte(&mut self, line: LineId, byte: u8) -> Result<(), UniError<IF::Error>> {
        let timeout = self.byte_io_timeout;
        self.execute_blocking_io_with_timeout(timeout, |iface| iface.write_byte(line, byte))
    }

    pub(super) fn receive_byte(&mut self, line: LineId) -> Result<u8, UniError<IF::Error>> {
        let timeout = self.byte_io_timeout;
        self.execute_blocking_io_with_timeout(timeout, |iface| iface.read_byte(line))
    }
}
