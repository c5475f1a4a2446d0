// src/common/hal_traits.rs

use super::line::LineId;
use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point in time as reported by a [`BusTimer`].
///
/// Anything ordered that can be offset by a `Duration` and subtracted into a
/// `Duration` qualifies.
pub trait BusInstant: Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration> {}

impl<T> BusInstant for T where
    T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for timer/delay operations needed by bus transactions.
pub trait BusTimer {
    type Instant: BusInstant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Monotonic clock.
    fn now(&self) -> Self::Instant;
}

/// Byte-level access to 1-Wire style bus lines.
///
/// The electrical layer (presence pulse timing, bit slots, strong pull-up) is
/// the implementor's business. Operations return `nb::Result` so drivers built
/// on a bridge chip or an interrupt-driven state machine can report
/// `WouldBlock` while a slot is in progress.
pub trait OneWireBus {
    /// Associated error type for driver failures.
    type Error: Debug;

    /// Issues a bus reset on `line`.
    ///
    /// Returns `Ok(true)` if a module answered with a presence pulse.
    fn reset(&mut self, line: LineId) -> nb::Result<bool, Self::Error>;

    /// Writes one byte, LSB first.
    fn write_byte(&mut self, line: LineId, byte: u8) -> nb::Result<(), Self::Error>;

    /// Reads one byte, LSB first.
    fn read_byte(&mut self, line: LineId) -> nb::Result<u8, Self::Error>;
}

/// Byte-addressed non-volatile memory owned by the controller (EEPROM or an emulation).
pub trait NonVolatileStorage {
    type Error: Debug;

    fn read_byte(&mut self, address: u16) -> Result<u8, Self::Error>;

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), Self::Error>;
}
