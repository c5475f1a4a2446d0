// src/common/line.rs

use super::error::UniError;
use core::convert::TryFrom;
use core::fmt;

/// Identifies one physical bus line (the pin the line is wired to).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct LineId(u8);

impl LineId {
    /// Creates a new `LineId`. Pin 0 is reserved and never carries a bus.
    pub fn new(pin: u8) -> Result<Self, UniError<()>> {
        if pin == 0 {
            Err(UniError::InvalidLine(pin))
        } else {
            Ok(LineId(pin))
        }
    }

    #[inline]
    pub const fn pin(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LineId {
    type Error = UniError<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LineId> for u8 {
    fn from(value: LineId) -> Self {
        value.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}
