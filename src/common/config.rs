// src/common/config.rs

use super::timing;
use core::time::Duration;

/// Storage address of the four persisted per-category counters.
pub const INDICES_STORAGE_OFFSET: u16 = 1000;

/// Runtime knobs. `Default` gives the values from [`timing`] and
/// [`INDICES_STORAGE_OFFSET`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniConfig {
    /// Interval between two polls of the same periodic line.
    pub poll_interval: Duration,
    /// Minimum time between two start-measurement commands.
    pub measurement_cooldown: Duration,
    /// Wait after a save-to-EEPROM command before the closing reset.
    pub commit_settle: Duration,
    /// Timeout for one byte-level bus operation.
    pub byte_io_timeout: Duration,
    /// Address of the persisted counters in controller storage.
    pub storage_offset: u16,
}

impl Default for UniConfig {
    fn default() -> Self {
        UniConfig {
            poll_interval: timing::MODULE_UPDATE_INTERVAL,
            measurement_cooldown: timing::MEASUREMENT_COOLDOWN,
            commit_settle: timing::COMMIT_SETTLE,
            byte_io_timeout: timing::BYTE_IO_TIMEOUT,
            storage_offset: INDICES_STORAGE_OFFSET,
        }
    }
}

impl UniConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_measurement_cooldown(mut self, cooldown: Duration) -> Self {
        self.measurement_cooldown = cooldown;
        self
    }

    pub fn with_storage_offset(mut self, offset: u16) -> Self {
        self.storage_offset = offset;
        self
    }
}
