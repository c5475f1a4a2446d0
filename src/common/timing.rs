// src/common/timing.rs

use core::time::Duration;

// === Polling ===

/// Interval between two polls of the same periodic line.
pub const MODULE_UPDATE_INTERVAL: Duration = Duration::from_secs(5);

/// Minimum time between two start-measurement commands issued by the sensors client.
/// Modules need this long to finish a conversion of all their sensors.
pub const MEASUREMENT_COOLDOWN: Duration = Duration::from_secs(5);

// === Transactions ===

/// Time a module needs to copy its scratchpad into its own EEPROM.
pub const COMMIT_SETTLE: Duration = Duration::from_millis(100);

/// Upper bound for a single byte-level bus operation (reset, read or write slot)
/// to stop returning `WouldBlock`. A reset plus presence detect takes ~1 ms.
pub const BYTE_IO_TIMEOUT: Duration = Duration::from_millis(5);

/// Back-off between `WouldBlock` polls inside a blocking operation.
pub const WOULD_BLOCK_BACKOFF_US: u32 = 50;
