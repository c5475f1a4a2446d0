// src/common/packet.rs

//! Fixed-size packet exchanged with a universal module over the bus.
//!
//! Layout on the wire:
//!
//! ```text
//! [packet_type][controller_id]([sensor_type][relative_index][raw0..raw3]) x MAX_SLOTS [crc8]
//! ```
//!
//! The checksum is not stored in [`Packet`]; it is computed by
//! [`Packet::to_bytes`] and validated by [`Packet::from_bytes`].

use super::crc::{calculate_crc8, verify_packet_crc8};
use super::error::UniError;
use super::types::{SensorCategory, UNASSIGNED};

/// Number of sensor slots a packet carries.
pub const MAX_SLOTS: usize = 3;
/// Raw data bytes per slot.
pub const SLOT_DATA_SIZE: usize = 4;
/// Encoded size of one slot.
pub const SLOT_SIZE: usize = 2 + SLOT_DATA_SIZE;
/// Encoded size of the header.
pub const HEADER_SIZE: usize = 2;
/// Encoded size of a whole packet, checksum included.
pub const PACKET_SIZE: usize = HEADER_SIZE + MAX_SLOTS * SLOT_SIZE + 1;

/// Packet header.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PacketHeader {
    /// Selects the client that interprets the payload.
    pub packet_type: u8,
    /// Controller the module was registered with.
    pub controller_id: u8,
}

/// One sensor entry of a sensors packet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Slot {
    pub sensor_type: u8,
    pub relative_index: u8,
    pub raw_data: [u8; SLOT_DATA_SIZE],
}

impl Slot {
    pub const UNASSIGNED: Slot = Slot {
        sensor_type: UNASSIGNED,
        relative_index: UNASSIGNED,
        raw_data: [UNASSIGNED; SLOT_DATA_SIZE],
    };

    pub const fn new(
        category: SensorCategory,
        relative_index: u8,
        raw_data: [u8; SLOT_DATA_SIZE],
    ) -> Self {
        Slot {
            sensor_type: category.as_u8(),
            relative_index,
            raw_data,
        }
    }

    /// The slot's category, or `None` if the slot is inert.
    pub fn category(&self) -> Option<SensorCategory> {
        if self.relative_index == UNASSIGNED {
            return None;
        }
        SensorCategory::from_u8(self.sensor_type)
    }

    /// The slot's relative index, or `None` if it was never assigned.
    pub fn index(&self) -> Option<u8> {
        (self.relative_index != UNASSIGNED).then_some(self.relative_index)
    }

    /// Returns `(category, relative_index)` if the slot carries a sensor.
    pub fn assignment(&self) -> Option<(SensorCategory, u8)> {
        Some((self.category()?, self.index()?))
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.assignment().is_some()
    }

    fn write_into(&self, out: &mut [u8]) {
        out[0] = self.sensor_type;
        out[1] = self.relative_index;
        out[2..SLOT_SIZE].copy_from_slice(&self.raw_data);
    }

    fn read_from(bytes: &[u8]) -> Self {
        let mut raw_data = [0u8; SLOT_DATA_SIZE];
        raw_data.copy_from_slice(&bytes[2..SLOT_SIZE]);
        Slot {
            sensor_type: bytes[0],
            relative_index: bytes[1],
            raw_data,
        }
    }
}

/// A decoded packet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Packet {
    pub header: PacketHeader,
    pub slots: [Slot; MAX_SLOTS],
}

impl Packet {
    /// A packet with every byte set to `0xFF`, as read from a blank module.
    pub const fn blank() -> Self {
        Packet {
            header: PacketHeader {
                packet_type: UNASSIGNED,
                controller_id: UNASSIGNED,
            },
            slots: [Slot::UNASSIGNED; MAX_SLOTS],
        }
    }

    pub const fn new(packet_type: u8, controller_id: u8) -> Self {
        Packet {
            header: PacketHeader {
                packet_type,
                controller_id,
            },
            slots: [Slot::UNASSIGNED; MAX_SLOTS],
        }
    }

    #[inline]
    pub fn packet_type(&self) -> u8 {
        self.header.packet_type
    }

    /// True if this module was registered with controller `controller_id`.
    #[inline]
    pub fn is_owned_by(&self, controller_id: u8) -> bool {
        self.header.controller_id == controller_id
    }

    /// Iterates over the slots that carry a sensor.
    pub fn assigned_slots(&self) -> impl Iterator<Item = (SensorCategory, u8, &Slot)> + '_ {
        self.slots.iter().filter_map(|slot| {
            let (category, index) = slot.assignment()?;
            Some((category, index, slot))
        })
    }

    /// Serialises the packet and appends its checksum.
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut out = [0u8; PACKET_SIZE];
        out[0] = self.header.packet_type;
        out[1] = self.header.controller_id;
        for (i, slot) in self.slots.iter().enumerate() {
            let start = HEADER_SIZE + i * SLOT_SIZE;
            slot.write_into(&mut out[start..start + SLOT_SIZE]);
        }
        out[PACKET_SIZE - 1] = calculate_crc8(&out[..PACKET_SIZE - 1]);
        out
    }

    /// Decodes and checksum-validates a packet.
    ///
    /// # Returns
    ///
    /// * `Err(UniError::BufferOverflow)` if `bytes` is not exactly [`PACKET_SIZE`] long.
    /// * `Err(UniError::CrcMismatch)` if the trailing checksum is wrong.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UniError<()>> {
        if bytes.len() != PACKET_SIZE {
            return Err(UniError::BufferOverflow {
                needed: PACKET_SIZE,
                got: bytes.len(),
            });
        }
        verify_packet_crc8::<()>(bytes)?;

        let mut slots = [Slot::UNASSIGNED; MAX_SLOTS];
        for (i, slot) in slots.iter_mut().enumerate() {
            let start = HEADER_SIZE + i * SLOT_SIZE;
            *slot = Slot::read_from(&bytes[start..start + SLOT_SIZE]);
        }

        Ok(Packet {
            header: PacketHeader {
                packet_type: bytes[0],
                controller_id: bytes[1],
            },
            slots,
        })
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::blank()
    }
}
