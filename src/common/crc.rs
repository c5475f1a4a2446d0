// src/common/crc.rs

use super::error::UniError;
use crc::{Algorithm, Crc};

/// The Dallas/Maxim 1-Wire CRC-8 (CRC-8/MAXIM-DOW) used to seal every packet.
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1)
/// Initial Value: 0x00
/// Input Reflected: true
/// Output Reflected: true
/// Final XOR: 0x00
/// Check Value: 0xA1 (for "123456789")
/// Residue: 0x00
pub const UNI_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0x00,
    refin: true,
    refout: true,
    xorout: 0x00,
    check: 0xA1,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&UNI_CRC);

/// Calculates the packet CRC-8 over `data`.
///
/// The calculation covers every byte of the packet *before* the trailing
/// checksum byte.
#[inline]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

/// Verifies a buffer whose last byte is the CRC-8 of all preceding bytes.
///
/// # Returns
///
/// * `Ok(())` if the CRC is valid.
/// * `Err(UniError::BufferOverflow)` if the buffer is empty.
/// * `Err(UniError::CrcMismatch)` if the CRCs don't match.
pub fn verify_packet_crc8<E>(packet_with_crc: &[u8]) -> Result<(), UniError<E>>
where
    E: core::fmt::Debug,
{
    let Some((&received, data_part)) = packet_with_crc.split_last() else {
        return Err(UniError::BufferOverflow { needed: 1, got: 0 });
    };

    let calculated = calculate_crc8(data_part);
    if calculated == received {
        Ok(())
    } else {
        Err(UniError::CrcMismatch {
            expected: received,
            calculated,
        })
    }
}
