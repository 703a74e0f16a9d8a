//! CRC-8 checksum protecting every 2-byte word on the wire.
//!
//! Polynomial `0x31`, initial value `0xFF`, no reflection and no final XOR.
//! The register is seeded again for every word, checksums are never chained
//! across a frame.

use ::crc::{Algorithm, Crc};

use crate::constants::{CRC8_INIT, CRC8_POLYNOMIAL, WORD_SIZE};

// Same parameters as the catalogued CRC-8/NRSC-5.
const CRC8_ALGORITHM: Algorithm<u8> = Algorithm {
    width: 8,
    poly: CRC8_POLYNOMIAL,
    init: CRC8_INIT,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC8_ALGORITHM);

/// Computes the checksum over `data`.
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// Returns `true` when `checksum` matches the data word.
pub fn verify(word: &[u8; WORD_SIZE], checksum: u8) -> bool {
    crc8(word) == checksum
}
