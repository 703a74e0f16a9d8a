// CRC8_POLYNOMIAL is the generator polynomial of the per-group checksum (x^8 + x^5 + x^4 + 1).
pub const CRC8_POLYNOMIAL: u8 = 0x31;

// CRC8_INIT seeds the checksum register. Every group starts from this value again.
pub const CRC8_INIT: u8 = 0xFF;

// WORD_SIZE is the number of data bytes covered by a single checksum byte.
pub const WORD_SIZE: usize = 2;

// GROUP_SIZE is the number of bytes one data word occupies on the wire (data + checksum).
pub const GROUP_SIZE: usize = WORD_SIZE + 1;

// MAX_COMMAND_SIZE is the widest command field a transmit frame can carry.
pub const MAX_COMMAND_SIZE: usize = 2;
