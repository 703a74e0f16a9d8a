use log::{debug, warn};

use crate::constants::{GROUP_SIZE, WORD_SIZE};
use crate::crc;
use crate::{Error, FrameState};

/// Decodes a frame received from the bus.
///
/// The buffer is filled by [`I2cTransport::receive_frame`](crate::I2cTransport::receive_frame),
/// which also records how many bytes were actually received. Values are then
/// read in the order the device sends them. Every word's checksum is
/// verified before anything is returned.
///
/// A failing `get_*` call never moves the read position.
#[derive(Debug)]
pub struct RxFrame<'a> {
    buffer: &'a mut [u8],
    index: usize,
    num_bytes: usize,
}

impl<'a> RxFrame<'a> {
    /// Creates an empty receive frame over `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            index: 0,
            num_bytes: 0,
        }
    }

    /// Reads an unsigned 16-bit integer (one word).
    pub fn get_u16(&mut self) -> Result<u16, Error> {
        self.read_words().map(u16::from_be_bytes)
    }

    /// Reads a signed 16-bit integer (one word).
    pub fn get_i16(&mut self) -> Result<i16, Error> {
        self.read_words().map(i16::from_be_bytes)
    }

    /// Reads an unsigned 32-bit integer (two words, most significant first).
    pub fn get_u32(&mut self) -> Result<u32, Error> {
        self.read_words().map(u32::from_be_bytes)
    }

    /// Reads a signed 32-bit integer (two words, most significant first).
    pub fn get_i32(&mut self) -> Result<i32, Error> {
        self.read_words().map(i32::from_be_bytes)
    }

    /// Reads an IEEE-754 single precision float sent as the big-endian bit
    /// pattern over two words.
    pub fn get_f32(&mut self) -> Result<f32, Error> {
        self.get_u32().map(f32::from_bits)
    }

    /// Reads `data.len()` payload bytes, skipping the checksum after every pair.
    ///
    /// `data` must have an even length, otherwise [`Error::UnalignedLength`]
    /// is returned. On any error `data` is left untouched.
    pub fn get_bytes(&mut self, data: &mut [u8]) -> Result<(), Error> {
        if data.len() % WORD_SIZE != 0 {
            return Err(Error::UnalignedLength);
        }
        let groups = self.verified_groups(data.len() / WORD_SIZE)?;
        let consumed = groups.len();
        for (word, group) in data
            .chunks_exact_mut(WORD_SIZE)
            .zip(groups.chunks_exact(GROUP_SIZE))
        {
            word.copy_from_slice(&group[..WORD_SIZE]);
        }
        self.index += consumed;
        Ok(())
    }

    /// Number of bytes received by the last bus read.
    pub fn len(&self) -> usize {
        self.num_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.num_bytes == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Offset of the next group to decode.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Received bytes not decoded yet, checksums included.
    pub fn remaining(&self) -> usize {
        self.num_bytes - self.index
    }

    pub fn state(&self) -> FrameState {
        if self.num_bytes > 0 && self.index == self.num_bytes {
            FrameState::Exhausted
        } else if self.index == 0 {
            FrameState::Fresh
        } else {
            FrameState::Active
        }
    }

    /// Hands out the first `num_bytes` bytes of the buffer for the bus to fill.
    ///
    /// The frame is reset and reports no data until
    /// [`set_received`](Self::set_received) is called.
    pub(crate) fn receive_buffer(&mut self, num_bytes: usize) -> Result<&mut [u8], Error> {
        if num_bytes > self.buffer.len() {
            return Err(Error::BufferOverflow);
        }
        self.index = 0;
        self.num_bytes = 0;
        Ok(&mut self.buffer[..num_bytes])
    }

    pub(crate) fn set_received(&mut self, num_bytes: usize) {
        debug_assert!(num_bytes <= self.buffer.len());
        self.index = 0;
        self.num_bytes = num_bytes.min(self.buffer.len());
        debug!("Received frame: {:02X?}", &self.buffer[..self.num_bytes]);
    }

    fn read_words<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut value = [0u8; N];
        self.get_bytes(&mut value)?;
        Ok(value)
    }

    // Checks that `count` groups are available and all of their checksums
    // hold. Returns the groups without consuming them.
    fn verified_groups(&self, count: usize) -> Result<&[u8], Error> {
        let needed = count * GROUP_SIZE;
        if needed > self.remaining() {
            debug!(
                "Insufficient data: {} bytes needed, {} of {} left",
                needed,
                self.remaining(),
                self.num_bytes
            );
            return Err(Error::InsufficientData);
        }

        let groups = &self.buffer[self.index..self.index + needed];
        for (i, group) in groups.chunks_exact(GROUP_SIZE).enumerate() {
            let word = [group[0], group[1]];
            if !crc::verify(&word, group[WORD_SIZE]) {
                warn!(
                    "Checksum mismatch at offset {}: word {:02X?}, expected {:02X}, received {:02X}",
                    self.index + i * GROUP_SIZE,
                    word,
                    crc::crc8(&word),
                    group[WORD_SIZE]
                );
                return Err(Error::ChecksumMismatch);
            }
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandWidth, TxFrame};
    use proptest::prelude::*;

    fn received<'a>(buffer: &'a mut [u8], num_bytes: usize) -> RxFrame<'a> {
        let mut frame = RxFrame::new(buffer);
        frame.set_received(num_bytes);
        frame
    }

    #[test]
    fn get_u32_joins_two_words() {
        let mut buffer = [0x12, 0x34, 0x37, 0x56, 0x78, 0x7D];
        let mut frame = received(&mut buffer, 6);
        assert_eq!(frame.get_u32(), Ok(0x12345678));
        assert_eq!(frame.position(), 6);
        assert_eq!(frame.state(), FrameState::Exhausted);
    }

    #[test]
    fn corrupted_first_checksum_keeps_position() {
        let mut buffer = [0x12, 0x34, 0x00, 0x56, 0x78, 0x7D];
        let mut frame = received(&mut buffer, 6);
        assert_eq!(frame.get_u32(), Err(Error::ChecksumMismatch));
        assert_eq!(frame.position(), 0);
        assert_eq!(frame.state(), FrameState::Fresh);
    }

    #[test]
    fn corrupted_second_word_keeps_position() {
        let mut buffer = [0x12, 0x34, 0x37, 0x56, 0x79, 0x7D];
        let mut frame = received(&mut buffer, 6);
        assert_eq!(frame.get_u32(), Err(Error::ChecksumMismatch));
        assert_eq!(frame.position(), 0);
        assert_eq!(frame.get_u16(), Ok(0x1234));
        assert_eq!(frame.get_u16(), Err(Error::ChecksumMismatch));
        assert_eq!(frame.position(), 3);
    }

    #[test]
    fn get_u32_needs_six_bytes() {
        let mut buffer = [0x12, 0x34, 0x37, 0x56, 0x78, 0x7D];
        let mut frame = received(&mut buffer, 5);
        assert_eq!(frame.get_u32(), Err(Error::InsufficientData));
        assert_eq!(frame.position(), 0);
        assert_eq!(frame.get_u16(), Ok(0x1234));
        assert_eq!(frame.get_u32(), Err(Error::InsufficientData));
        assert_eq!(frame.position(), 3);
        assert_eq!(frame.state(), FrameState::Active);
    }

    #[test]
    fn reads_stop_at_received_length() {
        let mut buffer = [0x12, 0x34, 0x37, 0x56, 0x78, 0x7D];
        let mut frame = received(&mut buffer, 3);
        assert_eq!(frame.get_u16(), Ok(0x1234));
        assert_eq!(frame.get_u16(), Err(Error::InsufficientData));
        assert_eq!(frame.remaining(), 0);
    }

    #[test]
    fn nothing_received_yet() {
        let mut buffer = [0x12, 0x34, 0x37];
        let mut frame = RxFrame::new(&mut buffer);
        assert!(frame.is_empty());
        assert_eq!(frame.get_u16(), Err(Error::InsufficientData));
        assert_eq!(frame.state(), FrameState::Fresh);
    }

    #[test]
    fn signed_and_float_values() {
        let mut buffer = [0xFF, 0xFF, 0xAC, 0xFF, 0xFE, 0x9D, 0xFF, 0xFF, 0xAC];
        let mut frame = received(&mut buffer, 9);
        assert_eq!(frame.get_i32(), Ok(-2));
        assert_eq!(frame.get_i16(), Ok(-1));

        let mut buffer = [0x3F, 0xC0, crc::crc8(&[0x3F, 0xC0]), 0x00, 0x00, 0x81];
        let mut frame = received(&mut buffer, 6);
        assert_eq!(frame.get_f32(), Ok(1.5));
    }

    #[test]
    fn get_bytes_strips_checksums() {
        let mut buffer = [0xBE, 0xEF, 0x92, 0x12, 0x34, 0x37];
        let mut frame = received(&mut buffer, 6);
        let mut data = [0u8; 4];
        frame.get_bytes(&mut data).unwrap();
        assert_eq!(data, [0xBE, 0xEF, 0x12, 0x34]);
    }

    #[test]
    fn get_bytes_leaves_output_untouched_on_error() {
        let mut buffer = [0xBE, 0xEF, 0x92, 0x12, 0x34, 0x38];
        let mut frame = received(&mut buffer, 6);
        let mut data = [0xAAu8; 4];
        assert_eq!(frame.get_bytes(&mut data), Err(Error::ChecksumMismatch));
        assert_eq!(data, [0xAA; 4]);
        assert_eq!(frame.get_bytes(&mut data[..3]), Err(Error::UnalignedLength));
        assert_eq!(frame.position(), 0);
    }

    #[test]
    fn receive_buffer_rejects_oversized_reads() {
        let mut buffer = [0u8; 3];
        let mut frame = RxFrame::new(&mut buffer);
        assert_eq!(frame.receive_buffer(6).unwrap_err(), Error::BufferOverflow);
        assert_eq!(frame.receive_buffer(3).unwrap().len(), 3);
    }

    proptest! {
        #[test]
        fn u16_round_trip(value: u16) {
            let mut tx = [0u8; 3];
            let mut frame = TxFrame::without_command(&mut tx);
            frame.add_u16(value).unwrap();
            let len = frame.len();

            let mut rx = received(&mut tx, len);
            prop_assert_eq!(rx.get_u16(), Ok(value));
        }

        #[test]
        fn mixed_round_trip(a: i16, b: u32, c: i32, d in proptest::num::f32::NORMAL) {
            let mut tx = [0u8; 2 + 3 + 6 + 6 + 6];
            let mut frame = TxFrame::with_command(&mut tx, CommandWidth::TwoBytes, 0x1234).unwrap();
            frame.add_i16(a).unwrap();
            frame.add_u32(b).unwrap();
            frame.add_i32(c).unwrap();
            frame.add_f32(d).unwrap();
            prop_assert_eq!(frame.remaining(), 0);

            let mut rx = received(&mut tx[2..], 21);
            prop_assert_eq!(rx.get_i16(), Ok(a));
            prop_assert_eq!(rx.get_u32(), Ok(b));
            prop_assert_eq!(rx.get_i32(), Ok(c));
            prop_assert_eq!(rx.get_f32(), Ok(d));
            prop_assert_eq!(rx.state(), FrameState::Exhausted);
        }

        #[test]
        fn single_bit_flip_is_rejected(value: u16, bit in 0usize..24) {
            let mut buffer = [0u8; 3];
            TxFrame::without_command(&mut buffer).add_u16(value).unwrap();
            buffer[bit / 8] ^= 1 << (bit % 8);

            let mut rx = received(&mut buffer, 3);
            prop_assert_eq!(rx.get_u16(), Err(Error::ChecksumMismatch));
            prop_assert_eq!(rx.position(), 0);
        }
    }
}
