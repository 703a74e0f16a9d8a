use log::debug;

use crate::constants::{GROUP_SIZE, WORD_SIZE};
use crate::crc::crc8;
use crate::{CommandWidth, Error, FrameState};

/// Builds an outgoing frame in a caller supplied buffer.
///
/// The frame starts with an optional command field (one or two bytes, no
/// checksum) followed by data words. Every 2-byte word is written big-endian
/// and followed by its own CRC-8 byte.
///
/// Each `add_*` call either writes all of its words or nothing at all.
///
/// ```
/// use sensirion_i2c_nostd_rs::TxFrame;
///
/// let mut buffer = [0u8; 5];
/// let mut frame = TxFrame::with_u16_command(&mut buffer, 0x3615).unwrap();
/// frame.add_u16(0x0102).unwrap();
/// assert_eq!(frame.as_bytes(), &[0x36, 0x15, 0x01, 0x02, 0x17]);
/// ```
#[derive(Debug)]
pub struct TxFrame<'a> {
    buffer: &'a mut [u8],
    index: usize,
    command_width: CommandWidth,
}

impl<'a> TxFrame<'a> {
    /// Creates a frame whose command field is written later with
    /// [`add_command`](Self::add_command).
    ///
    /// Fails with [`Error::BufferOverflow`] when the buffer cannot even hold
    /// the command field.
    #[deprecated(note = "bind the command at construction with `with_u16_command` or `with_u8_command`")]
    pub fn new(buffer: &'a mut [u8], command_width: CommandWidth) -> Result<Self, Error> {
        if buffer.len() < command_width.len() {
            return Err(Error::BufferOverflow);
        }
        Ok(Self {
            buffer,
            index: 0,
            command_width,
        })
    }

    /// Creates a frame starting with a 16-bit command.
    pub fn with_u16_command(buffer: &'a mut [u8], command: u16) -> Result<Self, Error> {
        Self::with_command(buffer, CommandWidth::TwoBytes, command)
    }

    /// Creates a frame starting with a single command byte.
    pub fn with_u8_command(buffer: &'a mut [u8], command: u8) -> Result<Self, Error> {
        Self::with_command(buffer, CommandWidth::OneByte, u16::from(command))
    }

    /// Creates a frame carrying data words only.
    pub fn without_command(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            index: 0,
            command_width: CommandWidth::None,
        }
    }

    pub(crate) fn with_command(
        buffer: &'a mut [u8],
        command_width: CommandWidth,
        command: u16,
    ) -> Result<Self, Error> {
        if command_width.is_empty() {
            return Err(Error::InvalidConfiguration);
        }
        if buffer.len() < command_width.len() {
            return Err(Error::BufferOverflow);
        }
        let mut frame = Self {
            buffer,
            index: 0,
            command_width,
        };
        frame.write_command(command);
        Ok(frame)
    }

    /// Writes the command field of a frame created with [`new`](Self::new).
    ///
    /// With a one byte command field only the low byte of `command` is sent.
    /// Fails with [`Error::InvalidConfiguration`] when the frame has no
    /// command field or has already moved past it.
    #[deprecated(note = "bind the command at construction with `with_u16_command` or `with_u8_command`")]
    pub fn add_command(&mut self, command: u16) -> Result<(), Error> {
        if self.command_width.is_empty() || self.index != 0 {
            log::error!(
                "add_command: frame with {:?} command field is at offset {}",
                self.command_width,
                self.index
            );
            return Err(Error::InvalidConfiguration);
        }
        self.write_command(command);
        Ok(())
    }

    /// Adds an unsigned 16-bit integer as one word.
    pub fn add_u16(&mut self, data: u16) -> Result<(), Error> {
        self.add_words(&data.to_be_bytes())
    }

    /// Adds a signed 16-bit integer as one word (two's complement).
    pub fn add_i16(&mut self, data: i16) -> Result<(), Error> {
        self.add_words(&data.to_be_bytes())
    }

    /// Adds an unsigned 32-bit integer as two words, most significant first.
    pub fn add_u32(&mut self, data: u32) -> Result<(), Error> {
        self.add_words(&data.to_be_bytes())
    }

    /// Adds a signed 32-bit integer as two words, most significant first.
    pub fn add_i32(&mut self, data: i32) -> Result<(), Error> {
        self.add_words(&data.to_be_bytes())
    }

    /// Adds an IEEE-754 single precision float as two words of its bit pattern.
    pub fn add_f32(&mut self, data: f32) -> Result<(), Error> {
        self.add_words(&data.to_bits().to_be_bytes())
    }

    /// Adds raw bytes, a checksum after every pair.
    ///
    /// Fails with [`Error::UnalignedLength`] for an odd number of bytes.
    pub fn add_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        self.add_words(data)
    }

    /// Number of bytes written so far, command field included.
    pub fn len(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.index == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes still free at the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.index
    }

    pub fn command_width(&self) -> CommandWidth {
        self.command_width
    }

    pub fn state(&self) -> FrameState {
        if self.index == self.buffer.len() {
            FrameState::Exhausted
        } else if self.index == 0 {
            FrameState::Fresh
        } else {
            FrameState::Active
        }
    }

    /// The bytes written so far, ready to be put on the bus.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.index]
    }

    fn write_command(&mut self, command: u16) {
        let [high, low] = command.to_be_bytes();
        match self.command_width {
            CommandWidth::None => {}
            CommandWidth::OneByte => self.buffer[0] = low,
            CommandWidth::TwoBytes => {
                self.buffer[0] = high;
                self.buffer[1] = low;
            }
        }
        self.index = self.command_width.len();
        debug!("Command field written: {:02X?}", self.as_bytes());
    }

    // Writes `data` as consecutive words, each followed by its checksum.
    fn add_words(&mut self, data: &[u8]) -> Result<(), Error> {
        if data.len() % WORD_SIZE != 0 {
            return Err(Error::UnalignedLength);
        }
        if !self.command_width.is_empty() && self.index == 0 {
            log::error!("Data added before the {:?} command field", self.command_width);
            return Err(Error::InvalidConfiguration);
        }
        let needed = data.len() / WORD_SIZE * GROUP_SIZE;
        if needed > self.remaining() {
            debug!(
                "Frame overflow: {} bytes needed, {} of {} left",
                needed,
                self.remaining(),
                self.capacity()
            );
            return Err(Error::BufferOverflow);
        }

        let target = &mut self.buffer[self.index..self.index + needed];
        for (word, group) in data
            .chunks_exact(WORD_SIZE)
            .zip(target.chunks_exact_mut(GROUP_SIZE))
        {
            group[..WORD_SIZE].copy_from_slice(word);
            group[WORD_SIZE] = crc8(word);
        }
        self.index += needed;
        Ok(())
    }
}
