use embedded_hal_async::i2c::{Error as _, I2c};
use log::debug;

use crate::constants::{GROUP_SIZE, MAX_COMMAND_SIZE};
use crate::{Config, Error, RxFrame, TxFrame};

/// Moves frames between the codec and an I2C bus.
///
/// This is the only component allowed to fill an [`RxFrame`]. Timing between
/// a command and its response (the device's execution time) is left to the
/// caller.
///
/// # Type Parameters
///
/// * `I2C`: The I2C bus the device is attached to.
///   It must implement `embedded_hal_async::i2c::I2c`.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    config: Config,
}

impl<I2C> I2cTransport<I2C>
where
    I2C: I2c,
{
    /// Creates a new transport for the device described by `config`.
    pub fn new(i2c: I2C, config: Config) -> Self {
        Self { i2c, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Writes the bytes built so far in `frame` to the device.
    pub async fn send_frame(&mut self, frame: &TxFrame<'_>) -> Result<(), Error> {
        debug!(
            "Sending frame to 0x{:02X}: {:02X?}",
            self.config.address,
            frame.as_bytes()
        );
        self.i2c
            .write(self.config.address, frame.as_bytes())
            .await
            .map_err(|e| {
                log::error!(
                    "I2C write to 0x{:02X} failed: {:?}",
                    self.config.address,
                    e.kind()
                );
                Error::WriteFailure
            })
    }

    /// Sends a frame made of the command field alone, using the configured width.
    ///
    /// # Returns
    ///
    /// * `Err(Error::InvalidConfiguration)` if the device is configured without a command field.
    /// * `Err(Error::WriteFailure)` if the bus write failed.
    pub async fn send_command(&mut self, command: u16) -> Result<(), Error> {
        let mut buffer = [0u8; MAX_COMMAND_SIZE];
        let frame = TxFrame::with_command(&mut buffer, self.config.command_width, command)?;
        self.send_frame(&frame).await
    }

    /// Reads `num_bytes` bytes from the device into `frame`.
    ///
    /// `num_bytes` counts checksums too, so it must be a multiple of three.
    /// On success the frame is rewound and ready for its `get_*` calls.
    ///
    /// # Returns
    ///
    /// * `Err(Error::UnalignedLength)` if `num_bytes` is not a whole number of groups.
    /// * `Err(Error::BufferOverflow)` if `num_bytes` exceeds the frame's capacity.
    /// * `Err(Error::ReadFailure)` if the bus read failed. The frame then holds no data.
    pub async fn receive_frame(
        &mut self,
        num_bytes: usize,
        frame: &mut RxFrame<'_>,
    ) -> Result<(), Error> {
        if num_bytes % GROUP_SIZE != 0 {
            log::error!("Cannot receive {} bytes, not a whole number of groups", num_bytes);
            return Err(Error::UnalignedLength);
        }
        let buffer = frame.receive_buffer(num_bytes)?;
        self.i2c
            .read(self.config.address, buffer)
            .await
            .map_err(|e| {
                log::error!(
                    "I2C read of {} bytes from 0x{:02X} failed: {:?}",
                    num_bytes,
                    self.config.address,
                    e.kind()
                );
                Error::ReadFailure
            })?;
        frame.set_received(num_bytes);
        Ok(())
    }
}
