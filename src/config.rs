/// Width of the command field leading a transmit frame.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum CommandWidth {
    /// The frame carries data words only.
    None,
    /// A single command byte.
    OneByte,
    /// A 16-bit command, sent big-endian.
    TwoBytes,
}

impl CommandWidth {
    /// Number of bytes the command field occupies at the start of the frame.
    pub const fn len(self) -> usize {
        match self {
            CommandWidth::None => 0,
            CommandWidth::OneByte => 1,
            CommandWidth::TwoBytes => 2,
        }
    }

    /// Returns `true` when the frame has no command field.
    pub const fn is_empty(self) -> bool {
        matches!(self, CommandWidth::None)
    }
}

impl Default for CommandWidth {
    /// Most devices on this protocol use 16-bit commands.
    fn default() -> CommandWidth {
        CommandWidth::TwoBytes
    }
}

/// Configuration settings for an I2C device speaking the framed protocol.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// The 7-bit I2C address of the device.
    pub address: u8,
    /// The width of the command field the device expects.
    pub command_width: CommandWidth,
}

impl Config {
    /// Creates a new `Config` for the device at `address`.
    ///
    /// # Arguments
    ///
    /// * `address` - The 7-bit I2C address of the device.
    ///
    /// # Returns
    ///
    /// A new `Config` using 16-bit commands.
    pub fn new(address: u8) -> Config {
        Config {
            address,
            command_width: CommandWidth::default(),
        }
    }
    /// Sets the device address for the configuration.
    ///
    /// # Arguments
    ///
    /// * `address` - The 7-bit I2C address to set.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }
    /// Sets the command field width for the configuration.
    pub fn command_width(mut self, command_width: CommandWidth) -> Self {
        self.command_width = command_width;
        self
    }
}
