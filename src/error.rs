use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A write would run past the end of the transmit buffer.
    BufferOverflow,
    /// Fewer bytes were received than the requested value needs.
    InsufficientData,
    /// A received checksum byte does not match its data word.
    ChecksumMismatch,
    /// The command field was used in a way the frame was not built for.
    InvalidConfiguration,
    /// A byte count does not line up with the 2-byte (or 3-byte on the wire) grouping.
    UnalignedLength,
    WriteFailure,
    ReadFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::BufferOverflow => "frame buffer overflow",
            Error::InsufficientData => "not enough received data",
            Error::ChecksumMismatch => "checksum mismatch",
            Error::InvalidConfiguration => "command field not configured for this operation",
            Error::UnalignedLength => "length is not aligned to the word grouping",
            Error::WriteFailure => "i2c write failed",
            Error::ReadFailure => "i2c read failed",
        };
        f.write_str(msg)
    }
}
