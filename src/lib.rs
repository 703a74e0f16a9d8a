#![cfg_attr(not(test), no_std)]

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

pub mod crc;

mod tx_frame;
pub use tx_frame::TxFrame;

mod rx_frame;
pub use rx_frame::RxFrame;

mod transport;
pub use transport::I2cTransport;

/// Where a frame stands in its single use lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Nothing has been written to or decoded from the frame yet.
    Fresh,
    /// Some bytes are written or decoded and room is left.
    Active,
    /// The frame is full (transmit) or fully decoded (receive).
    Exhausted,
}
