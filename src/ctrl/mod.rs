pub mod traits;
mod controller;
mod mode;
mod rx;
mod tx;

use crate::frame::Packet;

/// Received signal strength in dBm
pub type Rssi = i16;

/// Size of the chip FIFO
pub const FIFO_SIZE: usize = 66;

pub use controller::Radio;
pub use mode::Mode;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A register operation on the hardware interface failed
    Hardware(E),
    /// The chip did not report ModeReady in time
    ModeTimeout(Mode),
    /// FifoLevel did not clear while streaming a packet
    FifoStalled,
    /// The chip did not return to standby after the last byte was written
    TransmitIncomplete,
}

/// The outcome of a receive attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Reception {
    /// The received packet, or `None` if the timeout elapsed first
    pub packet: Option<Packet>,
    /// The rssi sampled right after the interrupt wait
    pub rssi: Rssi,
}
