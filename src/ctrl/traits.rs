use core::fmt::Debug;

use embassy_time::Duration;

#[cfg(test)]
use mockall::automock;

use super::Rssi;

/// Register level access to an RFM69 chip.
///
/// The bus transaction mechanics (SPI, chip select, reset line) live behind this trait.
/// The driver assumes exclusive ownership of the interface.
#[cfg_attr(test, automock(type Error = ();))]
pub trait Hardware {
    type Error: Debug + Clone;

    /// Read a single register.
    fn read_register(&mut self, address: u8) -> Result<u8, Self::Error>;

    /// Write a single register.
    fn write_register(&mut self, address: u8, value: u8) -> Result<(), Self::Error>;

    /// Write consecutive bytes to the same register address, used for filling the FIFO.
    fn write_burst(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Block until the chip raises its interrupt line or `timeout` elapses.
    /// Returning does not imply that a packet arrived.
    fn await_interrupt(&mut self, timeout: Duration) -> Result<(), Self::Error>;

    /// Get the current rssi.
    fn read_rssi(&mut self) -> Result<Rssi, Self::Error>;
}
