//! The subset of the RFM69 register map used by the packet engine.
//!
//! Chip configuration (bit rate, frequency, sync words, FifoThresh, ...) is
//! expected to have been written before the [`Radio`](crate::Radio) is driven.

use bitflags::bitflags;

pub const REG_FIFO: u8 = 0x00;
pub const REG_OPMODE: u8 = 0x01;
pub const REG_IRQFLAGS1: u8 = 0x27;
pub const REG_IRQFLAGS2: u8 = 0x28;
pub const REG_AUTOMODES: u8 = 0x3B;

/// Mode field in RegOpMode (bits 4..2)
pub const OPMODE_MODE_SHIFT: u8 = 2;
pub const OPMODE_MODE_MASK: u8 = 0x1C;

bitflags! {
    /// RegIrqFlags1
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags1: u8 {
        /// Set when the operating mode requested in RegOpMode is ready
        const MODE_READY = 0x80;
        const RX_READY = 0x40;
        const TX_READY = 0x20;
        const PLL_LOCK = 0x10;
        const RSSI = 0x08;
        const TIMEOUT = 0x04;
        /// Set when entering the intermediate mode of the automode configuration
        const AUTO_MODE = 0x02;
        const SYNC_ADDRESS_MATCH = 0x01;
    }
}

bitflags! {
    /// RegIrqFlags2
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags2: u8 {
        /// The FIFO holds 66 bytes
        const FIFO_FULL = 0x80;
        /// At least one byte is in the FIFO
        const FIFO_NOT_EMPTY = 0x40;
        /// The FIFO level exceeds the FifoThreshold setting
        const FIFO_LEVEL = 0x20;
        /// Set on overrun, cleared by writing a one to it
        const FIFO_OVERRUN = 0x10;
        const PACKET_SENT = 0x08;
        const PAYLOAD_READY = 0x04;
        const CRC_OK = 0x02;
    }
}

bitflags! {
    /// RegAutoModes
    ///
    /// The register holds three independent fields: enter condition (bits 7..5),
    /// exit condition (bits 4..2) and intermediate mode (bits 1..0).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AutoModes: u8 {
        /// Enter condition: rising edge of FifoNotEmpty
        const ENTER_FIFO_NOT_EMPTY = 0b001 << 5;
        /// Exit condition: falling edge of FifoNotEmpty
        const EXIT_FIFO_EMPTY = 0b001 << 2;
        /// Intermediate mode: transmitter
        const INTERMEDIATE_TRANSMITTER = 0b11;
    }
}

impl AutoModes {
    /// Enter transmitter once the FIFO gets a byte and fall back to standby once it runs dry.
    pub const TRANSMIT: Self = Self::ENTER_FIFO_NOT_EMPTY
        .union(Self::EXIT_FIFO_EMPTY)
        .union(Self::INTERMEDIATE_TRANSMITTER);

    pub const OFF: Self = Self::empty();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmit_automode_encoding() {
        assert_eq!(0x27, AutoModes::TRANSMIT.bits());
        assert_eq!(0x00, AutoModes::OFF.bits());
    }
}
