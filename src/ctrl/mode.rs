use num_traits::FromPrimitive;

use crate::regs::{OPMODE_MODE_MASK, OPMODE_MODE_SHIFT};

/// Operating mode of the transceiver
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Lowest power, FIFO not accessible.
    Sleep = 0b000,

    /// Oscillator running, FIFO accessible.
    Standby = 0b001,

    /// Clocking FIFO bytes out over the air.
    Transmitter = 0b011,

    /// Listening and filling the FIFO.
    Receiver = 0b100,
}

impl Mode {
    /// The RegOpMode value requesting this mode with sequencer and listen mode left on auto
    pub const fn opmode(self) -> u8 {
        (self as u8) << OPMODE_MODE_SHIFT
    }

    /// Decode the mode field of RegOpMode.
    /// The frequency synthesizer mode is not tracked and decodes as `None`.
    pub fn from_opmode(opmode: u8) -> Option<Self> {
        Self::from_u8((opmode & OPMODE_MODE_MASK) >> OPMODE_MODE_SHIFT)
    }
}
