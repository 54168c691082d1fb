//! Timing and flow-control settings of the packet engine.

use embassy_time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Approximate time for one byte to go over the air at the configured bit rate.
    pub(crate) byte_duration: Duration,

    /// FIFO level at which the chip raises FifoLevel.
    /// Must match the FifoThreshold register.
    pub(crate) fifo_threshold: u8,

    /// Upper bound on waiting for ModeReady after a mode change.
    pub(crate) mode_timeout: Duration,

    /// Upper bound on waiting for FifoLevel to clear between chunks.
    pub(crate) fifo_timeout: Duration,

    /// Upper bound on waiting for the chip to fall back to standby after the last chunk.
    pub(crate) tx_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            byte_duration: Duration::from_millis(1),
            fifo_threshold: 20,
            mode_timeout: Duration::from_millis(500),
            fifo_timeout: Duration::from_millis(100),
            tx_timeout: Duration::from_millis(250),
        }
    }

    /// Set the time it takes to transmit one byte.
    pub const fn byte_duration(mut self, duration: Duration) -> Self {
        self.byte_duration = duration;
        self
    }

    /// Set the FIFO threshold.
    /// Values at or above the FIFO size are clamped so that a refill always fits.
    pub const fn fifo_threshold(mut self, threshold: u8) -> Self {
        self.fifo_threshold = if threshold as usize >= crate::ctrl::FIFO_SIZE {
            (crate::ctrl::FIFO_SIZE - 1) as u8
        } else {
            threshold
        };
        self
    }

    pub const fn mode_timeout(mut self, timeout: Duration) -> Self {
        self.mode_timeout = timeout;
        self
    }

    pub const fn fifo_timeout(mut self, timeout: Duration) -> Self {
        self.fifo_timeout = timeout;
        self
    }

    pub const fn tx_timeout(mut self, timeout: Duration) -> Self {
        self.tx_timeout = timeout;
        self
    }

    /// Number of bytes that may be written after FifoLevel clears
    pub(crate) const fn refill_size(&self) -> usize {
        crate::ctrl::FIFO_SIZE - self.fifo_threshold as usize
    }
}
