use embassy_time::{block_for, Duration};

use super::{
    controller::{ModeGuard, Radio},
    traits::Hardware,
    Error, Mode, Reception,
};
use crate::{
    frame::Framing,
    regs::{AutoModes, IrqFlags2, REG_AUTOMODES, REG_FIFO},
};

impl<H: Hardware> Radio<H> {
    /// Listen for one packet.
    ///
    /// The chip is put to sleep and partial bytes are discarded before this returns,
    /// also on error.
    pub(super) fn listen(
        &mut self,
        framing: Framing,
        timeout: Duration,
    ) -> Result<Reception, Error<H::Error>> {
        let mut radio = ModeGuard::new(self, Mode::Sleep);
        let result = radio.capture(framing, timeout);
        radio.rx.reset(framing);
        radio.conclude(result)
    }

    fn capture(
        &mut self,
        framing: Framing,
        timeout: Duration,
    ) -> Result<Reception, Error<H::Error>> {
        self.write(REG_AUTOMODES, AutoModes::OFF.bits())?;
        self.set_mode(Mode::Receiver)?;
        self.rx.reset(framing);

        self.hw.await_interrupt(timeout).map_err(Error::Hardware)?;
        let rssi = self.hw.read_rssi().map_err(Error::Hardware)?;

        let byte_duration = self.config.byte_duration;
        let mut remaining = timeout;
        let complete = loop {
            if !self.irq_flags2()?.contains(IrqFlags2::FIFO_NOT_EMPTY) {
                if remaining.as_ticks() == 0 {
                    break false;
                }
                block_for(byte_duration);
                remaining = remaining
                    .checked_sub(byte_duration)
                    .unwrap_or(Duration::from_ticks(0));
                continue;
            }

            let byte = self.read(REG_FIFO)?;
            match self.rx.push(byte) {
                Ok(true) => break true,
                Ok(false) => {}
                Err(_error) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Dropping malformed packet: {}", _error);

                    break false;
                }
            }
        };

        self.set_mode(Mode::Standby)?;
        let packet = if complete { self.rx.take() } else { None };

        #[cfg(feature = "defmt")]
        if let Some(packet) = &packet {
            defmt::debug!("Received {}-byte packet, rssi {}", packet.len(), rssi);
        }

        Ok(Reception { packet, rssi })
    }
}
