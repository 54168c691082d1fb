use embassy_time::block_for;

use super::{
    controller::{ModeGuard, Radio},
    traits::Hardware,
    Error, Mode, FIFO_SIZE,
};
use crate::regs::{AutoModes, IrqFlags2, REG_AUTOMODES, REG_IRQFLAGS2};

impl<H: Hardware> Radio<H> {
    /// Stream the first `length` bytes of the transmit buffer through the FIFO.
    ///
    /// The automode takes the chip to transmitter when the FIFO gets its first byte
    /// and back to standby when it runs dry, so the FIFO must be refilled before it empties.
    pub(super) fn transmit(&mut self, length: usize) -> Result<(), Error<H::Error>> {
        let mut radio = ModeGuard::new(self, Mode::Standby);
        let result = radio.stream(length);
        radio.conclude(result)
    }

    fn stream(&mut self, length: usize) -> Result<(), Error<H::Error>> {
        self.write(REG_IRQFLAGS2, IrqFlags2::FIFO_OVERRUN.bits())?;
        self.set_mode(Mode::Standby)?;
        self.write(REG_AUTOMODES, AutoModes::TRANSMIT.bits())?;

        // The first chunk may fill the FIFO completely
        let mut chunk = FIFO_SIZE;
        let mut written = 0;
        loop {
            let end = length.min(written + chunk);
            self.write_fifo(written..end)?;

            #[cfg(feature = "defmt")]
            defmt::trace!("Wrote {} bytes to fifo, {} left", end - written, length - end);

            let burst = end - written;
            written = end;
            if written == length {
                return self.await_transmitted(burst);
            }

            self.await_fifo_headroom()?;
            chunk = self.config.refill_size();
        }
    }

    fn await_fifo_headroom(&mut self) -> Result<(), Error<H::Error>> {
        // Short of a quarter of the FIFO has gone out when this returns
        block_for(self.config.byte_duration * (FIFO_SIZE / 4) as u32);

        let timeout = self.config.fifo_timeout;
        let below_threshold = self.poll(timeout, |radio| {
            Ok(!radio.irq_flags2()?.contains(IrqFlags2::FIFO_LEVEL))
        })?;
        if !below_threshold {
            return Err(Error::FifoStalled);
        }
        Ok(())
    }

    fn await_transmitted(&mut self, burst: usize) -> Result<(), Error<H::Error>> {
        block_for(self.config.byte_duration * burst as u32);

        // The exit condition of the automode brings the chip back to standby
        let timeout = self.config.tx_timeout;
        let standby = self.poll(timeout, |radio| {
            Ok(radio.chip_mode()? == Some(Mode::Standby))
        })?;
        if !standby {
            return Err(Error::TransmitIncomplete);
        }
        Ok(())
    }
}
