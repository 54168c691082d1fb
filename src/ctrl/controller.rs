use core::ops::{Deref, DerefMut, Range};

use embassy_time::{block_for, Duration, Instant};

use super::{traits::Hardware, Error, Mode, Reception};
use crate::{
    config::Config,
    frame::{Delimiter, Frame, Framing, Header, MAX_PAYLOAD, MAX_TX_FRAME},
    regs::{IrqFlags1, IrqFlags2, REG_FIFO, REG_IRQFLAGS1, REG_IRQFLAGS2, REG_OPMODE},
};

/// RFM69 packet controller
///
/// The controller owns the hardware interface and must be driven by a single owner.
/// The first error is latched, after which every operation fails with that error
/// without touching the hardware.
pub struct Radio<H: Hardware> {
    pub(super) hw: H,
    pub(super) config: Config,
    mode: Mode,
    error: Option<Error<H::Error>>,
    pub(super) tx: [u8; MAX_TX_FRAME],
    pub(super) rx: Delimiter,
}

impl<H: Hardware> Radio<H> {
    /// Create a new controller for an already configured chip
    pub const fn new(hw: H) -> Self {
        Self::with_config(hw, Config::new())
    }

    pub const fn with_config(hw: H, config: Config) -> Self {
        Self {
            hw,
            config,
            mode: Mode::Sleep,
            error: None,
            tx: [0; MAX_TX_FRAME],
            rx: Delimiter::new(Framing::Raw),
        }
    }

    /// The last mode the controller brought the chip into
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The latched error, if any operation has failed
    pub fn error(&self) -> Option<&Error<H::Error>> {
        self.error.as_ref()
    }

    /// Release the hardware interface
    pub fn release(self) -> H {
        self.hw
    }

    /// Transmit a zero terminated packet.
    ///
    /// # Panics
    /// If `payload` is longer than [`MAX_PAYLOAD`].
    pub fn send(&mut self, payload: &[u8]) -> Result<(), Error<H::Error>> {
        self.send_frame(Frame::Raw(payload))
    }

    /// Transmit a packet with a RadioHead header.
    ///
    /// # Panics
    /// If `payload` is longer than [`MAX_PAYLOAD`].
    pub fn send_headered(&mut self, payload: &[u8], header: Header) -> Result<(), Error<H::Error>> {
        self.send_frame(Frame::Headered(header, payload))
    }

    /// Transmit a packet with the RadioHead broadcast header.
    pub fn send_broadcast(&mut self, payload: &[u8]) -> Result<(), Error<H::Error>> {
        self.send_headered(payload, Header::BROADCAST)
    }

    /// Listen for a zero terminated packet for at most `timeout`.
    /// A timeout is not an error, it is reported as a reception without a packet.
    pub fn receive(&mut self, timeout: Duration) -> Result<Reception, Error<H::Error>> {
        self.receive_frame(Framing::Raw, timeout)
    }

    /// Listen for a headered packet for at most `timeout`.
    /// The returned packet starts with the `TO FROM ID FLAGS` header bytes.
    pub fn receive_headered(&mut self, timeout: Duration) -> Result<Reception, Error<H::Error>> {
        self.receive_frame(Framing::Headered, timeout)
    }

    /// Transmit a zero terminated packet and then listen for the response.
    /// Nothing correlates the response to the request apart from their order.
    pub fn send_and_receive(
        &mut self,
        payload: &[u8],
        timeout: Duration,
    ) -> Result<Reception, Error<H::Error>> {
        self.send(payload)?;
        self.receive(timeout)
    }

    /// Transmit a headered packet and then listen for a headered response.
    pub fn send_and_receive_headered(
        &mut self,
        payload: &[u8],
        header: Header,
        timeout: Duration,
    ) -> Result<Reception, Error<H::Error>> {
        self.send_headered(payload, header)?;
        self.receive_headered(timeout)
    }

    fn send_frame(&mut self, frame: Frame) -> Result<(), Error<H::Error>> {
        let size = frame.payload().len();
        assert!(size <= MAX_PAYLOAD, "attempting to send {}-byte packet", size);
        self.check()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Sending {}-byte packet in {} mode", size, self.mode);

        let length = frame
            .write(&mut self.tx)
            .expect("transmit buffer holds any frame with a payload of at most MAX_PAYLOAD bytes");
        let result = self.transmit(length);
        self.latch(result)
    }

    fn receive_frame(
        &mut self,
        framing: Framing,
        timeout: Duration,
    ) -> Result<Reception, Error<H::Error>> {
        self.check()?;
        let result = self.listen(framing, timeout);
        self.latch(result)
    }

    fn check(&self) -> Result<(), Error<H::Error>> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn latch<T>(&mut self, result: Result<T, Error<H::Error>>) -> Result<T, Error<H::Error>> {
        if let Err(error) = &result {
            if self.error.is_none() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Latching radio error");

                self.error = Some(error.clone());
            }
        }
        result
    }

    pub(super) fn read(&mut self, address: u8) -> Result<u8, Error<H::Error>> {
        self.hw.read_register(address).map_err(Error::Hardware)
    }

    pub(super) fn write(&mut self, address: u8, value: u8) -> Result<(), Error<H::Error>> {
        self.hw
            .write_register(address, value)
            .map_err(Error::Hardware)
    }

    /// Burst the given range of the transmit buffer into the FIFO
    pub(super) fn write_fifo(&mut self, range: Range<usize>) -> Result<(), Error<H::Error>> {
        self.hw
            .write_burst(REG_FIFO, &self.tx[range])
            .map_err(Error::Hardware)
    }

    pub(super) fn irq_flags2(&mut self) -> Result<IrqFlags2, Error<H::Error>> {
        Ok(IrqFlags2::from_bits_truncate(self.read(REG_IRQFLAGS2)?))
    }

    /// The mode currently reported by the chip
    pub(super) fn chip_mode(&mut self) -> Result<Option<Mode>, Error<H::Error>> {
        Ok(Mode::from_opmode(self.read(REG_OPMODE)?))
    }

    /// Request a mode and wait for the chip to report ModeReady
    pub(super) fn set_mode(&mut self, mode: Mode) -> Result<(), Error<H::Error>> {
        self.write(REG_OPMODE, mode.opmode())?;

        let timeout = self.config.mode_timeout;
        let ready = self.poll(timeout, |radio| {
            let flags = IrqFlags1::from_bits_truncate(radio.read(REG_IRQFLAGS1)?);
            Ok(flags.contains(IrqFlags1::MODE_READY))
        })?;
        if !ready {
            return Err(Error::ModeTimeout(mode));
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Mode {} -> {}", self.mode, mode);

        self.mode = mode;
        Ok(())
    }

    /// Evaluate `condition` every byte duration until it holds or `timeout` elapses.
    /// The condition is always evaluated at least once.
    pub(super) fn poll(
        &mut self,
        timeout: Duration,
        mut condition: impl FnMut(&mut Self) -> Result<bool, Error<H::Error>>,
    ) -> Result<bool, Error<H::Error>> {
        let deadline = Instant::now() + timeout;
        loop {
            if condition(self)? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            block_for(self.config.byte_duration);
        }
    }
}

/// Restores a mode when the scope of a transmit or receive ends.
///
/// `finish` restores the mode and reports the outcome.
/// Dropping an unfinished guard restores the mode on a best effort basis.
/// `conclude` does either depending on the result of the guarded body.
pub(super) struct ModeGuard<'a, H: Hardware> {
    radio: &'a mut Radio<H>,
    restore: Mode,
    armed: bool,
}

impl<'a, H: Hardware> ModeGuard<'a, H> {
    pub(super) fn new(radio: &'a mut Radio<H>, restore: Mode) -> Self {
        Self {
            radio,
            restore,
            armed: true,
        }
    }

    pub(super) fn finish(mut self) -> Result<(), Error<H::Error>> {
        self.armed = false;
        self.radio.set_mode(self.restore)
    }

    /// Restore the mode after the guarded body produced `result`.
    ///
    /// A failed body is latched before the best effort restore runs,
    /// so a failing restore never takes the place of the original error.
    pub(super) fn conclude<T>(
        self,
        result: Result<T, Error<H::Error>>,
    ) -> Result<T, Error<H::Error>> {
        match result {
            Ok(value) => self.finish().map(|()| value),
            Err(error) => self.radio.latch(Err(error)),
        }
    }
}

impl<H: Hardware> Deref for ModeGuard<'_, H> {
    type Target = Radio<H>;

    fn deref(&self) -> &Self::Target {
        self.radio
    }
}

impl<H: Hardware> DerefMut for ModeGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.radio
    }
}

impl<H: Hardware> Drop for ModeGuard<'_, H> {
    fn drop(&mut self) {
        if self.armed {
            let result = self.radio.set_mode(self.restore);
            let _ = self.radio.latch(result);
        }
    }
}
