//! Wire framings used on top of the RFM69 FIFO.
//!
//! Two framings are supported:
//! - [`raw`]: the payload followed by a single `0x00` terminator.
//! - [`headered`]: a RadioHead style header `LEN TO FROM ID FLAGS` followed by the payload.

pub mod headered;
pub mod raw;

use heapless::Vec;

pub use self::headered::Header;

/// Maximum number of payload bytes in a single packet
pub const MAX_PAYLOAD: usize = 110;
/// Maximum number of bytes in a received packet, the four header fields included
pub const MAX_FRAME: usize = MAX_PAYLOAD + headered::FIELDS_LENGTH;
/// Maximum number of bytes in a framed packet on the wire, the length byte included
pub const MAX_TX_FRAME: usize = MAX_PAYLOAD + headered::HEADER_LENGTH;

/// A received packet.
/// For the headered framing the four header bytes `TO FROM ID FLAGS` precede the payload.
pub type Packet = Vec<u8, MAX_FRAME>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Framing {
    Raw,
    Headered,
}

/// A packet ready to be framed for transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    Raw(&'a [u8]),
    Headered(Header, &'a [u8]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// More bytes arrived than any valid frame can hold
    Oversized,
    /// The length byte of a headered frame is out of range
    InvalidLength(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteError {
    Capacity,
}

impl Frame<'_> {
    pub const fn framing(&self) -> Framing {
        match self {
            Frame::Raw(_) => Framing::Raw,
            Frame::Headered(..) => Framing::Headered,
        }
    }

    pub fn payload(&self) -> &[u8] {
        match *self {
            Frame::Raw(payload) | Frame::Headered(_, payload) => payload,
        }
    }

    /// Write the framed packet into `buffer` and return the number of bytes written
    pub fn write(&self, buffer: &mut [u8]) -> Result<usize, WriteError> {
        match self {
            Frame::Raw(payload) => raw::write(buffer, payload),
            Frame::Headered(header, payload) => headered::write(buffer, header, payload),
        }
    }
}

/// Incremental packet delimiter fed one FIFO byte at a time.
pub struct Delimiter {
    framing: Framing,
    /// Number of bytes following the length byte, once known
    expected: Option<usize>,
    buffer: Packet,
}

impl Delimiter {
    pub const fn new(framing: Framing) -> Self {
        Self {
            framing,
            expected: None,
            buffer: Vec::new(),
        }
    }

    /// Discard any accumulated bytes and start over with the given framing
    pub fn reset(&mut self, framing: Framing) {
        self.framing = framing;
        self.expected = None;
        self.buffer.clear();
    }

    /// Feed the next received byte.
    /// Returns `Ok(true)` when the byte completed the packet.
    pub fn push(&mut self, byte: u8) -> Result<bool, ReadError> {
        match self.framing {
            Framing::Raw => raw::push(&mut self.buffer, byte),
            Framing::Headered => headered::push(&mut self.buffer, &mut self.expected, byte),
        }
    }

    /// Number of packet bytes accumulated so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Move the accumulated packet out and reset the accumulator.
    /// Nothing accumulated is reported as no packet.
    pub fn take(&mut self) -> Option<Packet> {
        self.expected = None;
        let packet = core::mem::take(&mut self.buffer);
        (!packet.is_empty()).then_some(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_hex::assert_eq_hex;

    fn delimit(framing: Framing, bytes: &[u8]) -> (Option<usize>, Option<Packet>) {
        let mut delimiter = Delimiter::new(framing);
        for (index, byte) in bytes.iter().enumerate() {
            if delimiter.push(*byte).unwrap() {
                return (Some(index + 1), delimiter.take());
            }
        }
        (None, None)
    }

    #[test]
    fn frame_sizes() {
        assert_eq!(114, MAX_FRAME);
        assert_eq!(115, MAX_TX_FRAME);
    }

    #[test]
    fn max_headered_frame_fits_transmit_size() {
        let payload = [0x11; MAX_PAYLOAD];
        let mut buffer = [0; MAX_TX_FRAME];

        let written = Frame::Headered(Header::BROADCAST, &payload)
            .write(&mut buffer)
            .unwrap();

        assert_eq!(MAX_TX_FRAME, written);
        assert_eq_hex!(114, buffer[0]);
        assert_eq!(
            Err(WriteError::Capacity),
            Frame::Headered(Header::BROADCAST, &payload).write(&mut buffer[..MAX_FRAME])
        );
    }

    #[test]
    fn headered_frame_is_delimited_back_to_header_and_payload() {
        let payload = [0xAA, 0xBB];
        let header = Header {
            to: 2,
            from: 1,
            id: 5,
            flags: 0,
        };
        let mut buffer = [0; MAX_FRAME];
        let written = Frame::Headered(header, &payload).write(&mut buffer).unwrap();

        let (consumed, packet) = delimit(Framing::Headered, &buffer[..written]);

        assert_eq!(Some(written), consumed);
        assert_eq_hex!(&[0x02, 0x01, 0x05, 0x00, 0xAA, 0xBB], packet.unwrap().as_slice());
    }

    #[test]
    fn raw_frame_is_delimited_back_to_payload() {
        let payload: heapless::Vec<u8, MAX_PAYLOAD> = (1..=MAX_PAYLOAD as u8).collect();
        let mut buffer = [0; MAX_FRAME];
        let written = Frame::Raw(&payload).write(&mut buffer).unwrap();

        let (consumed, packet) = delimit(Framing::Raw, &buffer[..written]);

        assert_eq!(Some(MAX_PAYLOAD + 1), consumed);
        assert_eq_hex!(payload.as_slice(), packet.unwrap().as_slice());
    }

    #[test]
    fn raw_delimiting_stops_at_first_zero() {
        let (consumed, packet) = delimit(Framing::Raw, &[0x10, 0x20, 0x00, 0x30, 0x00]);

        assert_eq!(Some(3), consumed);
        assert_eq_hex!(&[0x10, 0x20], packet.unwrap().as_slice());
    }

    #[test]
    fn empty_accumulation_is_no_packet() {
        let mut delimiter = Delimiter::new(Framing::Raw);
        assert!(delimiter.push(0x00).unwrap());
        assert_eq!(None, delimiter.take());
    }

    #[test]
    fn take_resets_the_accumulator() {
        let mut delimiter = Delimiter::new(Framing::Headered);
        for byte in [0x05, 0x01, 0x02, 0x03, 0x04] {
            delimiter.push(byte).unwrap();
        }
        assert!(delimiter.push(0x55).unwrap());
        assert_eq!(5, delimiter.len());
        assert!(delimiter.take().is_some());
        assert!(delimiter.is_empty());

        // A new length byte is expected after take
        assert!(!delimiter.push(0x04).unwrap());
        assert_eq!(0, delimiter.len());
    }

    #[test]
    fn reset_switches_framing() {
        let mut delimiter = Delimiter::new(Framing::Headered);
        delimiter.push(0x20).unwrap();
        delimiter.push(0x01).unwrap();

        delimiter.reset(Framing::Raw);

        assert!(delimiter.is_empty());
        assert!(!delimiter.push(0x20).unwrap());
        assert!(delimiter.push(0x00).unwrap());
        assert_eq_hex!(&[0x20], delimiter.take().unwrap().as_slice());
    }
}
