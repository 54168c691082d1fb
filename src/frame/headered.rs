//! RadioHead style framing.
//!
//! ```text
//! LEN TO FROM ID FLAGS PAYLOAD...
//! ```
//!
//! `LEN` counts the four header bytes following it and the payload, but not itself.
//! There is no terminator.

use bytes::BufMut;

use super::{Packet, ReadError, WriteError, MAX_FRAME};

/// Length byte and the four header fields
pub const HEADER_LENGTH: usize = 5;
/// Header fields following the length byte
pub const FIELDS_LENGTH: usize = HEADER_LENGTH - 1;

const MIN_LENGTH: usize = FIELDS_LENGTH;
const MAX_LENGTH: usize = MAX_FRAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    pub to: u8,
    pub from: u8,
    pub id: u8,
    pub flags: u8,
}

impl Header {
    /// Sent to and from every node
    pub const BROADCAST: Self = Self {
        to: 0xFF,
        from: 0xFF,
        id: 0x00,
        flags: 0x00,
    };

    /// Split a received headered packet into its header and payload
    pub fn split(packet: &[u8]) -> Option<(Header, &[u8])> {
        if packet.len() < FIELDS_LENGTH {
            return None;
        }
        let (fields, payload) = packet.split_at(FIELDS_LENGTH);
        let header = Header {
            to: fields[0],
            from: fields[1],
            id: fields[2],
            flags: fields[3],
        };
        Some((header, payload))
    }
}

pub fn write(buffer: &mut [u8], header: &Header, payload: &[u8]) -> Result<usize, WriteError> {
    let length = HEADER_LENGTH + payload.len();
    if buffer.len() < length || length - 1 > u8::MAX as usize {
        return Err(WriteError::Capacity);
    }

    let mut writer = &mut buffer[..];
    writer.put_u8((length - 1) as u8);
    writer.put_u8(header.to);
    writer.put_u8(header.from);
    writer.put_u8(header.id);
    writer.put_u8(header.flags);
    writer.put_slice(payload);

    Ok(length)
}

/// Get the number of bytes following the length byte
pub const fn get_frame_length(length: u8) -> Result<usize, ReadError> {
    let length = length as usize;
    if length < MIN_LENGTH || length > MAX_LENGTH {
        return Err(ReadError::InvalidLength(length as u8));
    }
    Ok(length)
}

pub(super) fn push(
    buffer: &mut Packet,
    expected: &mut Option<usize>,
    byte: u8,
) -> Result<bool, ReadError> {
    let Some(length) = *expected else {
        *expected = Some(get_frame_length(byte)?);
        return Ok(false);
    };

    buffer.push(byte).map_err(|_| ReadError::Oversized)?;
    Ok(buffer.len() == length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_hex::assert_eq_hex;

    #[test]
    fn can_write() {
        let header = Header {
            to: 2,
            from: 1,
            id: 5,
            flags: 0,
        };
        let mut buffer = [0; MAX_FRAME];

        let written = write(&mut buffer, &header, &[0xAA, 0xBB]).unwrap();

        assert_eq_hex!(&[0x06, 0x02, 0x01, 0x05, 0x00, 0xAA, 0xBB], &buffer[..written]);
    }

    #[test]
    fn can_write_broadcast_with_empty_payload() {
        let mut buffer = [0; HEADER_LENGTH];

        let written = write(&mut buffer, &Header::BROADCAST, &[]).unwrap();

        assert_eq_hex!(&[0x04, 0xFF, 0xFF, 0x00, 0x00], &buffer[..written]);
    }

    #[test]
    fn write_checks_capacity() {
        let mut buffer = [0; 6];
        assert_eq!(
            Err(WriteError::Capacity),
            write(&mut buffer, &Header::default(), &[0x01, 0x02])
        );
    }

    #[test]
    fn can_get_frame_length() {
        assert_eq!(Err(ReadError::InvalidLength(0)), get_frame_length(0));
        assert_eq!(Err(ReadError::InvalidLength(3)), get_frame_length(3));
        assert_eq!(Ok(4), get_frame_length(4));
        assert_eq!(Ok(114), get_frame_length(114));
        assert_eq!(Err(ReadError::InvalidLength(115)), get_frame_length(115));
    }

    #[test]
    fn push_excludes_length_byte() {
        let mut buffer = Packet::new();
        let mut expected = None;

        assert_eq!(Ok(false), push(&mut buffer, &mut expected, 0x05));
        assert_eq!(Some(5), expected);
        for byte in [0x01, 0x02, 0x03, 0x04] {
            assert_eq!(Ok(false), push(&mut buffer, &mut expected, byte));
        }
        assert_eq!(Ok(true), push(&mut buffer, &mut expected, 0x99));
        assert_eq_hex!(&[0x01, 0x02, 0x03, 0x04, 0x99], buffer.as_slice());
    }

    #[test]
    fn push_rejects_invalid_length() {
        let mut buffer = Packet::new();
        let mut expected = None;

        assert_eq!(
            Err(ReadError::InvalidLength(2)),
            push(&mut buffer, &mut expected, 0x02)
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn can_split() {
        let (header, payload) = Header::split(&[0x02, 0x01, 0x05, 0x80, 0xAA]).unwrap();
        assert_eq!(
            Header {
                to: 2,
                from: 1,
                id: 5,
                flags: 0x80
            },
            header
        );
        assert_eq_hex!(&[0xAA], payload);

        assert_eq!(None, Header::split(&[0x02, 0x01, 0x05]));
    }
}
