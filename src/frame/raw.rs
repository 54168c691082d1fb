//! Zero terminated framing.
//!
//! The payload is sent as is followed by a single `0x00`.
//! No escaping is performed, so a payload containing `0x00` is cut short by the receiver.

use bytes::BufMut;

use super::{Packet, ReadError, WriteError, MAX_PAYLOAD};

pub const TERMINATOR: u8 = 0x00;

pub fn write(buffer: &mut [u8], payload: &[u8]) -> Result<usize, WriteError> {
    let length = payload.len() + 1;
    if buffer.len() < length {
        return Err(WriteError::Capacity);
    }

    let mut writer = &mut buffer[..];
    writer.put_slice(payload);
    writer.put_u8(TERMINATOR);

    Ok(length)
}

pub(super) fn push(buffer: &mut Packet, byte: u8) -> Result<bool, ReadError> {
    if byte == TERMINATOR {
        return Ok(true);
    }
    if buffer.len() >= MAX_PAYLOAD {
        return Err(ReadError::Oversized);
    }
    buffer.push(byte).map_err(|_| ReadError::Oversized)?;
    Ok(false)
}
