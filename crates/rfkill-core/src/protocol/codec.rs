//! Binary codec for rfkill event records.
//!
//! Wire format:
//! ```text
//! [index:4][type:1][op:1][soft:1][hard:1]
//! ```
//! Total record size: 8 bytes.  `index` uses the byte order of the machine the
//! kernel runs on, which is the machine we run on.
//!
//! # Why native byte order? (for beginners)
//!
//! Network protocols pick a fixed byte order so that two different machines
//! agree on it.  The rfkill device never leaves the machine: the kernel copies
//! its in-memory `struct rfkill_event` straight into our read buffer.  A
//! little-endian CPU therefore hands us the index least-significant byte
//! first, a big-endian CPU most-significant byte first, and we must decode it
//! the same way.
//!
//! The codec does not validate enumerated fields.  Unknown `type` or `op`
//! bytes decode to the `Unknown` variants and encode back verbatim; the kernel
//! is the final judge of what it accepts.

use thiserror::Error;

use crate::protocol::event::{Event, Kind, Operation, EVENT_SIZE};

/// Errors that can occur while decoding a record or parsing a field name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Fewer bytes than a full record were available.
    #[error("malformed record: need {needed} bytes, got {available}")]
    MalformedRecord { needed: usize, available: usize },

    /// A switch type or operation name was not recognised.
    #[error("unknown name: {0:?}")]
    UnknownName(String),
}

/// Byte order used for the multi-byte `index` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the machine this code was compiled for.
    pub const NATIVE: ByteOrder = if cfg!(target_endian = "big") {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };

    fn write_u32(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes `event` into its 8-byte wire form using the native byte order.
///
/// # Examples
///
/// ```rust
/// use rfkill_core::protocol::{decode, encode};
/// use rfkill_core::Event;
///
/// let ev = Event::change(3, true);
/// let bytes = encode(&ev);
/// assert_eq!(bytes.len(), 8);
/// assert_eq!(decode(&bytes).unwrap(), ev);
/// ```
pub fn encode(event: &Event) -> [u8; EVENT_SIZE] {
    encode_with(event, ByteOrder::NATIVE)
}

/// Decodes one record from the start of `bytes` using the native byte order.
///
/// Bytes past the first [`EVENT_SIZE`] are ignored; newer kernels append
/// extra fields to the record for readers that ask for them.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedRecord`] when `bytes` is shorter than a
/// full record.
pub fn decode(bytes: &[u8]) -> Result<Event, ProtocolError> {
    decode_with(bytes, ByteOrder::NATIVE)
}

/// Encodes `event` with an explicit byte order for the `index` field.
pub fn encode_with(event: &Event, order: ByteOrder) -> [u8; EVENT_SIZE] {
    let idx = order.write_u32(event.index);
    [
        idx[0],
        idx[1],
        idx[2],
        idx[3],
        u8::from(event.kind),
        u8::from(event.operation),
        event.soft,
        event.hard,
    ]
}

/// Decodes one record with an explicit byte order for the `index` field.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedRecord`] when `bytes` is shorter than a
/// full record.
pub fn decode_with(bytes: &[u8], order: ByteOrder) -> Result<Event, ProtocolError> {
    if bytes.len() < EVENT_SIZE {
        return Err(ProtocolError::MalformedRecord {
            needed: EVENT_SIZE,
            available: bytes.len(),
        });
    }

    Ok(Event {
        index: order.read_u32([bytes[0], bytes[1], bytes[2], bytes[3]]),
        kind: Kind::from(bytes[4]),
        operation: Operation::from(bytes[5]),
        soft: bytes[6],
        hard: bytes[7],
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
