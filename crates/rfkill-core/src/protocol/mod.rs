//! Protocol module containing the event record types and the binary codec.

pub mod codec;
pub mod event;

pub use codec::{decode, decode_with, encode, encode_with, ByteOrder, ProtocolError};
pub use event::*;
