//! Protocol module - wire format, chunk framing, and adaptive dispatch.
//!
//! This module implements the binary protocol:
//! - Big Endian wire primitives and protocol constants
//! - JSON chunk header encoding/decoding with invariant validation
//! - The chunked framing engine (split, emit, validate, reassemble)
//! - The smart dispatcher (lightweight / direct / chunked by payload size)

mod chunked;
mod header;
mod smart;
pub mod wire;

pub use chunked::ChunkedEngine;
pub use header::{decode_header, encode_header, ChunkHeader, PacketId};
pub use smart::SmartEngine;
pub use wire::{
    CHUNK_SIZE, DIRECT_MAX, FLAG_END_OF_PACKET, FLAG_RESERVED_MASK, HEADER_LENGTH_LIMIT,
    LIGHTWEIGHT_MAX, MODE_DIRECT, MODE_LIGHTWEIGHT, PROTOCOL_MAGIC,
};
