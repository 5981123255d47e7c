//! Codec module - serialization/deserialization for message payloads.
//!
//! The framing engines are monomorphic over opaque byte buffers; converting
//! application values to and from those buffers is the job of a codec
//! implementing [`MessageCodec`]:
//!
//! - [`RawCodec`] - Pass-through for raw bytes (zero-copy where possible)
//! - [`Utf8Codec`] - Text as raw UTF-8 bytes, no quoting or framing
//! - [`JsonCodec`] - Structured fallback for any serde type
//! - [`MsgPackCodec`] - Compact structured alternative using `rmp-serde`
//!
//! # Design
//!
//! Codecs are stateless unit structs, so codec selection is a compile-time
//! choice and a codec value is free to construct and share. Implementations
//! must be pure: no hidden streaming state between calls.
//!
//! # Example
//!
//! ```
//! use hyperion_protocol::codec::{JsonCodec, MessageCodec, Utf8Codec};
//!
//! // Text passes through as its UTF-8 bytes.
//! let bytes = Utf8Codec.encode(&"hello".to_string()).unwrap();
//! assert_eq!(bytes, b"hello");
//!
//! // Structured data falls back to JSON.
//! let bytes = JsonCodec.encode(&vec![1, 2, 3]).unwrap();
//! let decoded: Vec<i32> = JsonCodec.decode(&bytes).unwrap();
//! assert_eq!(decoded, vec![1, 2, 3]);
//! ```

mod json;
mod msgpack;
mod raw;
mod text;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;
pub use raw::RawCodec;
pub use text::Utf8Codec;

use crate::error::Result;

/// Conversion between an application value type and opaque payload bytes.
///
/// Encoded buffers must fit in a 32-bit signed integer; the engines reject
/// anything larger before it reaches the wire.
pub trait MessageCodec<T> {
    /// Encode a value to payload bytes.
    fn encode(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode payload bytes back to a value.
    fn decode(&self, bytes: &[u8]) -> Result<T>;
}
