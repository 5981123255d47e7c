//! Raw codec - pass-through for binary data.
//!
//! Used when the payload is already serialized or is raw bytes. The codec
//! never fails: every byte sequence is a valid value.
//!
//! # Example
//!
//! ```
//! use hyperion_protocol::codec::{MessageCodec, RawCodec};
//!
//! let data: Vec<u8> = vec![0x01, 0xFF, 0x00];
//! let encoded = RawCodec.encode(&data).unwrap();
//! assert_eq!(encoded, data);
//! let decoded: Vec<u8> = RawCodec.decode(&encoded).unwrap();
//! assert_eq!(decoded, data);
//! ```

use bytes::Bytes;

use super::MessageCodec;
use crate::error::Result;

/// Codec that passes bytes through without transformation.
pub struct RawCodec;

impl MessageCodec<Vec<u8>> for RawCodec {
    #[inline]
    fn encode(&self, value: &Vec<u8>) -> Result<Vec<u8>> {
        Ok(value.clone())
    }

    #[inline]
    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(bytes.to_vec())
    }
}

impl MessageCodec<Bytes> for RawCodec {
    #[inline]
    fn encode(&self, value: &Bytes) -> Result<Vec<u8>> {
        Ok(value.to_vec())
    }

    #[inline]
    fn decode(&self, bytes: &[u8]) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}
