//! UTF-8 text codec.
//!
//! Strings travel as their raw UTF-8 bytes with no quoting or framing, so a
//! 23-character ASCII message occupies exactly 23 payload bytes on the
//! wire. Decode validates UTF-8 and rejects anything else.
//!
//! # Example
//!
//! ```
//! use hyperion_protocol::codec::{MessageCodec, Utf8Codec};
//!
//! let encoded = Utf8Codec.encode(&"héllo".to_string()).unwrap();
//! assert_eq!(encoded, "héllo".as_bytes());
//!
//! let decoded = Utf8Codec.decode(&encoded).unwrap();
//! assert_eq!(decoded, "héllo");
//! ```

use super::MessageCodec;
use crate::error::{HyperionError, Result};

/// Codec carrying `String` values as raw UTF-8 bytes.
pub struct Utf8Codec;

impl MessageCodec<String> for Utf8Codec {
    #[inline]
    fn encode(&self, value: &String) -> Result<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(HyperionError::serializer)
    }
}
