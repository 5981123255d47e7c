//! MsgPack codec using `rmp-serde`.
//!
//! A compact structured alternative to [`JsonCodec`](super::JsonCodec) for
//! payloads where wire size matters. Uses `to_vec_named` so structs are
//! encoded as maps (with field names) rather than positional arrays, which
//! keeps the encoding self-describing across peers.
//!
//! # Example
//!
//! ```
//! use hyperion_protocol::codec::{MessageCodec, MsgPackCodec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message {
//!     id: u32,
//!     content: String,
//! }
//!
//! let msg = Message { id: 42, content: "hello".to_string() };
//! let encoded = MsgPackCodec.encode(&msg).unwrap();
//! let decoded: Message = MsgPackCodec.decode(&encoded).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::MessageCodec;
use crate::error::{HyperionError, Result};

/// Structured codec using MessagePack (`rmp-serde`, struct-as-map format).
pub struct MsgPackCodec;

impl<T> MessageCodec<T> for MsgPackCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(value).map_err(HyperionError::serializer)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T> {
        rmp_serde::from_slice(bytes).map_err(HyperionError::serializer)
    }
}
