//! JSON codec - structured fallback for arbitrary serde types.
//!
//! # Example
//!
//! ```
//! use hyperion_protocol::codec::{JsonCodec, MessageCodec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message {
//!     id: u32,
//!     content: String,
//! }
//!
//! let msg = Message { id: 42, content: "hello".to_string() };
//! let encoded = JsonCodec.encode(&msg).unwrap();
//! let decoded: Message = JsonCodec.decode(&encoded).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::MessageCodec;
use crate::error::{HyperionError, Result};

/// Structured codec using `serde_json`.
pub struct JsonCodec;

impl<T> MessageCodec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(HyperionError::serializer)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(HyperionError::serializer)
    }
}
