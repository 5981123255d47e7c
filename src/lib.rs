//! # hyperion-protocol
//!
//! Length-framed, chunked message protocol over any reliable, ordered,
//! full-duplex byte stream (TCP, Unix sockets, in-memory pipes).
//!
//! A logical message is serialized by a pluggable codec into an opaque byte
//! buffer, framed for transmission, and reassembled whole on the receiver;
//! there is no partial delivery. Two engines are provided:
//!
//! - [`ChunkedEngine`] always uses the chunked wire mode: each chunk of at
//!   most 1 MiB is preceded by a length-prefixed JSON header carrying the
//!   packet identity, chunk position, and payload length.
//! - [`SmartEngine`] picks the cheapest of three encodings by payload size
//!   and auto-detects the peer's choice from a single lead byte:
//!
//! ```text
//! ┌──────┬─────────────┬───────────────────┐
//! │ 0xFF │ u16 BE len  │ payload (< 1 KiB) │   lightweight
//! ├──────┼─────────────┼───────────────────┤
//! │ 0xFE │ i32 BE len  │ payload (< 64 KiB)│   direct
//! ├──────┴─────────────┴───────────────────┤
//! │ [i32 BE header_len][JSON hdr][payload] │   chunked, repeated per chunk
//! └────────────────────────────────────────┘
//! ```
//!
//! All integers are Big Endian. The chunked header length never exceeds
//! 65 536, so its high byte can never be `0xFF` or `0xFE` and the three
//! modes are unambiguous from the first byte on the wire.
//!
//! ## Example
//!
//! ```ignore
//! use hyperion_protocol::{codec::Utf8Codec, SmartEngine};
//! use hyperion_protocol::transport::TransportStream;
//!
//! #[tokio::main]
//! async fn main() -> hyperion_protocol::Result<()> {
//!     let mut stream = TransportStream::connect("127.0.0.1:9000").await?;
//!     let mut engine = SmartEngine::new();
//!
//!     engine.send(&Utf8Codec, &"Hello HyperionProtocol!".to_string(), &mut stream, None).await?;
//!     let reply: String = engine.receive(&Utf8Codec, &mut stream, None).await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod protocol;
pub mod transport;

mod cancel;
mod stats;

pub use cancel::CancelToken;
pub use error::{HyperionError, Result};
pub use protocol::{ChunkedEngine, SmartEngine};
pub use stats::EngineStats;
