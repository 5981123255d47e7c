//! Adaptive ("smart") dispatcher.
//!
//! Picks one of three wire encodings by serialized payload size:
//!
//! ```text
//! len < 1024:    [0xFF][u16 BE len][payload]            lightweight, 3 B overhead
//! len < 65536:   [0xFE][i32 BE len][payload]            direct, 5 B overhead
//! otherwise:     chunked mode (see protocol::chunked)
//! ```
//!
//! On receive the mode is detected from the single lead byte: `0xFF` and
//! `0xFE` select the small-message paths, and any other value is the most
//! significant byte of a chunked header length. [`HEADER_LENGTH_LIMIT`]
//! caps that byte at `0x01`, so the three encodings never collide and no
//! look-ahead buffering is needed.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::chunked::{validate_header_len, ChunkedEngine};
use super::wire::{self, DIRECT_MAX, LIGHTWEIGHT_MAX, MODE_DIRECT, MODE_LIGHTWEIGHT};
use crate::cancel::{self, CancelToken};
use crate::codec::MessageCodec;
use crate::error::{HyperionError, Result};
use crate::stats::EngineStats;

/// Framing engine with size-adaptive mode selection.
///
/// A thin wrapper over [`ChunkedEngine`]: the chunked path is bit-compatible
/// with the plain engine's wire format, so a smart sender interoperates with
/// a plain chunked receiver for payloads of at least [`DIRECT_MAX`] bytes.
///
/// # Example
///
/// ```ignore
/// use hyperion_protocol::{SmartEngine, codec::JsonCodec};
///
/// let mut engine = SmartEngine::new();
/// engine.send(&JsonCodec, &request, &mut stream, None).await?;
/// let reply: Reply = engine.receive(&JsonCodec, &mut stream, None).await?;
/// ```
#[derive(Debug, Default)]
pub struct SmartEngine {
    chunked: ChunkedEngine,
}

impl SmartEngine {
    /// Create a new engine with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Traffic counters accumulated by this engine, across all modes.
    pub fn stats(&self) -> &EngineStats {
        self.chunked.stats()
    }

    /// Serialize `value` with `codec` and send it in the cheapest mode its
    /// size allows.
    pub async fn send<T, C, W>(
        &mut self,
        codec: &C,
        value: &T,
        transport: &mut W,
        cancel: Option<&CancelToken>,
    ) -> Result<()>
    where
        C: MessageCodec<T>,
        W: AsyncWrite + Unpin,
    {
        let payload = codec.encode(value)?;
        self.send_bytes(&payload, transport, cancel).await
    }

    /// Receive one packet in whatever mode the peer chose and decode it
    /// with `codec`.
    pub async fn receive<T, C, R>(
        &mut self,
        codec: &C,
        transport: &mut R,
        cancel: Option<&CancelToken>,
    ) -> Result<T>
    where
        C: MessageCodec<T>,
        R: AsyncRead + Unpin,
    {
        let payload = self.receive_bytes(transport, cancel).await?;
        codec.decode(&payload)
    }

    /// Send an already-serialized payload, dispatching on its size.
    pub async fn send_bytes<W>(
        &mut self,
        payload: &[u8],
        transport: &mut W,
        cancel: Option<&CancelToken>,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        cancel::check(cancel)?;

        match payload.len() {
            len if len < LIGHTWEIGHT_MAX => {
                tracing::trace!(len, "sending lightweight frame");
                transport.write_all(&[MODE_LIGHTWEIGHT]).await?;
                wire::write_u16_be(transport, len as u16).await?;
                transport.write_all(payload).await?;
            }
            len if len < DIRECT_MAX => {
                tracing::trace!(len, "sending direct frame");
                transport.write_all(&[MODE_DIRECT]).await?;
                wire::write_i32_be(transport, len as i32).await?;
                transport.write_all(payload).await?;
            }
            _ => {
                // Chunked path flushes and records stats itself.
                return self.chunked.send_bytes(payload, transport, cancel).await;
            }
        }

        transport.flush().await?;
        self.chunked.stats.record_message_sent(payload.len());
        Ok(())
    }

    /// Receive an already-serialized payload, detecting the mode from the
    /// lead byte.
    pub async fn receive_bytes<R>(
        &mut self,
        transport: &mut R,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        cancel::check(cancel)?;

        let mode = wire::read_u8(transport).await?;
        match mode {
            MODE_LIGHTWEIGHT => {
                let len = wire::read_u16_be(transport).await? as usize;
                let mut payload = vec![0u8; len];
                wire::read_exact(transport, &mut payload).await?;
                self.chunked.stats.record_message_received(len);
                Ok(payload)
            }
            MODE_DIRECT => {
                let len = wire::read_i32_be(transport).await?;
                if len < 0 || len as usize >= DIRECT_MAX {
                    return Err(HyperionError::Protocol(format!(
                        "Direct payload length {len} out of bounds"
                    )));
                }
                let mut payload = vec![0u8; len as usize];
                wire::read_exact(transport, &mut payload).await?;
                self.chunked.stats.record_message_received(len as usize);
                Ok(payload)
            }
            first => {
                // Lead byte is the high byte of a chunked header length;
                // read the remaining three to complete it.
                let mut rest = [0u8; 3];
                wire::read_exact(transport, &mut rest).await?;
                let header_len =
                    i32::from_be_bytes([first, rest[0], rest[1], rest[2]]);
                let header_len = validate_header_len(header_len)?;
                self.chunked
                    .receive_bytes_with_first_len(transport, header_len, cancel)
                    .await
            }
        }
    }
}
