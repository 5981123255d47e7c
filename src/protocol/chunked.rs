//! Chunked framing engine.
//!
//! Splits a message into chunks of at most [`CHUNK_SIZE`] payload bytes and
//! frames each as:
//!
//! ```text
//! +----------------------+---------------------+------------------------+
//! | i32 BE header_length | JSON header bytes   | payload (DataLength B) |
//! +----------------------+---------------------+------------------------+
//! ```
//!
//! The receiver walks the frames with a strict state machine
//! (`AwaitHeaderLen -> AwaitHeader -> AwaitPayload`, looping until the
//! packet is complete) and reassembles the payload. Any validation failure
//! or mid-frame EOF is terminal: the engine does not resynchronize and
//! never consumes bytes past the offending frame.
//!
//! The transport is exclusively owned by the engine for the duration of one
//! packet; interleaving two sends on the same transport produces undefined
//! framing.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use super::header::{decode_header, encode_header, ChunkHeader, PacketId};
use super::wire::{self, CHUNK_SIZE, HEADER_LENGTH_LIMIT};
use crate::cancel::{self, CancelToken};
use crate::codec::MessageCodec;
use crate::error::{HyperionError, Result};
use crate::stats::EngineStats;

/// Framing engine for the chunked wire mode.
///
/// One engine instance serves one side of one connection; it owns the
/// transient state of a single in-flight packet and its traffic counters.
///
/// # Example
///
/// ```ignore
/// use hyperion_protocol::{ChunkedEngine, codec::Utf8Codec};
///
/// let mut engine = ChunkedEngine::new();
/// engine.send(&Utf8Codec, &message, &mut stream, None).await?;
/// let reply: String = engine.receive(&Utf8Codec, &mut stream, None).await?;
/// ```
#[derive(Debug, Default)]
pub struct ChunkedEngine {
    pub(crate) stats: EngineStats,
}

impl ChunkedEngine {
    /// Create a new engine with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Traffic counters accumulated by this engine.
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Serialize `value` with `codec` and send it as one chunked packet.
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

    /// Receive one chunked packet and decode it with `codec`.
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

    /// Send an already-serialized payload as one chunked packet.
    ///
    /// The cancellation token is checked before each chunk; the transport
    /// is flushed once, after the final chunk.
    pub async fn send_bytes<W>(
        &mut self,
        payload: &[u8],
        transport: &mut W,
        cancel: Option<&CancelToken>,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        if payload.len() > i32::MAX as usize {
            return Err(HyperionError::InvalidArgument(format!(
                "message of {} bytes does not fit a 32-bit length",
                payload.len()
            )));
        }

        let total_chunks = (payload.len().div_ceil(CHUNK_SIZE)).max(1) as i32;
        let packet_id = Uuid::new_v4();

        if total_chunks > 1 {
            tracing::debug!(%packet_id, total_chunks, "splitting message into chunks");
        }

        for chunk_number in 0..total_chunks {
            cancel::check(cancel)?;

            let offset = chunk_number as usize * CHUNK_SIZE;
            let size = CHUNK_SIZE.min(payload.len() - offset);

            let header = ChunkHeader::new(packet_id, chunk_number, total_chunks, size as i32);
            let header_bytes = encode_header(&header)?;

            wire::write_i32_be(transport, header_bytes.len() as i32).await?;
            transport.write_all(&header_bytes).await?;
            transport.write_all(&payload[offset..offset + size]).await?;

            self.stats.chunks_sent += 1;
        }

        transport.flush().await?;
        self.stats.record_message_sent(payload.len());
        Ok(())
    }

    /// Receive one chunked packet, returning the reassembled payload.
    ///
    /// The cancellation token is checked before each header-length read.
    pub async fn receive_bytes<R>(
        &mut self,
        transport: &mut R,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        self.read_packet(transport, None, cancel).await
    }

    /// Receive a chunked packet whose first header length has already been
    /// consumed (the smart dispatcher's entry point).
    pub(crate) async fn receive_bytes_with_first_len<R>(
        &mut self,
        transport: &mut R,
        first_header_len: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        self.read_packet(transport, Some(first_header_len), cancel)
            .await
    }

    async fn read_packet<R>(
        &mut self,
        transport: &mut R,
        mut pending_header_len: Option<usize>,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let mut message: Vec<u8> = Vec::new();
        let mut expected: Option<(PacketId, i32)> = None;
        let mut received: i32 = 0;

        loop {
            // AwaitHeaderLen (skipped for a length the dispatcher already read).
            let header_len = match pending_header_len.take() {
                Some(len) => len,
                None => {
                    cancel::check(cancel)?;
                    read_header_len(transport).await?
                }
            };

            // AwaitHeader
            let mut header_bytes = vec![0u8; header_len];
            wire::read_exact(transport, &mut header_bytes).await?;
            let header = decode_header(&header_bytes)?;

            match expected {
                None => expected = Some((header.packet_id, header.total_chunks)),
                Some((packet_id, total_chunks)) => {
                    if header.packet_id != packet_id {
                        return Err(HyperionError::Protocol(
                            "PacketId changed mid-packet".to_string(),
                        ));
                    }
                    if header.total_chunks != total_chunks {
                        return Err(HyperionError::Protocol(
                            "TotalChunks changed mid-packet".to_string(),
                        ));
                    }
                }
            }

            if header.chunk_number != received {
                return Err(HyperionError::Protocol(
                    "Chunk received out of order".to_string(),
                ));
            }

            // AwaitPayload
            if header.data_length > 0 {
                let start = message.len();
                message.resize(start + header.data_length as usize, 0);
                wire::read_exact(transport, &mut message[start..]).await?;
            }

            received += 1;
            self.stats.chunks_received += 1;

            if received == header.total_chunks {
                break;
            }
        }

        self.stats.record_message_received(message.len());
        Ok(message)
    }
}

/// Read and bounds-check a chunk's header length prefix.
pub(crate) async fn read_header_len<R>(transport: &mut R) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    let len = wire::read_i32_be(transport).await?;
    validate_header_len(len)
}

/// Enforce `1 <= header_length <= HEADER_LENGTH_LIMIT` before allocating.
pub(crate) fn validate_header_len(len: i32) -> Result<usize> {
    if len < 1 || len as usize > HEADER_LENGTH_LIMIT {
        return Err(HyperionError::Protocol(format!(
            "Header length {len} out of bounds"
        )));
    }
    Ok(len as usize)
}
