//! Chunk header codec.
//!
//! In chunked mode every chunk is preceded by a JSON-encoded header (UTF-8,
//! PascalCase field names fixed by the wire format):
//!
//! ```json
//! {"Magic":"TTS","PacketId":"…","ChunkNumber":0,"TotalChunks":2,
//!  "DataLength":1048576,"Flags":0}
//! ```
//!
//! The codec is pure: it never touches the transport. Unknown JSON fields
//! are tolerated on decode (forward compatibility); missing fields and any
//! invariant violation are rejected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::wire::{
    CHUNK_SIZE, FLAG_END_OF_PACKET, FLAG_RESERVED_MASK, HEADER_LENGTH_LIMIT, PROTOCOL_MAGIC,
};
use crate::error::{HyperionError, Result};

/// 128-bit packet identity, shared by all chunks of one packet.
///
/// Generated fresh at send time, consumed at receive completion, never
/// reused or stored.
pub type PacketId = Uuid;

/// Per-chunk header for the chunked wire mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChunkHeader {
    /// Protocol tag, always `"TTS"`.
    pub magic: String,
    /// Identity of the packet this chunk belongs to.
    pub packet_id: PacketId,
    /// Position of this chunk, `0..TotalChunks`.
    pub chunk_number: i32,
    /// Number of chunks in the packet, identical across all of them.
    pub total_chunks: i32,
    /// Payload bytes following this header, at most [`CHUNK_SIZE`].
    pub data_length: i32,
    /// Bit 0 marks the final chunk; bits 1-7 are reserved and must be 0.
    pub flags: u8,
}

impl ChunkHeader {
    /// Build the header for chunk `chunk_number` of a packet.
    ///
    /// Sets the magic and derives the end-of-packet flag from the chunk
    /// position.
    pub fn new(
        packet_id: PacketId,
        chunk_number: i32,
        total_chunks: i32,
        data_length: i32,
    ) -> Self {
        let flags = if chunk_number == total_chunks - 1 {
            FLAG_END_OF_PACKET
        } else {
            0
        };
        Self {
            magic: PROTOCOL_MAGIC.to_string(),
            packet_id,
            chunk_number,
            total_chunks,
            data_length,
            flags,
        }
    }

    /// Check the end-of-packet flag.
    #[inline]
    pub fn is_end_of_packet(&self) -> bool {
        self.flags & FLAG_END_OF_PACKET != 0
    }

    /// Validate every invariant that can be checked against the header
    /// alone (cross-chunk identity and ordering are the receive loop's
    /// job).
    pub fn validate(&self) -> Result<()> {
        if self.magic != PROTOCOL_MAGIC {
            return Err(HyperionError::Protocol(
                "Invalid protocol magic".to_string(),
            ));
        }

        if self.total_chunks <= 0 {
            return Err(HyperionError::Protocol(format!(
                "TotalChunks must be positive, got {}",
                self.total_chunks
            )));
        }

        if self.chunk_number < 0 || self.chunk_number >= self.total_chunks {
            return Err(HyperionError::Protocol(format!(
                "ChunkNumber {} out of range for {} chunks",
                self.chunk_number, self.total_chunks
            )));
        }

        if self.data_length < 0 || self.data_length as usize > CHUNK_SIZE {
            return Err(HyperionError::Protocol(format!(
                "DataLength {} out of range",
                self.data_length
            )));
        }

        if self.flags & FLAG_RESERVED_MASK != 0 {
            return Err(HyperionError::Protocol(
                "Reserved flag bits must be 0".to_string(),
            ));
        }

        let is_last = self.chunk_number == self.total_chunks - 1;
        if self.is_end_of_packet() != is_last {
            return Err(HyperionError::Protocol(
                "End-of-packet flag does not match chunk position".to_string(),
            ));
        }

        Ok(())
    }
}

/// Encode a header to its JSON wire bytes, enforcing
/// [`HEADER_LENGTH_LIMIT`].
pub fn encode_header(header: &ChunkHeader) -> Result<Vec<u8>> {
    let bytes = serde_json::to_vec(header)
        .map_err(|e| HyperionError::Protocol(format!("Header encoding failed: {e}")))?;

    if bytes.is_empty() || bytes.len() > HEADER_LENGTH_LIMIT {
        return Err(HyperionError::Protocol(format!(
            "Encoded header length {} out of bounds",
            bytes.len()
        )));
    }

    Ok(bytes)
}

/// Decode and validate a header from its JSON wire bytes.
pub fn decode_header(bytes: &[u8]) -> Result<ChunkHeader> {
    let header: ChunkHeader = serde_json::from_slice(bytes)
        .map_err(|e| HyperionError::Protocol(format!("Malformed chunk header: {e}")))?;
    header.validate()?;
    Ok(header)
}
