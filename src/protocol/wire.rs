//! Wire constants and integer primitives.
//!
//! All multi-byte integers on the wire are Big Endian. The helpers here are
//! generic over tokio's `AsyncRead`/`AsyncWrite` so any reliable ordered
//! byte stream works: TCP, Unix sockets, or in-memory pipes in tests.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{HyperionError, Result};

/// Required value of the chunk header `Magic` field.
pub const PROTOCOL_MAGIC: &str = "TTS";

/// Maximum payload bytes per chunk (1 MiB).
pub const CHUNK_SIZE: usize = 1_048_576;

/// Maximum encoded chunk header size in bytes.
///
/// This bound is what makes lead-byte mode detection unambiguous: the most
/// significant byte of a 32-bit header length at most `65_536` is `0x00` or
/// `0x01`, never a mode discriminator.
pub const HEADER_LENGTH_LIMIT: usize = 65_536;

/// Flag bit 0: set on the final chunk of a packet.
pub const FLAG_END_OF_PACKET: u8 = 0b0000_0001;

/// Reserved flag bits (1-7), must be 0.
pub const FLAG_RESERVED_MASK: u8 = 0b1111_1110;

/// Lead byte selecting lightweight mode (`[0xFF][u16 BE len][payload]`).
pub const MODE_LIGHTWEIGHT: u8 = 0xFF;

/// Lead byte selecting direct mode (`[0xFE][i32 BE len][payload]`).
pub const MODE_DIRECT: u8 = 0xFE;

/// Payloads strictly below this many bytes go lightweight.
pub const LIGHTWEIGHT_MAX: usize = 1_024;

/// Payloads strictly below this many bytes (and at least
/// [`LIGHTWEIGHT_MAX`]) go direct; everything else is chunked.
pub const DIRECT_MAX: usize = 65_536;

/// Fill `buf` completely from the transport.
///
/// Short reads are looped internally; if the peer closes before the buffer
/// is full the result is [`HyperionError::EndOfStream`], never a short
/// success. Any other I/O failure surfaces as [`HyperionError::Io`].
pub async fn read_exact<R>(reader: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(HyperionError::EndOfStream)
        }
        Err(e) => Err(HyperionError::Io(e)),
    }
}

/// Read a single byte.
pub async fn read_u8<R>(reader: &mut R) -> Result<u8>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 1];
    read_exact(reader, &mut buf).await?;
    Ok(buf[0])
}

/// Read a Big Endian `u16`.
pub async fn read_u16_be<R>(reader: &mut R) -> Result<u16>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 2];
    read_exact(reader, &mut buf).await?;
    Ok(u16::from_be_bytes(buf))
}

/// Read a Big Endian `i32`.
pub async fn read_i32_be<R>(reader: &mut R) -> Result<i32>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf).await?;
    Ok(i32::from_be_bytes(buf))
}

/// Write a Big Endian `u16`.
pub async fn write_u16_be<W>(writer: &mut W, value: u16) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&value.to_be_bytes()).await?;
    Ok(())
}

/// Write a Big Endian `i32`.
pub async fn write_i32_be<W>(writer: &mut W, value: i32) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&value.to_be_bytes()).await?;
    Ok(())
}
