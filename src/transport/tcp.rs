//! TCP listener and stream wrappers.
//!
//! Hyperion treats the transport as any reliable, ordered, full-duplex
//! byte stream; these types are the TCP instantiation. `TCP_NODELAY` is
//! enabled on every stream because the engines already coalesce writes
//! themselves (one flush per packet).
//!
//! # Example
//!
//! ```ignore
//! use hyperion_protocol::transport::{TransportListener, TransportStream};
//!
//! let listener = TransportListener::bind("127.0.0.1:0").await?;
//! let addr = listener.local_addr()?;
//!
//! let client = TransportStream::connect(addr).await?;
//! let (server, _peer) = listener.accept().await?;
//! ```

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::error::Result;

/// TCP listener producing [`TransportStream`]s.
pub struct TransportListener {
    listener: TcpListener,
}

impl TransportListener {
    /// Bind to a local address.
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    /// Accept one connection.
    pub async fn accept(&self) -> Result<(TransportStream, SocketAddr)> {
        let (stream, peer) = self.listener.accept().await?;
        Ok((TransportStream::from_tcp(stream)?, peer))
    }

    /// The locally bound address (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

/// Connected TCP byte stream.
pub struct TransportStream {
    stream: TcpStream,
}

impl TransportStream {
    /// Connect to a remote address.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Self::from_tcp(stream)
    }

    fn from_tcp(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// The peer's address.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    /// Split into independently owned read and write halves, for running
    /// send and receive concurrently on one connection.
    pub fn into_split(self) -> (OwnedReadHalf, OwnedWriteHalf) {
        self.stream.into_split()
    }

    /// Get a reference to the underlying stream.
    pub fn inner(&self) -> &TcpStream {
        &self.stream
    }
}

impl AsyncRead for TransportStream {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::pin::Pin::new(&mut self.stream).poll_read(cx, buf)
    }
}

impl AsyncWrite for TransportStream {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> std::task::Poll<std::io::Result<usize>> {
        std::pin::Pin::new(&mut self.stream).poll_write(cx, buf)
    }

    fn poll_flush(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::pin::Pin::new(&mut self.stream).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::pin::Pin::new(&mut self.stream).poll_shutdown(cx)
    }
}
