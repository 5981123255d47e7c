//! Transport module - TCP endpoints for the framing engines.
//!
//! The engines themselves only require `AsyncRead`/`AsyncWrite`; this
//! module provides the TCP listener and stream a typical deployment plugs
//! into them.

mod tcp;

pub use tcp::{TransportListener, TransportStream};
