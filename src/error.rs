//! Error types for hyperion-protocol.

use thiserror::Error;

/// Main error type for all Hyperion operations.
///
/// Every failure the framing engines raise is exactly one of these kinds.
/// Lower-level transport and serializer errors are wrapped once, preserving
/// the cause, so callers see a single protocol-defined kind per failure.
#[derive(Debug, Error)]
pub enum HyperionError {
    /// A caller-supplied argument is unusable (e.g. a message too large to
    /// frame).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Cancellation was observed at a checkpoint. The transport is left in
    /// an indeterminate state; the caller should close it.
    #[error("operation cancelled")]
    Cancelled,

    /// The peer closed the stream in the middle of a frame. A short read is
    /// always this, never a short success.
    #[error("end of stream")]
    EndOfStream,

    /// A framing invariant was violated (bad magic, illegal length,
    /// out-of-order chunk, flag/position disagreement, malformed header).
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The payload serializer rejected encode or decode.
    #[error("serializer error: {0}")]
    Serializer(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Underlying transport I/O error other than end-of-stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HyperionError {
    /// Wrap a serializer failure, preserving it as the cause.
    pub fn serializer<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        HyperionError::Serializer(err.into())
    }

    /// Check whether this error is a cancellation.
    ///
    /// Callers often want distinct behavior for cancellation (quiet
    /// shutdown) versus everything else (log and close).
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HyperionError::Cancelled)
    }
}

/// Result type alias using HyperionError.
pub type Result<T> = std::result::Result<T, HyperionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: HyperionError = io.into();
        assert!(matches!(err, HyperionError::Io(_)));
    }

    #[test]
    fn test_serializer_wraps_cause() {
        let cause = serde_json::from_slice::<i32>(b"not json").unwrap_err();
        let err = HyperionError::serializer(cause);
        assert!(matches!(err, HyperionError::Serializer(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_cancelled() {
        assert!(HyperionError::Cancelled.is_cancelled());
        assert!(!HyperionError::EndOfStream.is_cancelled());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(HyperionError::EndOfStream.to_string(), "end of stream");
        assert_eq!(
            HyperionError::Protocol("Invalid protocol magic".into()).to_string(),
            "protocol violation: Invalid protocol magic"
        );
    }
}
