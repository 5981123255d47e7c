//! Cooperative cancellation for in-flight send/receive operations.
//!
//! The engines poll the token at frame boundaries: before each chunk on
//! send, and before each header-length read on receive. Cancellation after
//! the final byte has been written but before the flush completes may still
//! produce a successfully received packet on the peer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{HyperionError, Result};

/// Cloneable cancellation handle.
///
/// All clones share one flag; setting it from any clone is observed by the
/// engine at its next checkpoint.
///
/// # Example
///
/// ```
/// use hyperion_protocol::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
///
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Surface `Cancelled` if the optional token is set.
#[inline]
pub(crate) fn check(cancel: Option<&CancelToken>) -> Result<()> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(HyperionError::Cancelled),
        _ => Ok(()),
    }
}
