//! # Cancellation Flag

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{BMResult, BytemergeError};

/// A shared, cloneable cancellation handle.
///
/// Clones observe the same flag; once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a new, un-cancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Fail with [`BytemergeError::Cancelled`] if cancellation was requested.
    pub fn check(&self) -> BMResult<()> {
        if self.is_cancelled() {
            Err(BytemergeError::Cancelled)
        } else {
            Ok(())
        }
    }
}
