//! Cooperative cancellation for configuration loads.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{StratumError, StratumResult};

/// Shared flag observed by long-running loads.
///
/// Clones share the same flag, so a token handed to a loader can be
/// cancelled from another thread.
///
/// ```
/// use stratum_config::CancellationToken;
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn check(&self) -> StratumResult<()> {
        if self.is_cancelled() {
            return Err(StratumError::Cancelled);
        }
        Ok(())
    }
}
