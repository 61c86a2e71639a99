use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

/// Owned cooperative cancellation handle.
///
/// Clones share the same flag. Cancellation happens at most once; waiters
/// blocked in [`CancelToken::wait_until`] wake immediately.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the call that performed the cancellation.
    pub fn cancel(&self) -> bool {
        let mut cancelled = self.inner.cancelled.lock();
        if *cancelled {
            return false;
        }
        *cancelled = true;
        self.inner.signal.notify_all();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Sleep until `deadline`, returning early with `true` if cancelled.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            if self
                .inner
                .signal
                .wait_until(&mut cancelled, deadline)
                .timed_out()
            {
                break;
            }
        }
        *cancelled
    }
}
