use crate::{Tick, NO_TICK};

/// Schedules a callback on the UI thread.
///
/// Implementations enqueue work on the UI run queue (for egui, a repaint
/// request) and must not block.
pub trait UiWaker: Send + Sync {
    fn wake(&self);
}

impl<F> UiWaker for F
where
    F: Fn() + Send + Sync,
{
    fn wake(&self) {
        self()
    }
}

/// Latest published tick plus the single-flight wakeup flag.
///
/// Lives inside [`crate::SharedState`], so the tick and the flag are always
/// written under the same lock. Publishing overwrites any unconsumed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mailbox {
    tick: Tick,
    sync_requested: bool,
}

impl Default for Mailbox {
    fn default() -> Self {
        Self {
            tick: NO_TICK,
            sync_requested: false,
        }
    }
}

impl Mailbox {
    pub fn publish(&mut self, tick: Tick) {
        self.tick = tick;
    }

    pub fn latest(&self) -> Tick {
        self.tick
    }

    pub fn is_pending(&self) -> bool {
        self.sync_requested
    }

    /// Wake the UI unless a wakeup is already outstanding.
    ///
    /// Returns `true` if `waker` was called.
    pub fn request_wakeup(&mut self, waker: &dyn UiWaker) -> bool {
        if self.sync_requested {
            return false;
        }
        self.sync_requested = true;
        waker.wake();
        true
    }

    /// UI-side consumption; clears the outstanding wakeup.
    pub fn consume(&mut self) -> Option<Tick> {
        if !self.sync_requested {
            return None;
        }
        self.sync_requested = false;
        Some(self.tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingWaker(AtomicUsize);

    impl UiWaker for CountingWaker {
        fn wake(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn burst_of_publishes_coalesces_into_one_wakeup() {
        let waker = CountingWaker::default();
        let mut mailbox = Mailbox::default();
        for tick in 1..=500 {
            mailbox.publish(tick);
            mailbox.request_wakeup(&waker);
        }
        assert_eq!(waker.0.load(Ordering::SeqCst), 1);
        assert_eq!(mailbox.consume(), Some(500));
        assert_eq!(mailbox.consume(), None);
    }

    #[test]
    fn wakeup_rearms_after_consumption() {
        let waker = CountingWaker::default();
        let mut mailbox = Mailbox::default();
        mailbox.publish(3);
        assert!(mailbox.request_wakeup(&waker));
        assert!(!mailbox.request_wakeup(&waker));
        assert_eq!(mailbox.consume(), Some(3));
        mailbox.publish(NO_TICK);
        assert!(mailbox.request_wakeup(&waker));
        assert_eq!(waker.0.load(Ordering::SeqCst), 2);
        assert_eq!(mailbox.consume(), Some(NO_TICK));
    }

    #[test]
    fn closures_are_wakers() {
        let hits = AtomicUsize::new(0);
        let waker = || {
            hits.fetch_add(1, Ordering::SeqCst);
        };
        let mut mailbox = Mailbox::default();
        mailbox.request_wakeup(&waker);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
