use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{
    CancelToken, EngineError, SharedHandle, SharedState, SongSource, Tick, UiWaker, NO_TICK,
};

/// Result of one clock cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The tick moved and was published to the mailbox.
    Published(Tick),
    /// The tick did not move; nothing was published.
    Unchanged,
    /// The shared lock was busy; retry next cycle.
    Contended,
    /// Transport is no longer playing. [`NO_TICK`] was published and the
    /// loop must exit.
    Finished,
}

/// Run a single clock iteration against the shared state.
///
/// Never blocks on the lock. `last` is the tick most recently published by
/// this clock session.
pub fn run_cycle<S: SongSource>(
    shared: &Mutex<SharedState<S>>,
    last: &mut Tick,
    waker: &dyn UiWaker,
) -> CycleOutcome {
    let Some(mut guard) = shared.try_lock() else {
        trace!("playback lock contended; deferring cycle");
        return CycleOutcome::Contended;
    };
    let state = &mut *guard;

    if state.transport.is_playing() {
        let speed = state.transport.speed();
        let tick = state.transport.advance(speed);
        if tick != NO_TICK {
            if tick == *last {
                return CycleOutcome::Unchanged;
            }
            *last = tick;
            state.mailbox.publish(tick);
            state.mailbox.request_wakeup(waker);
            return CycleOutcome::Published(tick);
        }
    }

    *last = NO_TICK;
    state.mailbox.publish(NO_TICK);
    state.mailbox.request_wakeup(waker);
    CycleOutcome::Finished
}

/// Handle to the thread advancing the transport at a fixed cadence.
///
/// Dropping the handle cancels the thread and joins it.
#[derive(Debug)]
pub struct ClockThread {
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl ClockThread {
    pub fn spawn<S>(
        shared: SharedHandle<S>,
        waker: Arc<dyn UiWaker>,
        period: Duration,
    ) -> Result<Self, EngineError>
    where
        S: SongSource + Send + 'static,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name("rollsync-clock".into())
            .spawn(move || clock_loop(&shared, waker.as_ref(), period, &token))?;
        debug!(?period, "clock thread started");
        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    /// Whether the loop is still running.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the loop to exit at the next cycle boundary and wait for it.
    ///
    /// The caller must not hold the playback lock.
    pub fn cancel_and_join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("clock thread panicked");
            }
            debug!("clock thread joined");
        }
    }
}

impl Drop for ClockThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn clock_loop<S: SongSource>(
    shared: &Mutex<SharedState<S>>,
    waker: &dyn UiWaker,
    period: Duration,
    cancel: &CancelToken,
) {
    let mut last = NO_TICK;
    let mut deadline = Instant::now() + period;
    while !cancel.wait_until(deadline) {
        deadline += period;
        let now = Instant::now();
        if deadline < now {
            // Fell behind (suspended process); resume the cadence from now.
            deadline = now + period;
        }
        if run_cycle(shared, &mut last, waker) == CycleOutcome::Finished {
            debug!("transport not playing; clock loop finished");
            break;
        }
    }
}
