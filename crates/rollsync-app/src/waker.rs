use crossbeam_channel::{Sender, TrySendError};
use rollsync_engine::UiWaker;
use tracing::trace;

/// Wakes the egui event loop; the sync runs at the start of the next frame.
pub struct EguiWaker {
    ctx: egui::Context,
}

impl EguiWaker {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl UiWaker for EguiWaker {
    fn wake(&self) {
        self.ctx.request_repaint();
    }
}

/// Run queue for the headless front end. A full queue already holds a
/// wakeup, so the extra one is dropped.
pub struct ChannelWaker {
    tx: Sender<()>,
}

impl ChannelWaker {
    pub fn new(tx: Sender<()>) -> Self {
        Self { tx }
    }
}

impl UiWaker for ChannelWaker {
    fn wake(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => trace!("headless run queue closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_waker_never_blocks() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let waker = ChannelWaker::new(tx);
        waker.wake();
        waker.wake();
        assert_eq!(rx.len(), 1);
        drop(rx);
        waker.wake();
    }
}
