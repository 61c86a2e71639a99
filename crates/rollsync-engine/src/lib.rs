//! Playback clock and transport for the RollSync piano roll.
//!
//! The engine owns the only state shared between the UI thread and the clock
//! thread: the [`Transport`] and the [`Mailbox`] that carries published ticks
//! back to the UI. Both live behind a single [`parking_lot::Mutex`].

pub mod cancel;
pub mod clock;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod playback;
pub mod source;
pub mod transport;

use std::sync::Arc;

use parking_lot::Mutex;

pub use cancel::CancelToken;
pub use clock::{ClockThread, CycleOutcome};
pub use config::EngineConfig;
pub use error::EngineError;
pub use mailbox::{Mailbox, UiWaker};
pub use playback::{Playback, PlaybackChange, SyncUpdate};
pub use source::{LoopingSource, SongSource};
pub use transport::{Speed, Transport, TransportState};

/// Position in the song, in ticks.
pub type Tick = i32;

/// Sentinel published while nothing is playing.
pub const NO_TICK: Tick = -1;

/// Everything guarded by the shared playback lock.
#[derive(Debug)]
pub struct SharedState<S> {
    pub transport: Transport<S>,
    pub mailbox: Mailbox,
}

impl<S: SongSource> SharedState<S> {
    pub fn new(source: S) -> Self {
        Self {
            transport: Transport::new(source),
            mailbox: Mailbox::default(),
        }
    }
}

pub type SharedHandle<S> = Arc<Mutex<SharedState<S>>>;
