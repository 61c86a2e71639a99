use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    ClockThread, EngineConfig, EngineError, LoopingSource, SharedHandle, SharedState, SongSource,
    Speed, Tick, TransportState, UiWaker, NO_TICK,
};

/// What a play/pause toggle did to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChange {
    /// Stopped -> Playing; a new session began at the start of the song.
    Started,
    /// Paused -> Playing.
    Resumed,
    /// Playing -> Paused.
    Paused,
    /// The transition was refused (for example, the source was not ready).
    Unchanged,
}

/// A coalesced clock update consumed on the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncUpdate {
    pub tick: Tick,
    pub state: TransportState,
}

/// UI-thread owner of the transport and its clock thread.
///
/// A clock thread exists exactly while the transport is playing. Every
/// transition first cancels and joins the running clock without holding the
/// playback lock, then takes the lock only for the field updates.
pub struct Playback<S> {
    shared: SharedHandle<S>,
    waker: Arc<dyn UiWaker>,
    period: Duration,
    clock: Option<ClockThread>,
}

impl Playback<LoopingSource> {
    /// Build a playback session over the placeholder source.
    pub fn from_config(
        config: &EngineConfig,
        waker: Arc<dyn UiWaker>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let source = if config.looping {
            LoopingSource::new(config.song_length)
        } else {
            LoopingSource::one_shot(config.song_length)
        };
        Ok(Self::new(source, waker, config.clock_period))
    }
}

impl<S: SongSource + Send + 'static> Playback<S> {
    pub fn new(source: S, waker: Arc<dyn UiWaker>, period: Duration) -> Self {
        Self {
            shared: Arc::new(Mutex::new(SharedState::new(source))),
            waker,
            period,
            clock: None,
        }
    }

    pub fn shared(&self) -> &SharedHandle<S> {
        &self.shared
    }

    pub fn state(&self) -> TransportState {
        self.shared.lock().transport.state()
    }

    pub fn tick(&self) -> Tick {
        self.shared.lock().transport.tick()
    }

    pub fn song_length(&self) -> Tick {
        self.shared.lock().transport.song_length()
    }

    pub fn speed(&self) -> Speed {
        self.shared.lock().transport.speed()
    }

    pub fn clock_period(&self) -> Duration {
        self.period
    }

    pub fn clock_running(&self) -> bool {
        self.clock.as_ref().is_some_and(ClockThread::is_running)
    }

    /// Play from Stopped, resume from Paused, or pause while Playing.
    pub fn toggle_playback(&mut self) -> Result<PlaybackChange, EngineError> {
        self.join_clock();

        let (change, playing) = {
            let mut shared = self.shared.lock();
            let state = &mut *shared;
            let change = match state.transport.state() {
                TransportState::Stopped => {
                    if state.transport.start() {
                        state.mailbox.publish(NO_TICK);
                        PlaybackChange::Started
                    } else {
                        PlaybackChange::Unchanged
                    }
                }
                TransportState::Paused => {
                    if state.transport.start() {
                        PlaybackChange::Resumed
                    } else {
                        PlaybackChange::Unchanged
                    }
                }
                TransportState::Playing => {
                    if state.transport.pause() {
                        PlaybackChange::Paused
                    } else {
                        PlaybackChange::Unchanged
                    }
                }
            };
            (change, state.transport.is_playing())
        };

        if playing {
            if let Err(err) = self.spawn_clock() {
                warn!(%err, "could not start clock; stopping transport");
                self.shared.lock().transport.stop();
                return Err(err);
            }
        }

        info!(?change, "playback toggled");
        Ok(change)
    }

    /// Stop playback and rewind. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        self.join_clock();

        let stopped = {
            let mut shared = self.shared.lock();
            let stopped = shared.transport.stop();
            if stopped {
                shared.mailbox.publish(NO_TICK);
            }
            stopped
        };
        if stopped {
            info!("playback stopped");
        }
        stopped
    }

    /// Returns `true` if the speed changed.
    pub fn set_speed(&self, speed: Speed) -> bool {
        let mut shared = self.shared.lock();
        if shared.transport.speed() == speed {
            return false;
        }
        shared.transport.set_speed(speed);
        drop(shared);
        debug!(speed = speed.get(), "speed changed");
        true
    }

    /// UI-side half of the wakeup protocol.
    ///
    /// Returns the latest published tick if a wakeup was outstanding and
    /// clears it so the clock may request the next one. When the session
    /// ended on its own the finished clock thread is joined here.
    pub fn take_sync(&mut self) -> Option<SyncUpdate> {
        let update = {
            let mut shared = self.shared.lock();
            let tick = shared.mailbox.consume()?;
            SyncUpdate {
                tick,
                state: shared.transport.state(),
            }
        };
        if update.state == TransportState::Stopped && self.clock.is_some() {
            self.join_clock();
        }
        Some(update)
    }

    /// Tear down the clock thread; used on window close.
    pub fn shutdown(&mut self) {
        self.join_clock();
    }

    fn spawn_clock(&mut self) -> Result<(), EngineError> {
        let clock = ClockThread::spawn(self.shared.clone(), self.waker.clone(), self.period)?;
        self.clock = Some(clock);
        Ok(())
    }

    fn join_clock(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.cancel_and_join();
        }
    }
}
