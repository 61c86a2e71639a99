//! The application context: one playback controller and the view it drives,
//! constructed together and handed to whichever front end is running.

use rollsync_engine::{
    EngineError, Playback, PlaybackChange, SongSource, SyncUpdate, TransportState,
};
use rollsync_pianoroll::ViewSync;
use tracing::{debug, warn};

use crate::commands::Command;

pub struct Session<S> {
    playback: Playback<S>,
    view: ViewSync,
    refreshes: usize,
}

impl<S: SongSource + Send + 'static> Session<S> {
    pub fn new(playback: Playback<S>, view: ViewSync) -> Self {
        Self {
            playback,
            view,
            refreshes: 0,
        }
    }

    pub fn playback(&self) -> &Playback<S> {
        &self.playback
    }

    pub fn view(&self) -> &ViewSync {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewSync {
        &mut self.view
    }

    /// Number of coalesced clock updates consumed so far.
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    /// Apply a command. [`Command::ToggleFullscreen`] belongs to the window
    /// and is ignored here.
    pub fn handle_command(&mut self, command: Command) -> Result<(), EngineError> {
        debug!(%command, "handling command");
        match command {
            Command::TogglePlayback => match self.playback.toggle_playback() {
                Ok(PlaybackChange::Started) => self.view.start_following(),
                Ok(PlaybackChange::Resumed) => self.view.unpause_following(),
                Ok(PlaybackChange::Paused) => self.view.pause_following(),
                Ok(PlaybackChange::Unchanged) => {}
                Err(err) => {
                    self.view.stop_following();
                    return Err(err);
                }
            },
            Command::Stop => {
                if self.playback.stop() {
                    self.view.stop_following();
                }
            }
            Command::SetSpeed(speed) => {
                self.playback.set_speed(speed);
            }
            Command::SetContinuousScroll(continuous) => {
                self.view.set_continuous_scroll(continuous);
                if continuous && self.view.is_following() {
                    self.view.focus_cursor(false);
                }
            }
            Command::CenterCursor => {
                self.view.center_on_cursor();
            }
            Command::ToggleFullscreen => {}
        }
        Ok(())
    }

    /// Consume the pending clock update, if any, and bring the view up to
    /// date. Returns `true` when the timeline needs a repaint.
    pub fn sync(&mut self) -> bool {
        let Some(SyncUpdate { tick, state }) = self.playback.take_sync() else {
            return false;
        };
        self.refreshes += 1;
        match state {
            TransportState::Playing if tick >= 0 => self.view.on_tick(tick),
            TransportState::Stopped => {
                debug!("song ended");
                self.view.stop_following();
                true
            }
            TransportState::Playing | TransportState::Paused => false,
        }
    }

    pub fn shutdown(&mut self) {
        if self.playback.clock_running() {
            warn!("clock still running at shutdown; stopping");
        }
        self.playback.shutdown();
    }
}
