use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{EngineError, Tick};

/// Cadence of the clock thread.
pub const DEFAULT_CLOCK_PERIOD: Duration = Duration::from_millis(8);

/// Length of the placeholder song.
pub const DEFAULT_SONG_LENGTH: Tick = 3072;

/// Settings consumed when building a [`crate::Playback`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub clock_period: Duration,
    pub song_length: Tick,
    /// Wrap to tick zero at the end of the song instead of stopping.
    pub looping: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clock_period: DEFAULT_CLOCK_PERIOD,
            song_length: DEFAULT_SONG_LENGTH,
            looping: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.song_length <= 0 {
            return Err(EngineError::InvalidSongLength(self.song_length));
        }
        if self.clock_period.is_zero() {
            return Err(EngineError::ZeroClockPeriod);
        }
        Ok(())
    }
}
