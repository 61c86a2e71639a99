use thiserror::Error;

use crate::Tick;

/// Errors produced by the playback engine.
///
/// Invalid transport transitions are not errors; they are reported as
/// `false` or [`crate::PlaybackChange::Unchanged`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Speed outside the supported `1..=10` range.
    #[error("speed {0} is outside 1..=10")]
    SpeedOutOfRange(u32),
    /// Songs must be at least one tick long.
    #[error("song length {0} must be positive")]
    InvalidSongLength(Tick),
    /// The clock period must be non-zero.
    #[error("clock period must be non-zero")]
    ZeroClockPeriod,
    /// The operating system refused to start the clock thread.
    #[error("failed to spawn clock thread: {0}")]
    ClockSpawn(#[from] std::io::Error),
}
