use thiserror::Error;

/// Errors raised while building note data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("pitch index {0} is outside 0..=12")]
    InvalidPitch(u8),
    #[error("channel {0} does not exist; channels are numbered 1..=4")]
    InvalidChannel(usize),
    #[error("note length must be positive")]
    ZeroLength,
    #[error("note speed must be positive")]
    ZeroSpeed,
    #[error("note of length {length} at speed {speed} does not fit in a tick")]
    DurationOverflow { length: u32, speed: u32 },
}
