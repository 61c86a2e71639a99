use std::fmt;

use tracing::debug;

use crate::{EngineError, SongSource, Tick, NO_TICK};

/// Transport state machine.
///
/// `Stopped --start--> Playing --pause--> Paused --start--> Playing`, and
/// `stop` returns to `Stopped` from either active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportState::Stopped => "stopped",
            TransportState::Playing => "playing",
            TransportState::Paused => "paused",
        };
        f.write_str(label)
    }
}

/// Tick advancement multiplier in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u32);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(10);

    pub fn new(value: u32) -> Result<Self, EngineError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EngineError::SpeedOutOfRange(value))
        }
    }

    /// Clamp an arbitrary slider value into range.
    pub fn clamped(value: u32) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::MIN
    }
}

/// Transport state, speed and the song source it drives.
///
/// Owns no threads. The clock thread calls [`Transport::advance`] while the
/// UI thread issues transitions, both under the shared playback lock.
#[derive(Debug)]
pub struct Transport<S> {
    source: S,
    state: TransportState,
    speed: Speed,
    /// Set when the source refused to rewind on stop.
    rewind_pending: bool,
}

impl<S: SongSource> Transport<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: TransportState::Stopped,
            speed: Speed::default(),
            rewind_pending: false,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == TransportState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state == TransportState::Stopped
    }

    /// Current position, or [`NO_TICK`] while stopped.
    pub fn tick(&self) -> Tick {
        match self.state {
            TransportState::Stopped => NO_TICK,
            TransportState::Playing | TransportState::Paused => self.source.current_tick(),
        }
    }

    pub fn song_length(&self) -> Tick {
        self.source.song_length()
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Takes effect on the next [`Transport::advance`].
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn start(&mut self) -> bool {
        if self.is_playing() {
            return false;
        }
        if !self.source.ready() {
            debug!("song source not ready; start refused");
            return false;
        }
        if self.is_stopped() && self.rewind_pending && !self.source.stop() {
            debug!(
                tick = self.source.current_tick(),
                "song source still refuses to rewind; playing from its position"
            );
        }
        if !self.source.start() {
            debug!("song source refused to start");
            return false;
        }
        self.rewind_pending = false;
        debug!(from = %self.state, "transport playing");
        self.state = TransportState::Playing;
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.is_playing() || !self.source.pause() {
            return false;
        }
        debug!("transport paused");
        self.state = TransportState::Paused;
        true
    }

    pub fn stop(&mut self) -> bool {
        if self.is_stopped() {
            return false;
        }
        self.rewind_pending = !self.source.stop();
        if self.rewind_pending {
            debug!("song source refused to stop; rewinding before the next start");
        }
        debug!(from = %self.state, "transport stopped");
        self.state = TransportState::Stopped;
        true
    }

    /// Advance by `speed` ticks, wrapping at the song length.
    ///
    /// A no-op returning the current tick unless playing. When the source
    /// reports the end of the song the transport stops and [`NO_TICK`] is
    /// returned.
    pub fn advance(&mut self, speed: Speed) -> Tick {
        if !self.is_playing() {
            return self.tick();
        }
        match self.source.advance(speed.get()) {
            Some(tick) => tick,
            None => {
                debug!("song ended");
                self.stop();
                NO_TICK
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoopingSource;

    struct NotReady;

    impl SongSource for NotReady {
        fn ready(&self) -> bool {
            false
        }

        fn song_length(&self) -> Tick {
            1
        }

        fn current_tick(&self) -> Tick {
            0
        }

        fn advance(&mut self, _speed: u32) -> Option<Tick> {
            Some(0)
        }

        fn stop(&mut self) -> bool {
            true
        }
    }

    /// Refuses the first `refusals` rewinds.
    struct Stubborn {
        inner: LoopingSource,
        refusals: u32,
    }

    impl SongSource for Stubborn {
        fn ready(&self) -> bool {
            true
        }

        fn song_length(&self) -> Tick {
            self.inner.song_length()
        }

        fn current_tick(&self) -> Tick {
            self.inner.current_tick()
        }

        fn advance(&mut self, speed: u32) -> Option<Tick> {
            self.inner.advance(speed)
        }

        fn stop(&mut self) -> bool {
            if self.refusals > 0 {
                self.refusals -= 1;
                return false;
            }
            self.inner.stop()
        }
    }

    fn stubborn(refusals: u32) -> Transport<Stubborn> {
        Transport::new(Stubborn {
            inner: LoopingSource::new(3072),
            refusals,
        })
    }

    fn transport() -> Transport<LoopingSource> {
        Transport::new(LoopingSource::new(3072))
    }

    #[test]
    fn follows_state_machine() {
        let mut transport = transport();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert_eq!(transport.tick(), NO_TICK);

        assert!(transport.start());
        assert_eq!(transport.state(), TransportState::Playing);
        assert!(transport.pause());
        assert_eq!(transport.state(), TransportState::Paused);
        assert!(transport.start());
        assert_eq!(transport.state(), TransportState::Playing);
        assert!(transport.stop());
        assert_eq!(transport.state(), TransportState::Stopped);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut transport = transport();
        assert!(!transport.pause());
        assert!(!transport.stop());
        assert!(transport.start());
        assert!(!transport.start());
        assert!(transport.pause());
        assert!(!transport.pause());
        assert_eq!(transport.state(), TransportState::Paused);
    }

    #[test]
    fn pause_preserves_tick_and_stop_resets_it() {
        let mut transport = transport();
        transport.start();
        transport.advance(Speed::clamped(5));
        transport.pause();
        assert_eq!(transport.tick(), 5);
        assert_eq!(transport.advance(Speed::clamped(5)), 5);
        transport.stop();
        assert_eq!(transport.tick(), NO_TICK);
        transport.start();
        assert_eq!(transport.tick(), 0);
    }

    #[test]
    fn source_not_ready_keeps_transport_stopped() {
        let mut transport = Transport::new(NotReady);
        assert!(!transport.start());
        assert!(transport.is_stopped());
    }

    #[test]
    fn refused_rewind_is_retried_on_the_next_start() {
        let mut transport = stubborn(1);
        transport.start();
        transport.advance(Speed::clamped(7));
        assert!(transport.stop());
        assert!(transport.is_stopped());
        assert_eq!(transport.source().current_tick(), 7);

        assert!(transport.start());
        assert_eq!(transport.tick(), 0);
        assert_eq!(transport.advance(Speed::clamped(2)), 2);
    }

    #[test]
    fn source_that_never_rewinds_plays_from_its_position() {
        let mut transport = stubborn(u32::MAX);
        transport.start();
        transport.advance(Speed::clamped(4));
        transport.stop();

        assert!(transport.start());
        assert_eq!(transport.tick(), 4);
        transport.pause();
        // Resuming from pause never rewinds.
        assert!(transport.start());
        assert_eq!(transport.tick(), 4);
    }

    #[test]
    fn wrap_law_holds_for_mixed_speeds() {
        let mut transport = transport();
        transport.start();
        let mut total = 0i64;
        for step in 0..2_000u32 {
            let speed = Speed::clamped(step % 10 + 1);
            total += speed.get() as i64;
            let tick = transport.advance(speed);
            assert_eq!(tick as i64, total % 3072);
        }
        assert!(total >= 3072);
    }

    #[test]
    fn end_of_song_stops_transport() {
        let mut transport = Transport::new(LoopingSource::one_shot(4));
        transport.start();
        assert_eq!(transport.advance(Speed::clamped(3)), 3);
        assert_eq!(transport.advance(Speed::clamped(3)), NO_TICK);
        assert!(transport.is_stopped());
    }

    #[test]
    fn speed_is_bounded() {
        assert!(Speed::new(0).is_err());
        assert!(Speed::new(11).is_err());
        assert_eq!(Speed::new(10).map(Speed::get).ok(), Some(10));
        assert_eq!(Speed::clamped(99), Speed::MAX);
        assert_eq!(Speed::clamped(0), Speed::MIN);
    }
}
