use crate::Tick;

/// Sequencer or decoder that produces the song position.
///
/// The transport drives a source but never inspects how it produces ticks,
/// so any real decoder can stand in for [`LoopingSource`].
pub trait SongSource {
    /// Whether the source has data loaded and can start.
    fn ready(&self) -> bool;

    fn song_length(&self) -> Tick;

    fn current_tick(&self) -> Tick;

    /// Move the position forward by `speed` ticks.
    ///
    /// Returns `None` once the song has ended.
    fn advance(&mut self, speed: u32) -> Option<Tick>;

    fn start(&mut self) -> bool {
        true
    }

    fn pause(&mut self) -> bool {
        true
    }

    /// Stop and rewind to the beginning of the song.
    fn stop(&mut self) -> bool;
}

/// Placeholder source counting ticks up to the song length.
#[derive(Debug, Clone)]
pub struct LoopingSource {
    song_length: Tick,
    tick: Tick,
    looping: bool,
}

impl LoopingSource {
    pub fn new(song_length: Tick) -> Self {
        Self {
            song_length: song_length.max(1),
            tick: 0,
            looping: true,
        }
    }

    /// Source that ends at the song length instead of wrapping.
    pub fn one_shot(song_length: Tick) -> Self {
        Self {
            looping: false,
            ..Self::new(song_length)
        }
    }

    pub fn looping(&self) -> bool {
        self.looping
    }
}

impl SongSource for LoopingSource {
    fn ready(&self) -> bool {
        true
    }

    fn song_length(&self) -> Tick {
        self.song_length
    }

    fn current_tick(&self) -> Tick {
        self.tick
    }

    fn advance(&mut self, speed: u32) -> Option<Tick> {
        let next = self.tick as i64 + speed as i64;
        if next >= self.song_length as i64 && !self.looping {
            self.tick = 0;
            return None;
        }
        self.tick = next.rem_euclid(self.song_length as i64) as Tick;
        Some(self.tick)
    }

    fn stop(&mut self) -> bool {
        self.tick = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_modulo_song_length() {
        let mut source = LoopingSource::new(10);
        assert_eq!(source.advance(4), Some(4));
        assert_eq!(source.advance(4), Some(8));
        assert_eq!(source.advance(4), Some(2));
    }

    #[test]
    fn one_shot_reports_end_of_song() {
        let mut source = LoopingSource::one_shot(10);
        assert_eq!(source.advance(9), Some(9));
        assert_eq!(source.advance(1), None);
        assert_eq!(source.current_tick(), 0);
    }

    #[test]
    fn stop_rewinds() {
        let mut source = LoopingSource::new(100);
        source.advance(7);
        assert!(source.stop());
        assert_eq!(source.current_tick(), 0);
    }
}
