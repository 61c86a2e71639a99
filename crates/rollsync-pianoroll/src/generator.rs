use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rollsync_engine::Tick;
use tracing::debug;

use crate::model::{ChannelId, Note, Pitch, Song};

/// Ticks left unfilled at the end of each generated channel.
const TAIL_TICKS: Tick = 16;

/// Procedural placeholder for real song data.
pub struct NoteGenerator {
    rng: StdRng,
    song_length: Tick,
}

impl NoteGenerator {
    /// Reproducible output for a given seed.
    pub fn seeded(seed: u64, song_length: Tick) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            song_length,
        }
    }

    pub fn from_entropy(song_length: Tick) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            song_length,
        }
    }

    /// Notes for one channel, played in the octave matching its number.
    pub fn channel(&mut self, id: ChannelId) -> Vec<Note> {
        let mut notes = Vec::new();
        let mut tick: Tick = 0;
        while tick < self.song_length - TAIL_TICKS {
            let note = Note {
                octave: id.number() as i32,
                speed: self.rng.gen_range(1..=4),
                length: self.rng.gen_range(1..=4),
                pitch: Pitch::SEMITONES[self.rng.gen_range(0..Pitch::SEMITONES.len())],
            };
            tick += note.duration();
            notes.push(note);
        }
        notes
    }

    pub fn song(&mut self) -> Song {
        let channels = ChannelId::ALL.map(|id| self.channel(id));
        debug!(
            notes = channels.iter().map(Vec::len).sum::<usize>(),
            "generated placeholder song"
        );
        Song::new(self.song_length, channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_song() {
        let a = NoteGenerator::seeded(7, 3072).song();
        let b = NoteGenerator::seeded(7, 3072).song();
        assert_eq!(a, b);
    }

    #[test]
    fn notes_stay_in_range_and_fill_the_song() {
        let song = NoteGenerator::seeded(42, 3072).song();
        for channel in song.channels() {
            let octave = channel.id().number() as i32;
            for note in channel.notes() {
                assert!((1..=4).contains(&note.length));
                assert!((1..=4).contains(&note.speed));
                assert!(!note.pitch.is_rest());
                assert_eq!(note.octave, octave);
            }
            let duration = channel.duration();
            assert!(duration >= 3072 - TAIL_TICKS);
            // The last note starts before the tail and lasts at most 16 ticks.
            assert!(duration < 3072);
            assert_eq!(channel.placed().len(), channel.notes().len());
        }
    }

    #[test]
    fn tiny_songs_produce_no_notes() {
        let song = NoteGenerator::seeded(1, 10).song();
        assert!(song.channels().iter().all(|c| c.notes().is_empty()));
    }
}
