use std::fmt;

use rollsync_engine::Tick;

use crate::ModelError;

/// One of the twelve semitones, or a rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Pitch {
    #[default]
    Rest,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Pitch {
    pub const SEMITONES: [Pitch; 12] = [
        Pitch::C,
        Pitch::CSharp,
        Pitch::D,
        Pitch::DSharp,
        Pitch::E,
        Pitch::F,
        Pitch::FSharp,
        Pitch::G,
        Pitch::GSharp,
        Pitch::A,
        Pitch::ASharp,
        Pitch::B,
    ];

    /// `0` is a rest, `1..=12` are C through B.
    pub fn from_index(index: u8) -> Result<Self, ModelError> {
        match index {
            0 => Ok(Pitch::Rest),
            1..=12 => Ok(Self::SEMITONES[index as usize - 1]),
            _ => Err(ModelError::InvalidPitch(index)),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Pitch::Rest => 0,
            pitch => Self::SEMITONES
                .iter()
                .position(|&p| p == pitch)
                .map_or(0, |pos| pos as u8 + 1),
        }
    }

    /// Position within the octave, `None` for rests.
    pub fn semitone(self) -> Option<usize> {
        match self {
            Pitch::Rest => None,
            pitch => Some(pitch.index() as usize - 1),
        }
    }

    pub fn is_rest(self) -> bool {
        self == Pitch::Rest
    }

    pub fn name(self) -> &'static str {
        const NAMES: [&str; 13] = [
            "-", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        NAMES[self.index() as usize]
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable note as produced by the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    pub length: u32,
    pub pitch: Pitch,
    pub octave: i32,
    pub speed: u32,
}

impl Note {
    pub fn new(length: u32, pitch: Pitch, octave: i32, speed: u32) -> Result<Self, ModelError> {
        if length == 0 {
            return Err(ModelError::ZeroLength);
        }
        if speed == 0 {
            return Err(ModelError::ZeroSpeed);
        }
        let fits = length
            .checked_mul(speed)
            .is_some_and(|ticks| Tick::try_from(ticks).is_ok());
        if !fits {
            return Err(ModelError::DurationOverflow { length, speed });
        }
        Ok(Self {
            length,
            pitch,
            octave,
            speed,
        })
    }

    pub fn rest(length: u32, speed: u32) -> Result<Self, ModelError> {
        Self::new(length, Pitch::Rest, 0, speed)
    }

    /// Duration in ticks, saturating at `Tick::MAX` for hand-built notes.
    pub fn duration(&self) -> Tick {
        let ticks = u64::from(self.length) * u64::from(self.speed);
        Tick::try_from(ticks).unwrap_or(Tick::MAX)
    }
}

/// The four fixed lanes of the piano roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelId {
    One,
    Two,
    Three,
    Four,
}

impl ChannelId {
    pub const ALL: [ChannelId; 4] = [
        ChannelId::One,
        ChannelId::Two,
        ChannelId::Three,
        ChannelId::Four,
    ];

    /// Channels are numbered from 1.
    pub fn from_number(number: usize) -> Result<Self, ModelError> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(ModelError::InvalidChannel(number))
    }

    pub fn index(self) -> usize {
        match self {
            ChannelId::One => 0,
            ChannelId::Two => 1,
            ChannelId::Three => 2,
            ChannelId::Four => 3,
        }
    }

    pub fn number(self) -> usize {
        self.index() + 1
    }
}

/// A sounding note with its position on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedNote {
    pub note: Note,
    pub start: Tick,
}

impl PlacedNote {
    /// Exclusive end tick.
    pub fn end(&self) -> Tick {
        self.start.saturating_add(self.note.duration())
    }

    /// Half-open `[start, end)` containment.
    pub fn contains(&self, tick: Tick) -> bool {
        self.start <= tick && tick < self.end()
    }
}

/// Notes of one channel plus the placed boxes derived from them.
///
/// Rests advance time but produce no placed note.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelTrack {
    id: ChannelId,
    notes: Vec<Note>,
    placed: Vec<PlacedNote>,
}

impl ChannelTrack {
    pub fn new(id: ChannelId, notes: Vec<Note>) -> Self {
        let mut placed = Vec::with_capacity(notes.len());
        let mut tick: Tick = 0;
        for note in &notes {
            if !note.pitch.is_rest() {
                placed.push(PlacedNote { note: *note, start: tick });
            }
            tick = tick.saturating_add(note.duration());
        }
        Self { id, notes, placed }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Sounding notes in non-decreasing start order.
    pub fn placed(&self) -> &[PlacedNote] {
        &self.placed
    }

    /// Total ticks covered by the channel, rests included.
    pub fn duration(&self) -> Tick {
        self.notes
            .iter()
            .fold(0, |total: Tick, note| total.saturating_add(note.duration()))
    }
}

/// Note data for all four channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Song {
    length: Tick,
    channels: [ChannelTrack; 4],
}

impl Song {
    pub fn new(length: Tick, channels: [Vec<Note>; 4]) -> Self {
        let [one, two, three, four] = channels;
        Self {
            length,
            channels: [
                ChannelTrack::new(ChannelId::One, one),
                ChannelTrack::new(ChannelId::Two, two),
                ChannelTrack::new(ChannelId::Three, three),
                ChannelTrack::new(ChannelId::Four, four),
            ],
        }
    }

    pub fn length(&self) -> Tick {
        self.length
    }

    pub fn channel(&self, id: ChannelId) -> &ChannelTrack {
        &self.channels[id.index()]
    }

    pub fn channels(&self) -> &[ChannelTrack; 4] {
        &self.channels
    }

    /// Start tick of the latest placed note across all channels.
    pub fn last_note_start(&self) -> Tick {
        self.channels
            .iter()
            .filter_map(|channel| channel.placed().last())
            .map(|placed| placed.start)
            .max()
            .unwrap_or(0)
    }
}
