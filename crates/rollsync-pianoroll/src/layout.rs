//! Geometry for the timeline: keys on the left, one row per semitone, one
//! column of `tick_width` pixels per tick. Coordinates are relative to the
//! top-left corner of the unscrolled timeline.

use egui::{pos2, vec2, Rect};
use rollsync_engine::Tick;

use crate::model::{Pitch, PlacedNote};

pub const NUM_WHITE_NOTES: usize = 7;
pub const NUM_BLACK_NOTES: usize = 5;
pub const NUM_NOTES_PER_OCTAVE: usize = NUM_WHITE_NOTES + NUM_BLACK_NOTES;
pub const NUM_OCTAVES: usize = 8;
pub const NUM_KEYS: usize = NUM_NOTES_PER_OCTAVE * NUM_OCTAVES;

pub const DEFAULT_TICKS_PER_STEP: Tick = 12;

/// Key placement within one octave, top to bottom: whites then blacks.
struct KeySlot {
    row: i32,
    delta: i32,
    pitch: Pitch,
    white: bool,
}

#[rustfmt::skip]
const KEY_SLOTS: [KeySlot; NUM_NOTES_PER_OCTAVE] = [
    KeySlot { row: 0, delta: 0, pitch: Pitch::B, white: true },
    KeySlot { row: 1, delta: 0, pitch: Pitch::A, white: true },
    KeySlot { row: 2, delta: 1, pitch: Pitch::G, white: true },
    KeySlot { row: 3, delta: 1, pitch: Pitch::F, white: true },
    KeySlot { row: 4, delta: -1, pitch: Pitch::E, white: true },
    KeySlot { row: 5, delta: -1, pitch: Pitch::D, white: true },
    KeySlot { row: 6, delta: 0, pitch: Pitch::C, white: true },
    KeySlot { row: 1, delta: 0, pitch: Pitch::ASharp, white: false },
    KeySlot { row: 3, delta: 0, pitch: Pitch::GSharp, white: false },
    KeySlot { row: 5, delta: 0, pitch: Pitch::FSharp, white: false },
    KeySlot { row: 8, delta: 0, pitch: Pitch::DSharp, white: false },
    KeySlot { row: 10, delta: 0, pitch: Pitch::CSharp, white: false },
];

/// Slot in [`KEY_SLOTS`] for each semitone, C first.
const SEMITONE_TO_SLOT: [usize; NUM_NOTES_PER_OCTAVE] = [6, 11, 5, 10, 4, 3, 9, 2, 8, 1, 7, 0];

/// Whether the note row at `row` (0 = B, top of the octave) is a white key.
pub fn is_white_row(row: usize) -> bool {
    !matches!(row % NUM_NOTES_PER_OCTAVE, 1 | 3 | 5 | 8 | 10)
}

/// A piano key ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyShape {
    /// Index into the key colour table; see [`Layout::key_index`].
    pub index: usize,
    pub rect: Rect,
    pub white: bool,
    pub label: Option<String>,
}

/// Pixel dimensions of the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub white_key_width: f32,
    pub white_key_height: f32,
    pub black_key_width: f32,
    pub black_key_height: f32,
    pub tick_width: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            white_key_width: 150.0,
            white_key_height: 24.0,
            black_key_width: 100.0,
            black_key_height: 20.0,
            tick_width: 3.0,
        }
    }
}

impl Layout {
    pub fn octave_height(&self) -> f32 {
        self.white_key_height * NUM_WHITE_NOTES as f32
    }

    pub fn note_row_height(&self) -> f32 {
        (self.octave_height() / NUM_NOTES_PER_OCTAVE as f32).floor()
    }

    pub fn black_key_offset(&self) -> f32 {
        (self.note_row_height() / 2.0).floor() - (self.black_key_height / 2.0).floor()
    }

    pub fn timeline_height(&self) -> f32 {
        self.octave_height() * NUM_OCTAVES as f32
    }

    pub fn tick_to_x(&self, tick: Tick) -> f32 {
        self.white_key_width + tick as f32 * self.tick_width
    }

    pub fn pitch_octave_to_y(&self, pitch: Pitch, octave: i32) -> f32 {
        (NUM_OCTAVES as i32 - octave) as f32 * self.octave_height()
            + (NUM_NOTES_PER_OCTAVE as i32 - pitch.index() as i32) as f32 * self.note_row_height()
    }

    pub fn note_rect(&self, placed: &PlacedNote) -> Rect {
        Rect::from_min_size(
            pos2(
                self.tick_to_x(placed.start),
                self.pitch_octave_to_y(placed.note.pitch, placed.note.octave),
            ),
            vec2(
                placed.note.duration() as f32 * self.tick_width,
                self.note_row_height(),
            ),
        )
    }

    /// Width that fits the song and lets the last note scroll to the left
    /// edge of a `view_width` viewport.
    pub fn timeline_width(&self, song_length: Tick, last_note_start: Tick, view_width: f32) -> f32 {
        let song_width = self.tick_to_x(song_length).max(view_width);
        let tail_width = last_note_start as f32 * self.tick_width + view_width;
        song_width.max(tail_width)
    }

    /// Index into the key colour table, `None` for rests and octaves off the
    /// keyboard.
    pub fn key_index(pitch: Pitch, octave: i32) -> Option<usize> {
        let semitone = pitch.semitone()?;
        if !(1..=NUM_OCTAVES as i32).contains(&octave) {
            return None;
        }
        let block = NUM_OCTAVES - octave as usize;
        Some(block * NUM_NOTES_PER_OCTAVE + SEMITONE_TO_SLOT[semitone])
    }

    /// Whether the key at `index` is white.
    pub fn key_is_white(index: usize) -> bool {
        KEY_SLOTS[index % NUM_NOTES_PER_OCTAVE].white
    }

    /// Every key on the keyboard, white keys before black keys so the black
    /// keys paint on top.
    pub fn key_shapes(&self) -> Vec<KeyShape> {
        let row_height = self.note_row_height();
        let mut whites = Vec::with_capacity(NUM_WHITE_NOTES * NUM_OCTAVES);
        let mut blacks = Vec::with_capacity(NUM_BLACK_NOTES * NUM_OCTAVES);
        let mut white_delta = 0.0;
        let mut black_delta = 0.0;

        for block in 0..NUM_OCTAVES {
            let top = self.octave_height() * block as f32;
            for (slot_index, slot) in KEY_SLOTS.iter().enumerate() {
                let index = block * NUM_NOTES_PER_OCTAVE + slot_index;
                let delta = slot.delta as f32;
                if slot.white {
                    let rect = Rect::from_min_size(
                        pos2(0.0, top + slot.row as f32 * self.white_key_height + white_delta),
                        vec2(self.white_key_width, self.white_key_height + delta),
                    );
                    let label =
                        (slot.pitch == Pitch::C).then(|| format!("C{}", NUM_OCTAVES - block));
                    whites.push(KeyShape {
                        index,
                        rect,
                        white: true,
                        label,
                    });
                    white_delta += delta;
                } else {
                    let y = top
                        + slot.row as f32 * row_height
                        + self.black_key_offset()
                        + black_delta;
                    let rect = Rect::from_min_size(
                        pos2(0.0, y),
                        vec2(self.black_key_width, self.black_key_height + delta),
                    );
                    blacks.push(KeyShape {
                        index,
                        rect,
                        white: false,
                        label: None,
                    });
                    black_delta += delta;
                }
            }
        }

        whites.extend(blacks);
        whites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Note;

    #[test]
    fn derived_dimensions() {
        let layout = Layout::default();
        assert_eq!(layout.octave_height(), 168.0);
        assert_eq!(layout.note_row_height(), 14.0);
        assert_eq!(layout.black_key_offset(), -3.0);
        assert_eq!(layout.timeline_height(), 1344.0);
    }

    #[test]
    fn notes_map_to_rows_and_columns() {
        let layout = Layout::default();
        let placed = PlacedNote {
            note: Note::new(2, Pitch::B, 8, 3).unwrap(),
            start: 10,
        };
        let rect = layout.note_rect(&placed);
        assert_eq!(rect.min, pos2(180.0, 0.0));
        assert_eq!(rect.size(), vec2(18.0, 14.0));

        let c1 = layout.pitch_octave_to_y(Pitch::C, 1);
        assert_eq!(c1, 7.0 * 168.0 + 11.0 * 14.0);
    }

    #[test]
    fn key_indices_match_slots() {
        assert_eq!(Layout::key_index(Pitch::B, 8), Some(0));
        assert_eq!(Layout::key_index(Pitch::C, 8), Some(6));
        assert_eq!(Layout::key_index(Pitch::CSharp, 1), Some(7 * 12 + 11));
        assert_eq!(Layout::key_index(Pitch::Rest, 3), None);
        assert_eq!(Layout::key_index(Pitch::C, 0), None);
        assert_eq!(Layout::key_index(Pitch::C, 9), None);
        assert!(Layout::key_is_white(6));
        assert!(!Layout::key_is_white(7 * 12 + 11));
    }

    #[test]
    fn keyboard_has_every_key_once() {
        let shapes = Layout::default().key_shapes();
        assert_eq!(shapes.len(), NUM_KEYS);
        let mut seen: Vec<_> = shapes.iter().map(|k| k.index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..NUM_KEYS).collect::<Vec<_>>());
        let labels: Vec<_> = shapes.iter().filter_map(|k| k.label.clone()).collect();
        assert_eq!(labels.first().map(String::as_str), Some("C8"));
        assert_eq!(labels.last().map(String::as_str), Some("C1"));
        assert!(shapes[..NUM_WHITE_NOTES * NUM_OCTAVES].iter().all(|k| k.white));
    }

    #[test]
    fn timeline_width_covers_song_and_tail() {
        let layout = Layout::default();
        assert_eq!(layout.timeline_width(100, 0, 400.0), 450.0);
        assert_eq!(layout.timeline_width(100, 90, 400.0), 670.0);
        assert_eq!(layout.timeline_width(1, 0, 800.0), 800.0);
    }

    #[test]
    fn white_rows() {
        let white: Vec<_> = (0..12).filter(|&row| is_white_row(row)).collect();
        assert_eq!(white, vec![0, 2, 4, 6, 7, 9, 11]);
    }
}
