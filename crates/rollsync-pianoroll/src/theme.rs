use egui::{Color32, Stroke};

use crate::model::ChannelId;

/// Visual design tokens used by the timeline renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub channel_notes: [Color32; 4],
    pub channel_highlights: [Color32; 4],
    pub white_key: Color32,
    pub black_key: Color32,
    pub key_border: Stroke,
    pub key_label: Color32,
    pub light_row: Color32,
    pub dark_row: Color32,
    pub octave_divider: Stroke,
    pub step_divider: Stroke,
    pub note_border: Stroke,
    pub cursor: Stroke,
}

impl Theme {
    /// Red, blue, green and brown lanes on a light grid.
    pub fn classic() -> Self {
        let channel_notes = [
            Color32::from_rgb(217, 0, 0),
            Color32::from_rgb(0, 117, 253),
            Color32::from_rgb(0, 165, 0),
            Color32::from_rgb(124, 60, 25),
        ];
        Self {
            channel_notes,
            channel_highlights: channel_notes.map(lighter),
            white_key: Color32::WHITE,
            black_key: Color32::BLACK,
            key_border: Stroke::new(1.0, Color32::from_gray(40)),
            key_label: Color32::BLACK,
            light_row: Color32::from_gray(212),
            dark_row: Color32::from_gray(170),
            octave_divider: Stroke::new(2.0, Color32::from_gray(170)),
            step_divider: Stroke::new(1.0, Color32::from_gray(145)),
            note_border: Stroke::new(1.0, Color32::BLACK),
            cursor: Stroke::new(2.0, Color32::from_rgb(255, 0, 255)),
        }
    }

    pub fn note_color(&self, channel: ChannelId) -> Color32 {
        self.channel_notes[channel.index()]
    }

    pub fn highlight_color(&self, channel: ChannelId) -> Color32 {
        self.channel_highlights[channel.index()]
    }

    /// Neutral colour of a key with nothing playing on it.
    pub fn key_color(&self, white: bool) -> Color32 {
        if white {
            self.white_key
        } else {
            self.black_key
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// Blend a third of the way towards white.
pub fn lighter(color: Color32) -> Color32 {
    let mix = |c: u8| ((c as f32) * 0.67 + 255.0 * 0.33).round().min(255.0) as u8;
    Color32::from_rgb(mix(color.r()), mix(color.g()), mix(color.b()))
}
