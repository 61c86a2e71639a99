use egui::Color32;

use crate::layout::{Layout, NUM_KEYS};
use crate::model::{ChannelId, Pitch};
use crate::theme::Theme;

/// Colour of every piano key, tinted by whatever each channel is playing.
#[derive(Clone, Debug)]
pub struct PianoKeys {
    active: [Option<(Pitch, i32)>; 4],
    colors: Vec<Color32>,
}

impl PianoKeys {
    pub fn new(theme: &Theme) -> Self {
        let mut keys = Self {
            active: [None; 4],
            colors: Vec::with_capacity(NUM_KEYS),
        };
        keys.update_key_colors(theme);
        keys
    }

    /// Record the note now sounding on `channel`; `None` releases it.
    pub fn set_channel_pitch(&mut self, channel: ChannelId, pitch: Option<(Pitch, i32)>) {
        self.active[channel.index()] = pitch.filter(|(pitch, _)| !pitch.is_rest());
    }

    pub fn active_pitch(&self, channel: ChannelId) -> Option<(Pitch, i32)> {
        self.active[channel.index()]
    }

    /// Repaint every key neutral, then tint the active ones. Later channels
    /// win when two play the same key.
    pub fn update_key_colors(&mut self, theme: &Theme) {
        self.colors.clear();
        self.colors
            .extend((0..NUM_KEYS).map(|index| theme.key_color(Layout::key_is_white(index))));

        for channel in ChannelId::ALL {
            let Some((pitch, octave)) = self.active[channel.index()] else {
                continue;
            };
            if let Some(index) = Layout::key_index(pitch, octave) {
                self.colors[index] = theme.highlight_color(channel);
            }
        }
    }

    pub fn reset(&mut self, theme: &Theme) {
        self.active = [None; 4];
        self.update_key_colors(theme);
    }

    pub fn key_color(&self, index: usize) -> Color32 {
        self.colors.get(index).copied().unwrap_or(Color32::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_pitches_tint_their_keys() {
        let theme = Theme::classic();
        let mut keys = PianoKeys::new(&theme);
        keys.set_channel_pitch(ChannelId::Two, Some((Pitch::C, 2)));
        keys.set_channel_pitch(ChannelId::Four, Some((Pitch::FSharp, 4)));
        keys.update_key_colors(&theme);

        let c2 = Layout::key_index(Pitch::C, 2).unwrap();
        let fs4 = Layout::key_index(Pitch::FSharp, 4).unwrap();
        assert_eq!(keys.key_color(c2), theme.highlight_color(ChannelId::Two));
        assert_eq!(keys.key_color(fs4), theme.highlight_color(ChannelId::Four));
        assert_eq!(keys.key_color(0), theme.white_key);

        keys.reset(&theme);
        assert_eq!(keys.key_color(c2), theme.white_key);
        assert_eq!(keys.key_color(fs4), theme.black_key);
    }

    #[test]
    fn rests_and_offboard_octaves_are_ignored() {
        let theme = Theme::classic();
        let mut keys = PianoKeys::new(&theme);
        keys.set_channel_pitch(ChannelId::One, Some((Pitch::Rest, 1)));
        keys.set_channel_pitch(ChannelId::Two, Some((Pitch::C, 12)));
        keys.update_key_colors(&theme);
        assert_eq!(keys.active_pitch(ChannelId::One), None);
        assert!(
            (0..NUM_KEYS).all(|i| keys.key_color(i) == theme.key_color(Layout::key_is_white(i)))
        );
    }
}
