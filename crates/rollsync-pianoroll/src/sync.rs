//! Turns published clock ticks into visual state: which note of each channel
//! is lit, which piano keys are tinted, where the cursor sits and how far the
//! timeline is scrolled. Lives on the UI thread only.

use egui::{vec2, Color32, Vec2};
use rollsync_engine::{Tick, NO_TICK};
use tracing::trace;

use crate::keys::PianoKeys;
use crate::layout::{KeyShape, Layout, DEFAULT_TICKS_PER_STEP};
use crate::model::{ChannelId, Pitch, PlacedNote, Song};
use crate::theme::Theme;

pub struct ViewSync {
    song: Song,
    theme: Theme,
    layout: Layout,
    key_shapes: Vec<KeyShape>,
    note_colors: [Vec<Color32>; 4],
    highlighted: [Option<usize>; 4],
    scan: [usize; 4],
    keys: PianoKeys,
    tick: Tick,
    drawn_cursor: Option<Tick>,
    following: bool,
    paused: bool,
    continuous: bool,
    ticks_per_step: Tick,
    scroll: Vec2,
    viewport: Vec2,
    timeline_width: f32,
}

impl ViewSync {
    pub fn new(song: Song, theme: Theme, layout: Layout) -> Self {
        let note_colors =
            ChannelId::ALL.map(|id| vec![theme.note_color(id); song.channel(id).placed().len()]);
        let keys = PianoKeys::new(&theme);
        let timeline_width = layout.timeline_width(song.length(), song.last_note_start(), 0.0);
        Self {
            key_shapes: layout.key_shapes(),
            song,
            theme,
            layout,
            note_colors,
            highlighted: [None; 4],
            scan: [0; 4],
            keys,
            tick: NO_TICK,
            drawn_cursor: None,
            following: false,
            paused: false,
            continuous: true,
            ticks_per_step: DEFAULT_TICKS_PER_STEP,
            scroll: Vec2::ZERO,
            viewport: Vec2::ZERO,
            timeline_width,
        }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn key_shapes(&self) -> &[KeyShape] {
        &self.key_shapes
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn continuous_scroll(&self) -> bool {
        self.continuous
    }

    pub fn set_continuous_scroll(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    pub fn ticks_per_step(&self) -> Tick {
        self.ticks_per_step
    }

    pub fn set_ticks_per_step(&mut self, ticks: Tick) {
        self.ticks_per_step = ticks.max(1);
    }

    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn timeline_width(&self) -> f32 {
        self.timeline_width
    }

    pub fn timeline_height(&self) -> f32 {
        self.layout.timeline_height()
    }

    pub fn max_scroll_x(&self) -> f32 {
        (self.timeline_width - self.viewport.x).max(0.0)
    }

    pub fn max_scroll_y(&self) -> f32 {
        (self.timeline_height() - self.viewport.y).max(0.0)
    }

    /// The tick last applied by [`ViewSync::on_tick`], or [`NO_TICK`].
    pub fn current_highlighted_tick(&self) -> Tick {
        self.tick
    }

    /// Index into the channel's placed notes of the lit note.
    pub fn highlighted_note(&self, channel: ChannelId) -> Option<usize> {
        self.highlighted[channel.index()]
    }

    pub fn active_pitch(&self, channel: ChannelId) -> Option<(Pitch, i32)> {
        self.keys.active_pitch(channel)
    }

    pub fn note_color(&self, channel: ChannelId, note: usize) -> Color32 {
        self.note_colors[channel.index()]
            .get(note)
            .copied()
            .unwrap_or_else(|| self.theme.note_color(channel))
    }

    pub fn key_color(&self, index: usize) -> Color32 {
        self.keys.key_color(index)
    }

    /// Where the cursor is drawn. Snapped to a step boundary while following
    /// or paused; `None` when nothing has played.
    pub fn cursor_tick(&self) -> Option<Tick> {
        if self.tick == NO_TICK {
            return None;
        }
        if self.following || self.paused {
            Some(self.quantized(self.tick))
        } else {
            Some(self.tick)
        }
    }

    /// Resize the visible area; recomputes the timeline width and pulls the
    /// scroll offset back into range.
    pub fn set_viewport(&mut self, size: Vec2) {
        if size == self.viewport {
            return;
        }
        self.viewport = size;
        self.timeline_width =
            self.layout
                .timeline_width(self.song.length(), self.song.last_note_start(), size.x);
        self.scroll_to(self.scroll.x, self.scroll.y);
    }

    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.scroll = vec2(
            x.clamp(0.0, self.max_scroll_x()),
            y.clamp(0.0, self.max_scroll_y()),
        );
    }

    pub fn scroll_to_y_max(&mut self) {
        self.scroll_to(self.scroll.x, self.max_scroll_y());
    }

    /// Scrolling from the user. A horizontal scroll while following snaps the
    /// cursor back into view.
    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll_to(self.scroll.x + delta.x, self.scroll.y + delta.y);
        if self.following && delta.x != 0.0 {
            self.focus_cursor(false);
        }
    }

    pub fn start_following(&mut self) {
        self.following = true;
        self.paused = false;
        self.reset();
        if self.tick == NO_TICK {
            self.scroll_to(0.0, self.scroll.y);
        }
    }

    pub fn unpause_following(&mut self) {
        self.following = true;
        self.paused = false;
    }

    pub fn pause_following(&mut self) {
        self.following = false;
        self.paused = true;
    }

    pub fn stop_following(&mut self) {
        self.following = false;
        self.paused = false;
        self.tick = NO_TICK;
        self.drawn_cursor = None;
        self.reset();
    }

    /// Clear every highlight and release every key.
    pub fn reset(&mut self) {
        for channel in ChannelId::ALL {
            let base = self.theme.note_color(channel);
            self.note_colors[channel.index()].fill(base);
        }
        self.highlighted = [None; 4];
        self.scan = [0; 4];
        self.keys.reset(&self.theme);
    }

    /// Apply a published tick. Returns `true` when the timeline needs a
    /// repaint.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        if tick == self.tick {
            return false;
        }
        if tick < self.tick {
            self.scan = [0; 4];
        }
        self.tick = tick;
        let scroll_before = self.scroll.x;

        let mut highlight_changed = false;
        for channel in ChannelId::ALL {
            highlight_changed |= self.highlight_channel(channel, tick);
        }
        if highlight_changed {
            self.keys.update_key_colors(&self.theme);
        }

        self.focus_cursor(false);

        let cursor = self.cursor_tick();
        let redraw =
            highlight_changed || cursor != self.drawn_cursor || self.scroll.x != scroll_before;
        if redraw {
            self.drawn_cursor = cursor;
        }
        trace!(tick, redraw, "view synced");
        redraw
    }

    /// Bring the cursor into view. Continuous scrolling while following
    /// always moves; otherwise only when the cursor leaves the window.
    /// Returns `true` if the scroll offset changed.
    pub fn focus_cursor(&mut self, center: bool) -> bool {
        let x = self.cursor_x();
        let left = self.scroll.x;
        let right_margin = left + self.viewport.x - self.layout.white_key_width * 2.0;
        if !((self.following && self.continuous) || x > right_margin || x < left) {
            return false;
        }
        let target = if center {
            x + self.layout.white_key_width - self.viewport.x / 2.0
        } else {
            x
        };
        self.scroll_to(target, self.scroll.y);
        self.scroll.x != left
    }

    /// Scroll so the cursor sits in the middle of the viewport, wherever it
    /// is and whatever the follow mode.
    pub fn center_on_cursor(&mut self) -> bool {
        let left = self.scroll.x;
        let target = self.cursor_x() + self.layout.white_key_width - self.viewport.x / 2.0;
        self.scroll_to(target, self.scroll.y);
        self.scroll.x != left
    }

    fn cursor_x(&self) -> f32 {
        let step_tick = if self.tick == NO_TICK {
            0
        } else {
            self.quantized(self.tick)
        };
        step_tick as f32 * self.layout.tick_width
    }

    fn quantized(&self, tick: Tick) -> Tick {
        tick.div_euclid(self.ticks_per_step) * self.ticks_per_step
    }

    fn highlight_channel(&mut self, channel: ChannelId, tick: Tick) -> bool {
        let index = channel.index();
        let placed = self.song.channel(channel).placed();

        let mut cursor = self.scan[index];
        while cursor < placed.len() && placed[cursor].end() <= tick {
            cursor += 1;
        }
        self.scan[index] = cursor;
        let active = placed
            .get(cursor)
            .filter(|note| note.start <= tick)
            .map(|_| cursor);

        let previous = self.highlighted[index];
        let pitch = active.map(|i| {
            let PlacedNote { note, .. } = placed[i];
            (note.pitch, note.octave)
        });
        if previous == active {
            return false;
        }

        let colors = &mut self.note_colors[index];
        if let Some(prev) = previous {
            colors[prev] = self.theme.note_color(channel);
        }
        if let Some(next) = active {
            colors[next] = self.theme.highlight_color(channel);
        }
        self.highlighted[index] = active;
        self.keys.set_channel_pitch(channel, pitch);
        true
    }
}
