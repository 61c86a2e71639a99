use pretty_assertions::assert_eq;
use rollsync_pianoroll::{ChannelId, Layout, NoteGenerator, Pitch, Song, Theme, ViewSync};

/// Active note per channel found by scanning every note from the start.
fn naive_highlight(song: &Song, tick: i32) -> [Option<usize>; 4] {
    ChannelId::ALL.map(|id| {
        song.channel(id)
            .placed()
            .iter()
            .take_while(|note| note.start <= tick)
            .position(|note| note.contains(tick))
    })
}

fn view_highlight(view: &ViewSync) -> [Option<usize>; 4] {
    ChannelId::ALL.map(|id| view.highlighted_note(id))
}

#[test]
fn cached_scan_matches_full_rescan_across_wraps_and_rewinds() {
    let song = NoteGenerator::seeded(0x5eed, 3072).song();
    let mut view = ViewSync::new(song.clone(), Theme::classic(), Layout::default());
    view.start_following();

    let mut ticks: Vec<i32> = (0..3072).step_by(7).collect();
    ticks.extend([0, 5, 3071, 1500, 1499, 12, 3000]);
    ticks.extend((0..400).map(|i| (i * 37) % 3072));

    for tick in ticks {
        view.on_tick(tick);
        assert_eq!(view_highlight(&view), naive_highlight(&song, tick), "tick {tick}");
    }
}

#[test]
fn active_pitch_follows_the_lit_note() {
    let song = NoteGenerator::seeded(3, 3072).song();
    let mut view = ViewSync::new(song.clone(), Theme::classic(), Layout::default());
    view.start_following();
    view.on_tick(100);

    for id in ChannelId::ALL {
        let expected = view
            .highlighted_note(id)
            .map(|index| song.channel(id).placed()[index].note)
            .map(|note| (note.pitch, note.octave));
        assert_eq!(view.active_pitch(id), expected);
        if let Some((pitch, octave)) = expected {
            assert_ne!(pitch, Pitch::Rest);
            assert_eq!(octave, id.number() as i32);
            let key = Layout::key_index(pitch, octave).unwrap();
            assert_eq!(view.key_color(key), Theme::classic().highlight_color(id));
        }
    }
}

#[test]
fn restart_after_stop_begins_at_the_song_start() {
    let song = NoteGenerator::seeded(11, 3072).song();
    let mut view = ViewSync::new(song, Theme::classic(), Layout::default());
    view.set_viewport(egui::vec2(1024.0, 768.0));
    view.start_following();
    view.on_tick(2500);
    assert!(view.scroll().x > 0.0);

    view.stop_following();
    assert_eq!(view_highlight(&view), [None; 4]);

    view.start_following();
    assert_eq!(view.scroll().x, 0.0);
    assert_eq!(view.cursor_tick(), None);
}
