use egui::{pos2, vec2, Align2, FontId, Pos2, Rect, Sense};

use crate::layout::{is_white_row, NUM_NOTES_PER_OCTAVE, NUM_OCTAVES};
use crate::model::ChannelId;
use crate::sync::ViewSync;

struct TimelineCtx<'a> {
    painter: egui::Painter,
    view: &'a ViewSync,
    clip: Rect,
    /// Screen position of timeline coordinate (0, 0).
    origin: Pos2,
}

pub fn timeline_ui(ui: &mut egui::Ui, view: &mut ViewSync) -> egui::Response {
    let size = ui.available_size().max(vec2(200.0, 120.0));
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
    view.set_viewport(rect.size());

    if response.dragged() {
        view.scroll_by(-response.drag_delta());
    }
    if response.hovered() {
        let delta = ui.input(|i| i.smooth_scroll_delta);
        if delta != egui::Vec2::ZERO {
            view.scroll_by(-delta);
        }
    }

    let ctx = TimelineCtx {
        painter: ui.painter_at(rect),
        view: &*view,
        clip: rect,
        origin: rect.min - view.scroll(),
    };
    draw_rows(&ctx);
    draw_step_dividers(&ctx);
    draw_notes(&ctx);
    draw_cursor(&ctx);
    draw_keys(&ctx);

    response
}

fn draw_rows(ctx: &TimelineCtx<'_>) {
    let layout = ctx.view.layout();
    let theme = ctx.view.theme();
    let row_height = layout.note_row_height();
    let mut y = ctx.origin.y;
    for _ in 0..NUM_OCTAVES {
        for row in 0..NUM_NOTES_PER_OCTAVE {
            let rect = Rect::from_min_size(
                pos2(ctx.clip.left(), y),
                vec2(ctx.clip.width(), row_height),
            );
            if rect.intersects(ctx.clip) {
                let color = if is_white_row(row) {
                    theme.light_row
                } else {
                    theme.dark_row
                };
                ctx.painter.rect_filled(rect, 0.0, color);
                if row == 0 || row == 7 {
                    ctx.painter.line_segment(
                        [pos2(ctx.clip.left(), y), pos2(ctx.clip.right(), y)],
                        theme.octave_divider,
                    );
                }
            }
            y += row_height;
        }
    }
}

fn draw_step_dividers(ctx: &TimelineCtx<'_>) {
    let layout = ctx.view.layout();
    let step_width = layout.tick_width * ctx.view.ticks_per_step() as f32;
    if step_width <= 0.0 {
        return;
    }
    let scroll_x = ctx.view.scroll().x;
    let first = ((scroll_x - layout.white_key_width) / step_width).floor().max(0.0) as usize;
    let last = ((scroll_x + ctx.clip.width()) / step_width).ceil() as usize + 1;
    for step in first..last {
        let x = ctx.origin.x + layout.white_key_width + step as f32 * step_width - 1.0;
        ctx.painter.line_segment(
            [pos2(x, ctx.clip.top()), pos2(x, ctx.clip.bottom())],
            ctx.view.theme().step_divider,
        );
    }
}

fn draw_notes(ctx: &TimelineCtx<'_>) {
    let layout = ctx.view.layout();
    let offset = ctx.origin.to_vec2();
    for channel in ChannelId::ALL {
        let placed = ctx.view.song().channel(channel).placed();
        for (index, note) in placed.iter().enumerate() {
            let rect = layout.note_rect(note).translate(offset);
            if !rect.intersects(ctx.clip) {
                continue;
            }
            ctx.painter
                .rect_filled(rect, 0.0, ctx.view.note_color(channel, index));
            ctx.painter
                .rect_stroke(rect, 0.0, ctx.view.theme().note_border);
        }
    }
}

fn draw_cursor(ctx: &TimelineCtx<'_>) {
    let Some(tick) = ctx.view.cursor_tick() else {
        return;
    };
    let x = ctx.origin.x + ctx.view.layout().tick_to_x(tick);
    ctx.painter.line_segment(
        [pos2(x, ctx.clip.top()), pos2(x, ctx.clip.bottom())],
        ctx.view.theme().cursor,
    );
}

/// Keys stay pinned to the left edge while the timeline scrolls under them.
fn draw_keys(ctx: &TimelineCtx<'_>) {
    let theme = ctx.view.theme();
    let offset = vec2(ctx.clip.left(), ctx.origin.y);
    for key in ctx.view.key_shapes() {
        let rect = key.rect.translate(offset);
        if !rect.intersects(ctx.clip) {
            continue;
        }
        ctx.painter
            .rect_filled(rect, 0.0, ctx.view.key_color(key.index));
        ctx.painter.rect_stroke(rect, 0.0, theme.key_border);
        if let Some(label) = &key.label {
            ctx.painter.text(
                rect.right_bottom() - vec2(4.0, 2.0),
                Align2::RIGHT_BOTTOM,
                label,
                FontId::proportional(12.0),
                theme.key_label,
            );
        }
    }
}
