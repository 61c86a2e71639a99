pub mod generator;
pub mod keys;
pub mod layout;
pub mod model;
pub mod render;
pub mod sync;
pub mod theme;

mod error;

pub use error::ModelError;
pub use generator::NoteGenerator;
pub use layout::Layout;
pub use model::{ChannelId, ChannelTrack, Note, Pitch, PlacedNote, Song};
pub use sync::ViewSync;
pub use theme::Theme;

/// Draw the timeline and handle scrolling input.
pub fn render(ui: &mut egui::Ui, view: &mut ViewSync) -> egui::Response {
    render::timeline_ui(ui, view)
}
