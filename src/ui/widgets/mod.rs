// src/ui/widgets/mod.rs
//! Custom widgets for the player UI.

pub mod file_list;
pub mod player_panel;
pub mod spectrum;

// Re-export widget rendering functions
pub use file_list::render_file_list;
pub use player_panel::{render_player_panel, PlayerView};
pub use spectrum::render_spectrogram;
