// src/ui/widgets/spectrum.rs
//! Spectrogram widget wrapper.

use ratatui::{layout::Rect, Frame};

use crate::audio::RenderTick;

/// Render the scrolling spectrogram.
pub fn render_spectrogram(f: &mut Frame<'_>, area: Rect, render: &RenderTick) {
    f.render_widget(render.widget(), area);
}
