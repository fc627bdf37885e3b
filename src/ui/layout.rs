// src/ui/layout.rs
//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed layout areas for rendering.
#[derive(Debug, Clone, Copy)]
pub struct ComputedLayout {
    pub files: Rect,
    pub player: Rect,
    pub spectrogram: Rect,
}

/// Browser and player share the top; the spectrogram takes the bottom.
pub fn compute_layout(area: Rect) -> ComputedLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(14), Constraint::Min(6)])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    ComputedLayout {
        files: cols[0],
        player: cols[1],
        spectrogram: rows[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_area() {
        let layout = compute_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.files.height, 14);
        assert_eq!(layout.spectrogram.y, 14);
        assert_eq!(layout.spectrogram.height, 26);
        assert_eq!(layout.files.width + layout.player.width, 100);
    }
}
