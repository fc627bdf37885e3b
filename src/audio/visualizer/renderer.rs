// src/audio/visualizer/renderer.rs
//! Terminal rendering of the spectrogram image.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Block, Borders, Widget},
};

use super::spectrogram::SpectrogramImage;

/// Draws a [`SpectrogramImage`] scaled to the widget area.
///
/// Each terminal cell shows two vertically stacked pixels using the upper
/// half block: foreground is the top pixel, background the bottom one.
pub struct SpectrogramWidget<'a> {
    image: &'a SpectrogramImage,
}

impl<'a> SpectrogramWidget<'a> {
    pub fn new(image: &'a SpectrogramImage) -> Self {
        Self { image }
    }
}

impl Widget for SpectrogramWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Spectrogram (FFT)");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let img_w = self.image.width() as u64;
        let img_h = self.image.height() as u64;
        let cols = inner.width as u64;
        let rows = inner.height as u64 * 2;

        for cy in 0..inner.height {
            for cx in 0..inner.width {
                let px = (cx as u64 * img_w / cols) as u32;
                let top_row = cy as u64 * 2;
                let py_top = (top_row * img_h / rows) as u32;
                let py_bottom = ((top_row + 1) * img_h / rows) as u32;

                let top = self.image.pixel(px, py_top);
                let bottom = self.image.pixel(px, py_bottom);

                if let Some(cell) = buf.cell_mut((inner.x + cx, inner.y + cy)) {
                    cell.set_char('▀')
                        .set_fg(Color::Rgb(top[0], top[1], top[2]))
                        .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::visualizer::fft::SpectrumColumn;

    #[test]
    fn test_renders_newest_column_at_right_edge() {
        let mut image = SpectrogramImage::new(8, 4);
        image.scroll_and_append(&SpectrumColumn::from_levels(&[1.0, 1.0, 1.0, 1.0]));

        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        SpectrogramWidget::new(&image).render(area, &mut buf);

        // Inner area is 8x2; the last inner column maps to image column 7
        let cell = &buf[(8, 1)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(1, 1)].fg, Color::Rgb(0, 0, 0));
    }
}
