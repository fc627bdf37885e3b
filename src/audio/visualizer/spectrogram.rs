// src/audio/visualizer/spectrogram.rs
//! Scrolling spectrogram pixel buffer.

use image::{Rgb, RgbImage};

use super::fft::SpectrumColumn;

pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 512;

const CHANNELS: usize = 3;

/// A fixed-size RGB image that scrolls left one column per append.
pub struct SpectrogramImage {
    image: RgbImage,
}

impl SpectrogramImage {
    /// Create a black image. Dimensions are fixed for the image's lifetime.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width.max(1), height.max(1)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Shift every row one pixel left and write `column` at the right edge.
    ///
    /// Rows beyond the column's height are left as shifted.
    pub fn scroll_and_append(&mut self, column: &SpectrumColumn) {
        let width = self.image.width() as usize;
        let height = self.image.height() as usize;
        let stride = width * CHANNELS;
        let raw: &mut [u8] = &mut self.image;

        for row in raw.chunks_exact_mut(stride) {
            row.copy_within(CHANNELS.., 0);
        }

        let right = (width - 1) as u32;
        for (y, pixel) in column.pixels().iter().take(height).enumerate() {
            self.image.put_pixel(right, y as u32, *pixel);
        }
    }
}
