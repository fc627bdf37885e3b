// src/audio/visualizer/mod.rs
//! Scrolling spectrogram: sample fifo, FFT analysis, pixel buffer and renderer.

pub mod fft;
pub mod fifo;
mod renderer;
pub mod spectrogram;

pub use fft::{SpectrumAnalyzer, SpectrumColumn};
pub use fifo::{sample_fifo, FifoConsumer, FifoProducer, FFT_SIZE};
pub use renderer::SpectrogramWidget;
pub use spectrogram::SpectrogramImage;

/// UI-side half of the visualizer, run once per render tick.
///
/// Owns the fifo consumer, the analyzer and the image; nothing here is
/// touched by the audio thread.
pub struct RenderTick {
    fifo: FifoConsumer,
    analyzer: SpectrumAnalyzer,
    image: SpectrogramImage,
    column: SpectrumColumn,
    columns_drawn: u64,
}

impl RenderTick {
    pub fn new(fifo: FifoConsumer, width: u32, height: u32) -> Self {
        let image = SpectrogramImage::new(width, height);
        let column = SpectrumColumn::new(image.height() as usize);
        Self {
            fifo,
            analyzer: SpectrumAnalyzer::new(),
            image,
            column,
            columns_drawn: 0,
        }
    }

    /// Draw the next column if a window is ready. Returns whether one was drawn.
    pub fn tick(&mut self) -> bool {
        let Some(window) = self.fifo.try_drain_window() else {
            return false;
        };
        self.analyzer.analyze(&window, &mut self.column);
        self.image.scroll_and_append(&self.column);
        self.columns_drawn += 1;
        true
    }

    pub fn image(&self) -> &SpectrogramImage {
        &self.image
    }

    pub fn columns_drawn(&self) -> u64 {
        self.columns_drawn
    }

    pub fn widget(&self) -> SpectrogramWidget<'_> {
        SpectrogramWidget::new(&self.image)
    }
}
