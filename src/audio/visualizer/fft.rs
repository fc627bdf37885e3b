// src/audio/visualizer/fft.rs
//! FFT magnitude analysis and the row-to-bin mapping for spectrogram columns.

use std::sync::Arc;

use image::Rgb;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::fifo::{Window, FFT_SIZE};

/// Bins usable from a real-valued input (DC through Nyquist).
pub const NUM_BINS: usize = FFT_SIZE / 2 + 1;

/// Exponent of the row skew. Larger values give low frequencies more rows.
const SKEW_EXPONENT: f32 = 0.2;

/// Floor for the normalisation peak, so silence never divides by zero.
const MIN_PEAK: f32 = 1e-5;

/// One rendered spectrogram column: a level in `[0, 1]` and a colour per row.
#[derive(Debug, Clone)]
pub struct SpectrumColumn {
    levels: Vec<f32>,
    pixels: Vec<Rgb<u8>>,
}

impl SpectrumColumn {
    pub fn new(height: usize) -> Self {
        Self {
            levels: vec![0.0; height],
            pixels: vec![Rgb([0, 0, 0]); height],
        }
    }

    pub fn height(&self) -> usize {
        self.pixels.len()
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    pub fn pixels(&self) -> &[Rgb<u8>] {
        &self.pixels
    }

    /// Fill the column from arbitrary levels. Handy for tests and demos.
    pub fn from_levels(levels: &[f32]) -> Self {
        let mut column = Self::new(levels.len());
        for (y, &level) in levels.iter().enumerate() {
            column.set(y, level);
        }
        column
    }

    fn set(&mut self, row: usize, level: f32) {
        self.levels[row] = level;
        self.pixels[row] = level_to_color(level);
    }
}

/// Forward FFT plus the magnitude-to-colour column mapping.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let scratch_len = fft.get_inplace_scratch_len();
        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            magnitudes: vec![0.0; NUM_BINS],
        }
    }

    /// Transform `window` and return the magnitude of bins `0..=N/2`.
    pub fn compute(&mut self, window: &Window) -> &[f32] {
        for (slot, &sample) in self.buffer.iter_mut().zip(window.iter()) {
            *slot = Complex::new(sample, 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (mag, c) in self.magnitudes.iter_mut().zip(self.buffer.iter()) {
            *mag = c.norm();
        }
        &self.magnitudes
    }

    /// Largest magnitude over bins `[0, N/2)` from the last [`compute`](Self::compute).
    pub fn max_magnitude(&self) -> f32 {
        self.magnitudes[..FFT_SIZE / 2]
            .iter()
            .copied()
            .fold(0.0, f32::max)
    }

    /// Analyse `window` and write one colour per row into `column`.
    ///
    /// Row 0 is left black. Row `y` reads the bin picked by [`row_to_bin`].
    pub fn analyze(&mut self, window: &Window, column: &mut SpectrumColumn) {
        self.compute(window);
        let peak = self.max_magnitude().max(MIN_PEAK);
        let height = column.height();

        if height > 0 {
            column.set(0, 0.0);
        }
        for y in 1..height {
            let bin = row_to_bin(y, height);
            let level = (self.magnitudes[bin] / peak).clamp(0.0, 1.0);
            column.set(y, level);
        }
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Map image row `y` (of `height`) to an FFT bin with a logarithmic skew.
///
/// Rows near the bottom land on low bins, spreading the low end over more
/// pixels than a linear mapping would.
pub fn row_to_bin(y: usize, height: usize) -> usize {
    let proportion = y as f32 / height as f32;
    let skewed = 1.0 - (proportion.ln() * SKEW_EXPONENT).exp();
    let half = (FFT_SIZE / 2) as f32;
    ((skewed * half) as i64).clamp(0, (FFT_SIZE / 2) as i64) as usize
}

/// Colour for a level in `[0, 1]`: hue and brightness follow the level.
pub fn level_to_color(level: f32) -> Rgb<u8> {
    hsv_to_rgb(level, 1.0, level)
}

/// HSV with every component in `[0, 1]` to 8-bit RGB. Hue wraps.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb<u8> {
    let hue = (hue - hue.floor()) * 6.0;
    let saturation = saturation.clamp(0.0, 1.0);
    let value = value.clamp(0.0, 1.0);

    let sector = hue.floor();
    let f = hue - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match sector as u8 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };

    let to_u8 = |c: f32| (c * 255.0).round() as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_yields_zero_levels() {
        let mut analyzer = SpectrumAnalyzer::new();
        let mut column = SpectrumColumn::new(512);
        analyzer.analyze(&[0.0; FFT_SIZE], &mut column);

        assert_eq!(analyzer.max_magnitude(), 0.0);
        assert!(column.levels().iter().all(|&l| l == 0.0));
        assert!(column.pixels().iter().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_dc_window_levels_in_range() {
        let mut analyzer = SpectrumAnalyzer::new();
        let mut column = SpectrumColumn::new(512);
        analyzer.analyze(&[1.0; FFT_SIZE], &mut column);

        let mags = analyzer.compute(&[1.0; FFT_SIZE]).to_vec();
        assert!((mags[0] - FFT_SIZE as f32).abs() < 1e-2);
        assert!(mags[1..].iter().all(|&m| m < 1e-2));

        assert!(column.levels().iter().all(|&l| (0.0..=1.0).contains(&l)));
        assert_eq!(column.levels()[0], 0.0);
        // The bottom row reads bin 0, which holds all the energy
        assert!((column.levels()[511] - 1.0).abs() < 1e-6);
        assert!(column.levels()[1] < 1e-3);
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let bin = 64;
        let mut window = [0.0f32; FFT_SIZE];
        for (n, s) in window.iter_mut().enumerate() {
            *s = (std::f32::consts::TAU * bin as f32 * n as f32 / FFT_SIZE as f32).sin();
        }
        let mut analyzer = SpectrumAnalyzer::new();
        let mags = analyzer.compute(&window).to_vec();
        let loudest = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(loudest, bin);
        assert!((analyzer.max_magnitude() - FFT_SIZE as f32 / 2.0).abs() < 1.0);
    }

    #[test]
    fn test_row_to_bin_is_monotonic_and_bounded() {
        let height = 512;
        let mut previous = usize::MAX;
        for y in 1..height {
            let bin = row_to_bin(y, height);
            assert!(bin <= FFT_SIZE / 2);
            assert!(bin <= previous);
            previous = bin;
        }
        assert_eq!(row_to_bin(height - 1, height), 0);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb([255, 0, 0]));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb([0, 255, 0]));
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb([0, 0, 255]));
        assert_eq!(level_to_color(1.0), Rgb([255, 0, 0]));
        assert_eq!(level_to_color(0.0), Rgb([0, 0, 0]));
    }
}
