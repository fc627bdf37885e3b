// src/audio/decoder.rs
//! File decoding via rodio, normalised to the player's output format.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::decoder::DecoderError;
use rodio::source::UniformSourceIterator;
use rodio::Decoder;
use thiserror::Error;

/// Errors returned when a file cannot be turned into a playable source.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {source}", path.display())]
    Unsupported {
        path: PathBuf,
        #[source]
        source: DecoderError,
    },

    #[error("{} contains no audio", path.display())]
    Empty { path: PathBuf },
}

/// A fully decoded track held in memory as interleaved samples.
///
/// Decoding happens up front on the UI thread so the audio callback only ever
/// copies out of this buffer.
#[derive(Debug, Clone)]
pub struct DecodedSource {
    name: String,
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl DecodedSource {
    /// Wrap already-interleaved samples.
    pub fn from_interleaved(
        name: impl Into<String>,
        samples: Vec<f32>,
        channels: u16,
        sample_rate: u32,
    ) -> Self {
        Self {
            name: name.into(),
            samples,
            channels: channels.max(1),
            sample_rate: sample_rate.max(1),
        }
    }

    /// Display name (the file name for decoded files).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> u64 {
        (self.samples.len() / self.channels as usize) as u64
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Decode `path` and convert it to `channels` channels at `sample_rate` Hz.
pub fn open(path: &Path, channels: u16, sample_rate: u32) -> Result<DecodedSource, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| DecodeError::Unsupported {
        path: path.to_path_buf(),
        source,
    })?;

    // Channel mapping and resampling are rodio's job
    let uniform: UniformSourceIterator<_, f32> =
        UniformSourceIterator::new(decoder, channels, sample_rate);
    let samples: Vec<f32> = uniform.collect();

    if samples.len() < channels as usize {
        return Err(DecodeError::Empty {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    log::info!(
        "decoded {} ({} frames, {} ch @ {} Hz)",
        name,
        samples.len() / channels as usize,
        channels,
        sample_rate
    );

    Ok(DecodedSource::from_interleaved(name, samples, channels, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Write a 16-bit mono PCM WAV file with the given samples.
    fn write_wav(path: &Path, sample_rate: u32, samples: &[i16]) {
        let wav_spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, wav_spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.wav");
        let err = open(&path, 2, 44_100).unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }

    #[test]
    fn test_open_garbage_is_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"definitely not an audio file").unwrap();
        let err = open(&path, 2, 44_100).unwrap_err();
        assert!(matches!(err, DecodeError::Unsupported { .. }));
    }

    #[test]
    fn test_open_wav_upmixes_to_stereo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mono-tone.wav");
        let samples = vec![16_384i16; 4_410];
        write_wav(&path, 44_100, &samples);

        let source = open(&path, 2, 44_100).unwrap();
        assert_eq!(source.channels(), 2);
        assert_eq!(source.name(), "mono-tone.wav");
        assert!((source.frames() as i64 - 4_410).abs() <= 1);
        assert!((source.duration_secs() - 0.1).abs() < 0.001);
        // Both channels carry the mono signal
        assert!((source.samples()[100] - 0.5).abs() < 0.01);
        assert!((source.samples()[101] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_from_interleaved_frames() {
        let source = DecodedSource::from_interleaved("t", vec![0.0; 8], 2, 4);
        assert_eq!(source.frames(), 4);
        assert_eq!(source.duration_secs(), 1.0);
    }
}
