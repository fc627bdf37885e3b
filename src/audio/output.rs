// src/audio/output.rs
//! Output device plumbing: the block processor exposed to rodio as a `Source`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rodio::{OutputStream, Source};

use super::block::AudioBlock;
use super::processor::AudioBlockProcessor;

/// Output channel count. Decoded sources are converted to this layout.
pub const OUTPUT_CHANNELS: u16 = 2;

/// Endless interleaved stream produced block by block.
///
/// rodio's mixer pulls samples from this iterator on the device callback
/// thread; every `block_frames` frames the processor refills the block.
/// The stream ends at the first block boundary after `stop` is raised.
pub struct ProcessedSource {
    processor: AudioBlockProcessor,
    stop: Arc<AtomicBool>,
    block: AudioBlock,
    frame: usize,
    channel: usize,
    sample_rate: u32,
}

impl ProcessedSource {
    pub fn new(
        processor: AudioBlockProcessor,
        stop: Arc<AtomicBool>,
        channels: u16,
        block_frames: usize,
        sample_rate: u32,
    ) -> Self {
        let block = AudioBlock::new(channels.max(1) as usize, block_frames.max(1));
        let frame = block.num_frames();
        Self {
            processor,
            stop,
            block,
            frame,
            channel: 0,
            sample_rate,
        }
    }
}

impl Iterator for ProcessedSource {
    type Item = f32;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.frame == self.block.num_frames() {
            if self.stop.load(Ordering::Relaxed) {
                return None;
            }
            self.processor.process(&mut self.block);
            self.frame = 0;
        }

        let sample = self.block.channel(self.channel)[self.frame];
        self.channel += 1;
        if self.channel == self.block.num_channels() {
            self.channel = 0;
            self.frame += 1;
        }
        Some(sample)
    }
}

impl Source for ProcessedSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.block.num_channels() as u16
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// The open output device. The source is mixed in directly, without a
/// `Sink`, so the callback never touches a lock.
pub struct AudioOutput {
    stop: Arc<AtomicBool>,
    _stream: OutputStream,
}

impl AudioOutput {
    /// Open the default device and start pulling from `processor`.
    pub fn open(mut processor: AudioBlockProcessor, block_frames: usize, sample_rate: u32) -> Result<Self> {
        processor.prepare(block_frames, sample_rate);

        let (stream, handle) =
            OutputStream::try_default().context("no audio output device available")?;
        let stop = Arc::new(AtomicBool::new(false));
        handle
            .play_raw(ProcessedSource::new(
                processor,
                stop.clone(),
                OUTPUT_CHANNELS,
                block_frames,
                sample_rate,
            ))
            .context("failed to start audio playback")?;

        log::info!(
            "audio output open ({} ch @ {} Hz, {} frame blocks)",
            OUTPUT_CHANNELS,
            sample_rate,
            block_frames
        );

        Ok(Self {
            stop,
            _stream: stream,
        })
    }

    /// Stop pulling audio. Dropping the value afterwards releases the device.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::Relaxed);
        log::info!("audio output stopped");
    }
}
