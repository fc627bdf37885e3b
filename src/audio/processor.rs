// src/audio/processor.rs
//! The per-callback audio pipeline: transport → analysis tap → effect chain.

use std::sync::Arc;

use super::block::AudioBlock;
use super::effects::{EffectChain, EffectParameters};
use super::transport::TransportReader;
use super::visualizer::FifoProducer;

/// Runs on the audio thread once per block.
///
/// Owns the effect chain and the producer half of the analysis fifo. Nothing
/// in [`process`](Self::process) allocates, locks, or touches the filesystem.
pub struct AudioBlockProcessor {
    transport: TransportReader,
    effects: EffectChain,
    fifo: FifoProducer,
}

impl AudioBlockProcessor {
    pub fn new(transport: TransportReader, params: Arc<EffectParameters>, fifo: FifoProducer) -> Self {
        Self {
            transport,
            effects: EffectChain::new(params),
            fifo,
        }
    }

    /// Size internal state for the output format. Call before audio starts.
    pub fn prepare(&mut self, block_frames: usize, sample_rate: u32) {
        self.transport.prepare(block_frames, sample_rate);
        self.effects.prepare(sample_rate);
    }

    /// Produce the next block of output in place.
    pub fn process(&mut self, block: &mut AudioBlock) {
        if !self.transport.read_block(block) {
            // No source: silence, and the analyzer sees nothing
            return;
        }

        // Channel 0, before gain, feeds the spectrogram
        if block.num_channels() > 0 {
            for &sample in block.channel(0) {
                self.fifo.push(sample);
            }
        }

        self.effects.process(block);
    }
}
