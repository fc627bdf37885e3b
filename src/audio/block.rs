// src/audio/block.rs
//! Planar sample buffer handed to the block processor on every audio callback.

/// One callback's worth of audio, stored one `Vec` per channel.
///
/// The buffer is allocated once up front and reused for every callback, so
/// nothing on the audio thread ever resizes it.
#[derive(Debug, Clone)]
pub struct AudioBlock {
    channels: Vec<Vec<f32>>,
    frames: usize,
}

impl AudioBlock {
    /// Allocate a zeroed block of `num_channels` x `frames` samples.
    pub fn new(num_channels: usize, frames: usize) -> Self {
        Self {
            channels: vec![vec![0.0; frames]; num_channels],
            frames,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_frames(&self) -> usize {
        self.frames
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Iterate mutably over every channel.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(|c| c.as_mut_slice())
    }

    /// Borrow channels 0 and 1 together, if the block has at least two.
    pub fn stereo_mut(&mut self) -> Option<(&mut [f32], &mut [f32])> {
        if self.channels.len() < 2 {
            return None;
        }
        let (left, rest) = self.channels.split_at_mut(1);
        Some((left[0].as_mut_slice(), rest[0].as_mut_slice()))
    }

    /// Zero-fill every channel.
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }

    /// Zero-fill frames `from..` of every channel.
    pub fn clear_from(&mut self, from: usize) {
        let from = from.min(self.frames);
        for channel in &mut self.channels {
            channel[from..].fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_mut_borrows_both_channels() {
        let mut block = AudioBlock::new(2, 4);
        let (left, right) = block.stereo_mut().unwrap();
        left[0] = 1.0;
        right[3] = -1.0;
        assert_eq!(block.channel(0)[0], 1.0);
        assert_eq!(block.channel(1)[3], -1.0);
    }

    #[test]
    fn test_stereo_mut_on_mono_block() {
        let mut block = AudioBlock::new(1, 4);
        assert!(block.stereo_mut().is_none());
    }

    #[test]
    fn test_clear_from_keeps_head() {
        let mut block = AudioBlock::new(2, 4);
        for channel in block.channels_mut() {
            channel.fill(0.5);
        }
        block.clear_from(2);
        assert_eq!(block.channel(0), &[0.5, 0.5, 0.0, 0.0]);
        assert_eq!(block.channel(1), &[0.5, 0.5, 0.0, 0.0]);
    }
}
