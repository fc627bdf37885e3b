// src/audio/effects/mod.rs
//! Gain + reverb effect chain and its lock-free parameter block.

pub mod reverb;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use super::block::AudioBlock;
pub use reverb::{Reverb, ReverbSettings};

pub const GAIN_DB_MIN: f32 = -50.0;
pub const GAIN_DB_MAX: f32 = 30.0;

/// Effect parameters shared between the UI thread (writer) and the audio
/// thread (reader). Each field is an independent atomic; there is no
/// cross-field consistency.
#[derive(Debug)]
pub struct EffectParameters {
    gain_db_bits: AtomicU32,
    room_size_bits: AtomicU32,
    reverb_enabled: AtomicBool,
}

/// A point-in-time copy of [`EffectParameters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSnapshot {
    pub gain_db: f32,
    pub room_size: f32,
    pub reverb_enabled: bool,
}

impl EffectSnapshot {
    /// Linear gain factor for `gain_db`.
    pub fn gain_linear(&self) -> f32 {
        db_to_linear(self.gain_db)
    }
}

/// Convert decibels to a linear amplitude factor.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

impl EffectParameters {
    pub fn new(gain_db: f32, room_size: f32, reverb_enabled: bool) -> Self {
        let params = Self {
            gain_db_bits: AtomicU32::new(0f32.to_bits()),
            room_size_bits: AtomicU32::new(0f32.to_bits()),
            reverb_enabled: AtomicBool::new(reverb_enabled),
        };
        params.set_gain_db(gain_db);
        params.set_room_size(room_size);
        params
    }

    pub fn gain_db(&self) -> f32 {
        f32::from_bits(self.gain_db_bits.load(Ordering::Relaxed))
    }

    /// Set the gain, clamped to `[GAIN_DB_MIN, GAIN_DB_MAX]`.
    pub fn set_gain_db(&self, gain_db: f32) {
        let gain_db = if gain_db.is_nan() { 0.0 } else { gain_db };
        let clamped = gain_db.clamp(GAIN_DB_MIN, GAIN_DB_MAX);
        self.gain_db_bits.store(clamped.to_bits(), Ordering::Relaxed);
    }

    pub fn room_size(&self) -> f32 {
        f32::from_bits(self.room_size_bits.load(Ordering::Relaxed))
    }

    /// Set the reverb room size, clamped to `[0, 1]`.
    pub fn set_room_size(&self, room_size: f32) {
        let room_size = if room_size.is_nan() { 0.0 } else { room_size };
        self.room_size_bits
            .store(room_size.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn reverb_enabled(&self) -> bool {
        self.reverb_enabled.load(Ordering::Relaxed)
    }

    /// Flip the reverb toggle and return the new state.
    pub fn toggle_reverb(&self) -> bool {
        !self.reverb_enabled.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> EffectSnapshot {
        EffectSnapshot {
            gain_db: self.gain_db(),
            room_size: self.room_size(),
            reverb_enabled: self.reverb_enabled(),
        }
    }
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self::new(0.0, 0.0, false)
    }
}

/// Applies gain, then (when enabled) reverb, to a block in place.
pub struct EffectChain {
    params: Arc<EffectParameters>,
    reverb: Reverb,
    reverb_active: bool,
}

impl EffectChain {
    pub fn new(params: Arc<EffectParameters>) -> Self {
        let settings = ReverbSettings {
            room_size: params.room_size(),
            ..ReverbSettings::default()
        };
        Self {
            params,
            reverb: Reverb::new(settings),
            reverb_active: false,
        }
    }

    /// Allocate reverb state for `sample_rate`. Not real-time safe.
    pub fn prepare(&mut self, sample_rate: u32) {
        self.reverb.prepare(sample_rate);
    }

    pub fn params(&self) -> &Arc<EffectParameters> {
        &self.params
    }

    /// Run the chain over `block`.
    pub fn process(&mut self, block: &mut AudioBlock) {
        let snapshot = self.params.snapshot();

        let gain = snapshot.gain_linear();
        for channel in block.channels_mut() {
            for sample in channel.iter_mut() {
                *sample *= gain;
            }
        }

        if !snapshot.reverb_enabled {
            self.reverb_active = false;
            return;
        }

        if !self.reverb_active {
            // Re-enabling starts from an empty tail
            self.reverb.reset();
            self.reverb_active = true;
        }
        self.reverb.set_room_size(snapshot.room_size);

        if let Some((left, right)) = block.stereo_mut() {
            self.reverb.process_stereo(left, right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_of(value: f32) -> AudioBlock {
        let mut block = AudioBlock::new(2, 64);
        for channel in block.channels_mut() {
            channel.fill(value);
        }
        block
    }

    #[test]
    fn test_gain_scales_every_sample() {
        for gain_db in [-50.0f32, -12.0, -6.0, 0.0, 6.0, 30.0] {
            let params = Arc::new(EffectParameters::new(gain_db, 0.5, false));
            let mut chain = EffectChain::new(params);
            chain.prepare(44_100);

            let mut block = block_of(0.25);
            chain.process(&mut block);

            let expected = 0.25 * 10f32.powf(gain_db / 20.0);
            for ch in 0..2 {
                for &s in block.channel(ch) {
                    assert!((s - expected).abs() <= expected.abs() * 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_minus_fifty_db_on_unity() {
        let params = Arc::new(EffectParameters::new(-50.0, 0.0, false));
        let mut chain = EffectChain::new(params);
        let mut block = block_of(1.0);
        chain.process(&mut block);
        assert!((block.channel(0)[0] - 0.003_162_277_7).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_reverb_is_bit_identical() {
        let params = Arc::new(EffectParameters::new(0.0, 1.0, false));
        let mut chain = EffectChain::new(params);
        chain.prepare(44_100);

        let mut block = AudioBlock::new(2, 32);
        for (i, s) in block.channel_mut(0).iter_mut().enumerate() {
            *s = (i as f32 * 0.1).sin();
        }
        let before = block.clone();
        chain.process(&mut block);
        assert_eq!(block.channel(0), before.channel(0));
        assert_eq!(block.channel(1), before.channel(1));
    }

    #[test]
    fn test_enabled_reverb_first_sample_is_dry_only() {
        let params = Arc::new(EffectParameters::new(0.0, 0.5, true));
        let mut chain = EffectChain::new(params);
        chain.prepare(44_100);

        let mut block = block_of(0.5);
        chain.process(&mut block);
        // Dry gain alone is 0.8, the comb tail has not arrived yet
        assert!((block.channel(0)[0] - 0.4).abs() < 1e-6);
    }

    fn impulse_block(frames: usize) -> AudioBlock {
        let mut block = AudioBlock::new(2, frames);
        block.channel_mut(0)[0] = 1.0;
        block.channel_mut(1)[0] = 1.0;
        block
    }

    #[test]
    fn test_enabled_reverb_adds_tail() {
        let params = Arc::new(EffectParameters::new(0.0, 0.5, true));
        let mut chain = EffectChain::new(params);
        chain.prepare(44_100);

        let mut block = impulse_block(2048);
        chain.process(&mut block);
        // Nothing but the dry impulse before the shortest comb delay
        assert!(block.channel(0)[1..1000].iter().all(|&s| s == 0.0));
        assert!(block.channel(0)[1100..].iter().any(|s| s.abs() > 1e-6));
    }

    #[test]
    fn test_room_size_change_applies_on_next_block() {
        let changed = Arc::new(EffectParameters::new(0.0, 0.0, true));
        let fixed = Arc::new(EffectParameters::new(0.0, 0.0, true));
        let mut changed_chain = EffectChain::new(changed.clone());
        let mut fixed_chain = EffectChain::new(fixed);
        changed_chain.prepare(44_100);
        fixed_chain.prepare(44_100);

        let mut a = impulse_block(4096);
        let mut b = impulse_block(4096);
        changed_chain.process(&mut a);
        fixed_chain.process(&mut b);
        assert_eq!(a.channel(0), b.channel(0));

        changed.set_room_size(1.0);
        assert!((changed_chain.params().room_size() - 1.0).abs() < f32::EPSILON);

        let mut a = AudioBlock::new(2, 4096);
        let mut b = AudioBlock::new(2, 4096);
        changed_chain.process(&mut a);
        fixed_chain.process(&mut b);
        assert_ne!(a.channel(0), b.channel(0));
        // Higher feedback keeps more energy in the tail
        let energy = |block: &AudioBlock| block.channel(0).iter().map(|s| s * s).sum::<f32>();
        assert!(energy(&a) > energy(&b));
    }

    #[test]
    fn test_parameters_clamp() {
        let params = EffectParameters::default();
        params.set_gain_db(100.0);
        assert_eq!(params.gain_db(), GAIN_DB_MAX);
        params.set_gain_db(-100.0);
        assert_eq!(params.gain_db(), GAIN_DB_MIN);
        params.set_room_size(-0.5);
        assert_eq!(params.room_size(), 0.0);
        params.set_room_size(f32::NAN);
        assert_eq!(params.room_size(), 0.0);
    }

    #[test]
    fn test_toggle_reverb_returns_new_state() {
        let params = EffectParameters::default();
        assert!(params.toggle_reverb());
        assert!(params.reverb_enabled());
        assert!(!params.toggle_reverb());
        assert!(!params.reverb_enabled());
    }
}
