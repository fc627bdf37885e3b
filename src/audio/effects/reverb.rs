// src/audio/effects/reverb.rs
//! Freeverb-style stereo reverb.
//!
//! Eight parallel damped comb filters per channel feed four series all-pass
//! filters. The right channel's delay lines are offset slightly to decorrelate
//! the two sides. All delay memory is allocated in [`Reverb::prepare`]; the
//! per-block path only reads and writes existing buffers.

/// Comb delay lengths in samples at 44.1 kHz.
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// All-pass delay lengths in samples at 44.1 kHz.
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];

/// Extra delay (samples) on the right channel.
const STEREO_SPREAD: usize = 23;

const INPUT_GAIN: f32 = 0.015;
const ALLPASS_FEEDBACK: f32 = 0.5;
const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 2.0;
const DAMP_SCALE: f32 = 0.4;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;

struct CombFilter {
    buffer: Vec<f32>,
    pos: usize,
    last: f32,
}

impl CombFilter {
    fn new(length: usize) -> Self {
        Self {
            buffer: vec![0.0; length.max(1)],
            pos: 0,
            last: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.buffer[self.pos];
        // One-pole lowpass in the feedback path
        self.last = output * (1.0 - damp) + self.last * damp;
        self.buffer[self.pos] = input + self.last * feedback;
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        output
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.last = 0.0;
        self.pos = 0;
    }
}

struct AllpassFilter {
    buffer: Vec<f32>,
    pos: usize,
}

impl AllpassFilter {
    fn new(length: usize) -> Self {
        Self {
            buffer: vec![0.0; length.max(1)],
            pos: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let buffered = self.buffer[self.pos];
        self.buffer[self.pos] = input + buffered * ALLPASS_FEEDBACK;
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        buffered - input
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

/// User-facing reverb parameters, all in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    pub room_size: f32,
    pub damping: f32,
    pub wet_level: f32,
    pub dry_level: f32,
    pub width: f32,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.33,
            dry_level: 0.4,
            width: 1.0,
        }
    }
}

/// Stateful stereo reverb. Tail state carries across blocks.
pub struct Reverb {
    settings: ReverbSettings,
    combs_l: Vec<CombFilter>,
    combs_r: Vec<CombFilter>,
    allpass_l: Vec<AllpassFilter>,
    allpass_r: Vec<AllpassFilter>,
    feedback: f32,
    damp: f32,
    wet1: f32,
    wet2: f32,
    dry: f32,
}

impl Reverb {
    /// Create an unprepared reverb. [`Reverb::prepare`] must run before audio flows.
    pub fn new(settings: ReverbSettings) -> Self {
        let mut reverb = Self {
            settings,
            combs_l: Vec::new(),
            combs_r: Vec::new(),
            allpass_l: Vec::new(),
            allpass_r: Vec::new(),
            feedback: 0.0,
            damp: 0.0,
            wet1: 0.0,
            wet2: 0.0,
            dry: 0.0,
        };
        reverb.update_coefficients();
        reverb
    }

    /// Size the delay lines for `sample_rate`, clearing any tail.
    pub fn prepare(&mut self, sample_rate: u32) {
        let scale = sample_rate as f64 / 44_100.0;
        let scaled = |len: usize| (len as f64 * scale).round() as usize;

        self.combs_l = COMB_TUNINGS.iter().map(|&l| CombFilter::new(scaled(l))).collect();
        self.combs_r = COMB_TUNINGS
            .iter()
            .map(|&l| CombFilter::new(scaled(l + STEREO_SPREAD)))
            .collect();
        self.allpass_l = ALLPASS_TUNINGS
            .iter()
            .map(|&l| AllpassFilter::new(scaled(l)))
            .collect();
        self.allpass_r = ALLPASS_TUNINGS
            .iter()
            .map(|&l| AllpassFilter::new(scaled(l + STEREO_SPREAD)))
            .collect();
    }

    pub fn is_prepared(&self) -> bool {
        !self.combs_l.is_empty()
    }

    /// Change the room size. Cheap; safe to call every block.
    pub fn set_room_size(&mut self, room_size: f32) {
        let room_size = room_size.clamp(0.0, 1.0);
        if room_size != self.settings.room_size {
            self.settings.room_size = room_size;
            self.update_coefficients();
        }
    }

    /// Clear the tail without reallocating.
    pub fn reset(&mut self) {
        self.combs_l.iter_mut().for_each(CombFilter::reset);
        self.combs_r.iter_mut().for_each(CombFilter::reset);
        self.allpass_l.iter_mut().for_each(AllpassFilter::reset);
        self.allpass_r.iter_mut().for_each(AllpassFilter::reset);
    }

    /// Process a stereo pair in place. Both slices must be the same length.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        if !self.is_prepared() {
            return;
        }

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let input = (*l + *r) * INPUT_GAIN;

            let mut out_l = 0.0f32;
            let mut out_r = 0.0f32;
            for comb in &mut self.combs_l {
                out_l += comb.process(input, self.damp, self.feedback);
            }
            for comb in &mut self.combs_r {
                out_r += comb.process(input, self.damp, self.feedback);
            }

            for ap in &mut self.allpass_l {
                out_l = ap.process(out_l);
            }
            for ap in &mut self.allpass_r {
                out_r = ap.process(out_r);
            }

            let dry_l = *l;
            let dry_r = *r;
            *l = out_l * self.wet1 + out_r * self.wet2 + dry_l * self.dry;
            *r = out_r * self.wet1 + out_l * self.wet2 + dry_r * self.dry;
        }
    }

    fn update_coefficients(&mut self) {
        let s = self.settings;
        let wet = s.wet_level * WET_SCALE;
        self.feedback = s.room_size * ROOM_SCALE + ROOM_OFFSET;
        self.damp = s.damping * DAMP_SCALE;
        self.wet1 = 0.5 * wet * (1.0 + s.width);
        self.wet2 = 0.5 * wet * (1.0 - s.width);
        self.dry = s.dry_level * DRY_SCALE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(len: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0; len];
        let mut right = vec![0.0; len];
        left[0] = 1.0;
        right[0] = 1.0;
        (left, right)
    }

    #[test]
    fn test_unprepared_reverb_is_passthrough() {
        let mut reverb = Reverb::new(ReverbSettings::default());
        let (mut left, mut right) = impulse(8);
        reverb.process_stereo(&mut left, &mut right);
        assert_eq!(left[0], 1.0);
        assert_eq!(right[0], 1.0);
    }

    #[test]
    fn test_tail_carries_across_blocks() {
        let mut reverb = Reverb::new(ReverbSettings::default());
        reverb.prepare(44_100);

        let (mut left, mut right) = impulse(512);
        reverb.process_stereo(&mut left, &mut right);

        // Shortest comb is 1116 samples, so the tail shows up in later blocks
        let mut energy = 0.0f32;
        for _ in 0..8 {
            let mut l = vec![0.0; 512];
            let mut r = vec![0.0; 512];
            reverb.process_stereo(&mut l, &mut r);
            energy += l.iter().chain(r.iter()).map(|s| s * s).sum::<f32>();
        }
        assert!(energy > 0.0);
    }

    #[test]
    fn test_reset_silences_tail() {
        let mut reverb = Reverb::new(ReverbSettings::default());
        reverb.prepare(44_100);
        let (mut left, mut right) = impulse(2048);
        reverb.process_stereo(&mut left, &mut right);
        reverb.reset();

        let mut l = vec![0.0; 4096];
        let mut r = vec![0.0; 4096];
        reverb.process_stereo(&mut l, &mut r);
        assert!(l.iter().chain(r.iter()).all(|&s| s == 0.0));
    }

    #[test]
    fn test_room_size_maps_to_feedback() {
        let mut reverb = Reverb::new(ReverbSettings::default());
        reverb.set_room_size(0.0);
        assert!((reverb.feedback - 0.7).abs() < 1e-6);
        reverb.set_room_size(2.0);
        assert_eq!(reverb.settings.room_size, 1.0);
        assert!((reverb.feedback - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_delay_lines_scale_with_sample_rate() {
        let mut reverb = Reverb::new(ReverbSettings::default());
        reverb.prepare(88_200);
        assert_eq!(reverb.combs_l[0].buffer.len(), 2232);
        assert_eq!(reverb.combs_r[0].buffer.len(), (1116 + 23) * 2);
    }
}
