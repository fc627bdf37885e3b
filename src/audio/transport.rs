// src/audio/transport.rs
//! Playback transport: a UI-side handle and an audio-side reader sharing atomics.
//!
//! The handle issues commands (load, start, stop, seek) and observes state.
//! The reader runs inside the audio callback, copies the next block out of the
//! loaded source and advances the play position. Decoded sources travel to the
//! audio thread through an SPSC queue as `basedrop::Shared` pointers. A source
//! released on the audio thread is only queued; the UI side frees it when it
//! collects.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use basedrop::{Collector, Shared};
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

use super::block::AudioBlock;
use super::decoder::DecodedSource;

/// Sentinel for "no seek pending".
const NO_SEEK: u64 = u64::MAX;

/// Sources that may be in flight between the UI and audio threads.
const HANDOFF_CAPACITY: usize = 4;

/// The transport operations the state machine and UI rely on.
pub trait PlaybackTransport {
    /// Begin (or resume) playback from the current position.
    fn start(&mut self);
    /// Halt playback, keeping the position.
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    fn position_secs(&self) -> f64;
    fn duration_secs(&self) -> f64;
    /// Move the play position. Targets outside `[0, duration]` are clamped.
    fn set_position(&mut self, secs: f64);
    /// Returns the current playing state once for every play/stop change.
    fn take_status_change(&mut self) -> Option<bool>;
}

struct TransportShared {
    playing: AtomicBool,
    status_changed: AtomicBool,
    position: AtomicU64,
    seek_target: AtomicU64,
    sample_rate: AtomicU32,
}

/// Create a connected handle/reader pair running at `sample_rate`.
pub fn channel(sample_rate: u32) -> (TransportHandle, TransportReader) {
    let shared = Arc::new(TransportShared {
        playing: AtomicBool::new(false),
        status_changed: AtomicBool::new(false),
        position: AtomicU64::new(0),
        seek_target: AtomicU64::new(NO_SEEK),
        sample_rate: AtomicU32::new(sample_rate.max(1)),
    });

    let (load_tx, load_rx) = HeapRb::<Shared<DecodedSource>>::new(HANDOFF_CAPACITY).split();

    let handle = TransportHandle {
        shared: shared.clone(),
        loads: load_tx,
        collector: Collector::new(),
        current: None,
    };
    let reader = TransportReader {
        shared,
        loads: load_rx,
        source: None,
        cursor: 0,
    };
    (handle, reader)
}

/// UI-side control of the transport.
pub struct TransportHandle {
    shared: Arc<TransportShared>,
    loads: HeapProd<Shared<DecodedSource>>,
    collector: Collector,
    current: Option<Shared<DecodedSource>>,
}

impl TransportHandle {
    /// Replace the current source. Playback halts and the position returns to 0.
    pub fn load(&mut self, source: DecodedSource) -> Result<()> {
        let source = Shared::new(&self.collector.handle(), source);
        if self.loads.try_push(source.clone()).is_err() {
            bail!("audio thread is not consuming sources");
        }
        if self.shared.playing.swap(false, Ordering::SeqCst) {
            self.shared.status_changed.store(true, Ordering::SeqCst);
        }
        self.shared.seek_target.store(NO_SEEK, Ordering::SeqCst);
        self.shared.position.store(0, Ordering::SeqCst);
        self.current = Some(source);
        Ok(())
    }

    pub fn has_source(&self) -> bool {
        self.current.is_some()
    }

    pub fn source(&self) -> Option<&DecodedSource> {
        self.current.as_deref()
    }

    pub fn sample_rate(&self) -> u32 {
        self.shared.sample_rate.load(Ordering::SeqCst)
    }

    /// Free sources the audio thread has released. Returns how many.
    pub fn collect_retired(&mut self) -> usize {
        let mut count = 0;
        while self.collector.collect_one() {
            count += 1;
        }
        count
    }

    fn frames_to_secs(&self, frames: u64) -> f64 {
        frames as f64 / self.sample_rate() as f64
    }
}

impl PlaybackTransport for TransportHandle {
    fn start(&mut self) {
        if self.current.is_none() {
            return;
        }
        if !self.shared.playing.swap(true, Ordering::SeqCst) {
            self.shared.status_changed.store(true, Ordering::SeqCst);
        }
    }

    fn stop(&mut self) {
        if self.shared.playing.swap(false, Ordering::SeqCst) {
            self.shared.status_changed.store(true, Ordering::SeqCst);
        }
    }

    fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::SeqCst)
    }

    fn position_secs(&self) -> f64 {
        // A seek not yet applied by the audio thread is already the position
        let target = self.shared.seek_target.load(Ordering::SeqCst);
        let frames = if target != NO_SEEK {
            target
        } else {
            self.shared.position.load(Ordering::SeqCst)
        };
        self.frames_to_secs(frames).min(self.duration_secs())
    }

    fn duration_secs(&self) -> f64 {
        self.current
            .as_ref()
            .map(|s| self.frames_to_secs(s.frames()))
            .unwrap_or(0.0)
    }

    fn set_position(&mut self, secs: f64) {
        let secs = secs.clamp(0.0, self.duration_secs());
        let frames = (secs * self.sample_rate() as f64).round() as u64;
        self.shared.seek_target.store(frames, Ordering::SeqCst);
        self.shared.position.store(frames, Ordering::SeqCst);
    }

    fn take_status_change(&mut self) -> Option<bool> {
        if self.shared.status_changed.swap(false, Ordering::SeqCst) {
            Some(self.is_playing())
        } else {
            None
        }
    }
}

/// Audio-side reader. Lives inside the block processor.
pub struct TransportReader {
    shared: Arc<TransportShared>,
    loads: HeapCons<Shared<DecodedSource>>,
    source: Option<Shared<DecodedSource>>,
    cursor: u64,
}

impl TransportReader {
    /// Record the output format before the stream starts.
    pub fn prepare(&mut self, _block_frames: usize, sample_rate: u32) {
        self.shared
            .sample_rate
            .store(sample_rate.max(1), Ordering::SeqCst);
    }

    /// Fill `block` with the next frames of the loaded source.
    ///
    /// Returns `false` when no source is loaded; the block contents are then
    /// zeroed. A loaded but stopped transport produces silence and `true`.
    pub fn read_block(&mut self, block: &mut AudioBlock) -> bool {
        while let Some(next) = self.loads.try_pop() {
            // Dropping a Shared only enqueues it for the UI-side collector
            self.source = Some(next);
            self.cursor = 0;
        }

        let target = self.shared.seek_target.swap(NO_SEEK, Ordering::SeqCst);

        let Some(source) = self.source.as_ref() else {
            block.clear();
            return false;
        };

        let total = source.frames();
        if target != NO_SEEK {
            self.cursor = target.min(total);
        }

        if !self.shared.playing.load(Ordering::SeqCst) {
            block.clear();
            self.shared.position.store(self.cursor, Ordering::SeqCst);
            return true;
        }

        let src_channels = source.channels() as usize;
        let samples = source.samples();
        let available = ((total - self.cursor) as usize).min(block.num_frames());
        let start = self.cursor as usize * src_channels;

        for (ch, out) in block.channels_mut().enumerate() {
            let src_ch = ch.min(src_channels - 1);
            for (frame, sample) in out[..available].iter_mut().enumerate() {
                *sample = samples[start + frame * src_channels + src_ch];
            }
            out[available..].fill(0.0);
        }

        self.cursor += available as u64;
        if self.cursor >= total && self.shared.playing.swap(false, Ordering::SeqCst) {
            self.shared.status_changed.store(true, Ordering::SeqCst);
        }
        self.shared.position.store(self.cursor, Ordering::SeqCst);
        true
    }
}
