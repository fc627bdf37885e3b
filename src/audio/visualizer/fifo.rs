// src/audio/visualizer/fifo.rs
//! Single-producer/single-consumer window accumulator feeding the analyzer.
//!
//! The audio thread pushes mono samples one at a time. Every `FFT_SIZE`
//! samples a completed window is handed across a one-slot ring buffer; a
//! full slot doubles as the "window ready" flag. If the render side has not
//! drained the previous window yet, the new one is dropped rather than
//! blocking or overwriting a window that may be mid-read.

use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

/// log2 of the analysis window length.
pub const FFT_ORDER: usize = 10;

/// Samples per analysis window.
pub const FFT_SIZE: usize = 1 << FFT_ORDER;

/// One completed analysis window.
pub type Window = [f32; FFT_SIZE];

/// Create a connected producer/consumer pair.
pub fn sample_fifo() -> (FifoProducer, FifoConsumer) {
    let (tx, rx) = HeapRb::<Window>::new(1).split();
    (
        FifoProducer {
            fifo: [0.0; FFT_SIZE],
            index: 0,
            ready: tx,
            dropped: 0,
        },
        FifoConsumer { ready: rx },
    )
}

/// Audio-thread half. Owned by the block processor.
pub struct FifoProducer {
    fifo: Window,
    index: usize,
    ready: HeapProd<Window>,
    dropped: u64,
}

impl FifoProducer {
    /// Append one sample. O(1), never allocates or blocks.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.fifo[self.index] = sample;
        self.index += 1;

        if self.index == FFT_SIZE {
            if self.ready.try_push(self.fifo).is_err() {
                self.dropped += 1;
            }
            self.index = 0;
        }
    }

    /// Windows discarded because the consumer was behind.
    pub fn dropped_windows(&self) -> u64 {
        self.dropped
    }
}

/// Render-side half. Owned by the render tick.
pub struct FifoConsumer {
    ready: HeapCons<Window>,
}

impl FifoConsumer {
    /// Take the pending window, if one is ready. "Nothing yet" is normal.
    pub fn try_drain_window(&mut self) -> Option<Window> {
        self.ready.try_pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_ready_after_fft_size_pushes() {
        let (mut producer, mut consumer) = sample_fifo();
        for _ in 0..FFT_SIZE - 1 {
            producer.push(1.0);
        }
        assert!(consumer.try_drain_window().is_none());

        producer.push(1.0);
        let window = consumer.try_drain_window().unwrap();
        assert!(window.iter().all(|&s| s == 1.0));
        assert!(consumer.try_drain_window().is_none());
    }

    #[test]
    fn test_window_holds_last_pushes_in_order() {
        let (mut producer, mut consumer) = sample_fifo();
        let total = FFT_SIZE * 3 + 17;
        for i in 0..total {
            producer.push(i as f32);
            if (i + 1) % FFT_SIZE == 0 {
                let window = consumer.try_drain_window().unwrap();
                let first = (i + 1 - FFT_SIZE) as f32;
                for (k, &s) in window.iter().enumerate() {
                    assert_eq!(s, first + k as f32);
                }
            }
        }
        assert_eq!(producer.dropped_windows(), 0);
    }

    #[test]
    fn test_pending_window_is_preserved_under_backpressure() {
        let (mut producer, mut consumer) = sample_fifo();
        for i in 0..FFT_SIZE * 3 {
            producer.push(i as f32);
        }
        assert_eq!(producer.dropped_windows(), 2);

        // The first window survives; later ones were dropped
        let window = consumer.try_drain_window().unwrap();
        assert_eq!(window[0], 0.0);
        assert_eq!(window[FFT_SIZE - 1], (FFT_SIZE - 1) as f32);
        assert!(consumer.try_drain_window().is_none());

        // Next completed window is accepted again
        for i in 0..FFT_SIZE {
            producer.push(i as f32 * 2.0);
        }
        let window = consumer.try_drain_window().unwrap();
        assert_eq!(window[1], 2.0);
    }

    #[test]
    fn test_cross_thread_handoff() {
        let (mut producer, mut consumer) = sample_fifo();
        let writer = std::thread::spawn(move || {
            for i in 0..FFT_SIZE * 64 {
                producer.push((i % FFT_SIZE) as f32);
            }
        });

        let mut received = 0;
        while !writer.is_finished() || received == 0 {
            if let Some(window) = consumer.try_drain_window() {
                for (k, &s) in window.iter().enumerate() {
                    assert_eq!(s, k as f32);
                }
                received += 1;
            }
            std::thread::yield_now();
        }
        writer.join().unwrap();
        assert!(received >= 1);
    }
}
