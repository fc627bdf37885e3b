// src/audio/mod.rs
//! Audio module - decoding, transport, effect chain, and spectrogram analysis.

pub mod block;
pub mod decoder;
pub mod effects;
pub mod output;
pub mod position;
pub mod processor;
pub mod state;
pub mod transport;
pub mod visualizer;

// Re-export commonly used types
pub use block::AudioBlock;
pub use decoder::{DecodeError, DecodedSource};
pub use effects::{EffectChain, EffectParameters};
pub use output::AudioOutput;
pub use position::{format_time, PlaybackPosition};
pub use processor::AudioBlockProcessor;
pub use state::{TransportState, TransportStateMachine};
pub use transport::{PlaybackTransport, TransportHandle, TransportReader};
pub use visualizer::{RenderTick, SpectrogramImage};
