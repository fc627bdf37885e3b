// src/lib.rs
//! Spectroplay - a terminal audio player with gain, reverb and a live spectrogram.
//!
//! The audio thread runs [`audio::AudioBlockProcessor`]; the UI thread owns
//! [`app::App`] and drives the transport state machine and the render tick.

pub mod app;
pub mod audio;
pub mod config;
pub mod fs;
pub mod ui;
