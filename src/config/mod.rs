// src/config/mod.rs
//! User configuration loaded from `<config dir>/spectroplay/config.yaml`.
//!
//! Every field has a default, so a partial (or missing) file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::effects::{GAIN_DB_MAX, GAIN_DB_MIN};
use crate::audio::visualizer::spectrogram::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub display: DisplayConfig,
    pub controls: ControlsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Frames processed per audio block.
    pub block_frames: usize,
    /// Output sample rate; decoded files are resampled to this.
    pub sample_rate: u32,
    pub initial_gain_db: f32,
    pub initial_room_size: f32,
    pub reverb_enabled: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            block_frames: 512,
            sample_rate: 44_100,
            initial_gain_db: 0.0,
            initial_room_size: 0.0,
            reverb_enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Render ticks per second.
    pub tick_hz: u32,
    pub spectrogram_width: u32,
    pub spectrogram_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            spectrogram_width: DEFAULT_WIDTH,
            spectrogram_height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub gain_step_db: f32,
    pub room_size_step: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            gain_step_db: 1.0,
            room_size_step: 0.05,
        }
    }
}

impl AppConfig {
    /// Clamp every value into its usable range.
    pub fn sanitized(mut self) -> Self {
        let a = &mut self.audio;
        a.block_frames = a.block_frames.clamp(32, 8192);
        a.sample_rate = a.sample_rate.clamp(8_000, 192_000);
        a.initial_gain_db = a.initial_gain_db.clamp(GAIN_DB_MIN, GAIN_DB_MAX);
        a.initial_room_size = a.initial_room_size.clamp(0.0, 1.0);

        let d = &mut self.display;
        d.tick_hz = d.tick_hz.clamp(1, 240);
        d.spectrogram_width = d.spectrogram_width.clamp(16, 4096);
        d.spectrogram_height = d.spectrogram_height.clamp(16, 4096);

        let c = &mut self.controls;
        c.gain_step_db = c.gain_step_db.clamp(0.1, 10.0);
        c.room_size_step = c.room_size_step.clamp(0.01, 0.5);
        self
    }
}

/// Default config file location, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("spectroplay").join("config.yaml"))
}

/// Load configuration from `path`, falling back to defaults on any problem.
pub fn load_config(path: &Path) -> AppConfig {
    if !path.exists() {
        log::info!("load_config: {:?} not found, using defaults", path);
        return AppConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                let config = config.sanitized();
                log::info!(
                    "load_config: block {} frames @ {} Hz, tick {} Hz",
                    config.audio.block_frames,
                    config.audio.sample_rate,
                    config.display.tick_hz
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: failed to parse config: {}, using defaults", e);
                AppConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: failed to read config: {}, using defaults", e);
            AppConfig::default()
        }
    }
}
