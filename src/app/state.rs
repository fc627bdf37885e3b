// src/app/state.rs
//! Application state: browser, transport control, effects, and the render tick.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{widgets::ListState, Frame};

use crate::{
    audio::{
        decoder,
        output::OUTPUT_CHANNELS,
        transport,
        visualizer::sample_fifo,
        AudioBlockProcessor, AudioOutput, DecodedSource, EffectParameters, PlaybackPosition, PlaybackTransport,
        RenderTick, TransportHandle, TransportState, TransportStateMachine,
    },
    config::AppConfig,
    fs::{entry_path, load_entries, tail_path, Entry},
    ui::{
        keybindings::{key_to_action, Action},
        layout::compute_layout,
        widgets::{render_file_list, render_player_panel, render_spectrogram, PlayerView},
    },
};

/// Main application state.
pub struct App {
    /// Current directory being browsed
    pub current_dir: PathBuf,
    /// Directory entries
    pub entries: Vec<Entry>,
    /// List widget state
    pub state: ListState,
    /// Currently selected index
    pub selected: usize,

    config: AppConfig,
    transport: TransportHandle,
    machine: TransportStateMachine,
    params: Arc<EffectParameters>,
    render: RenderTick,
    position: PlaybackPosition,
    /// File name of the loaded track
    track_name: Option<String>,
    /// Last user-facing error, e.g. an unplayable file
    status: Option<String>,

    /// Output device; `None` when the processor is driven elsewhere (tests)
    audio: Option<AudioOutput>,
}

impl App {
    /// Create the application and start the audio device.
    pub fn new(config: AppConfig) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let (mut app, processor) = Self::detached(config, cwd);
        let audio = AudioOutput::open(
            processor,
            app.config.audio.block_frames,
            app.config.audio.sample_rate,
        )?;
        app.audio = Some(audio);
        Ok(app)
    }

    /// Create the application without an output device.
    ///
    /// The returned processor is what the device would run; the caller owns it.
    pub fn detached(config: AppConfig, dir: PathBuf) -> (Self, AudioBlockProcessor) {
        let config = config.sanitized();
        let (transport, reader) = transport::channel(config.audio.sample_rate);
        let (producer, consumer) = sample_fifo();
        let params = Arc::new(EffectParameters::new(
            config.audio.initial_gain_db,
            config.audio.initial_room_size,
            config.audio.reverb_enabled,
        ));
        let processor = AudioBlockProcessor::new(reader, params.clone(), producer);
        let render = RenderTick::new(
            consumer,
            config.display.spectrogram_width,
            config.display.spectrogram_height,
        );

        let mut state = ListState::default();
        state.select(Some(0));

        let app = Self {
            entries: load_entries(&dir),
            current_dir: dir,
            state,
            selected: 0,
            config,
            transport,
            machine: TransportStateMachine::new(),
            params,
            render,
            position: PlaybackPosition::default(),
            track_name: None,
            status: None,
            audio: None,
        };
        (app, processor)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn transport_state(&self) -> TransportState {
        self.machine.state()
    }

    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    pub fn params(&self) -> &Arc<EffectParameters> {
        &self.params
    }

    pub fn render_tick(&self) -> &RenderTick {
        &self.render
    }

    pub fn track_name(&self) -> Option<&str> {
        self.track_name.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn can_play(&self) -> bool {
        self.transport.has_source()
    }

    /// Decode and load `path`. On failure the transport state is untouched.
    pub fn open(&mut self, path: &Path) -> bool {
        match decoder::open(path, OUTPUT_CHANNELS, self.transport.sample_rate()) {
            Ok(source) => self.load_source(source),
            Err(e) => {
                log::warn!("open failed: {}", e);
                self.status = Some(e.to_string());
                false
            }
        }
    }

    /// Hand an already decoded source to the transport. Playback stops.
    pub fn load_source(&mut self, source: DecodedSource) -> bool {
        let name = source.name().to_string();
        if let Err(e) = self.transport.load(source) {
            log::warn!("load failed: {:#}", e);
            self.status = Some(format!("{e:#}"));
            return false;
        }

        // Loading halts playback; settle the machine so it starts from Stopped
        while self.machine.poll(&mut self.transport) {}
        if self.machine.state() == TransportState::Paused {
            self.machine.stop_pressed(&mut self.transport);
        }

        log::info!("opened {}", name);
        self.track_name = Some(name);
        self.status = None;
        self.position = PlaybackPosition::read(&self.transport);
        true
    }

    pub fn play_pause(&mut self) {
        if !self.can_play() {
            return;
        }
        self.machine.play_pressed(&mut self.transport);
    }

    pub fn stop(&mut self) {
        if !self.machine.state().stop_enabled() {
            return;
        }
        self.machine.stop_pressed(&mut self.transport);
    }

    pub fn seek_backward(&mut self) {
        self.machine.seek_backward(&mut self.transport);
        self.position = PlaybackPosition::read(&self.transport);
    }

    pub fn seek_forward(&mut self) {
        self.machine.seek_forward(&mut self.transport);
        self.position = PlaybackPosition::read(&self.transport);
    }

    pub fn adjust_gain(&mut self, steps: f32) {
        let db = self.params.gain_db() + steps * self.config.controls.gain_step_db;
        self.params.set_gain_db(db);
    }

    pub fn adjust_room_size(&mut self, steps: f32) {
        let size = self.params.room_size() + steps * self.config.controls.room_size_step;
        self.params.set_room_size(size);
    }

    pub fn toggle_reverb(&mut self) {
        let enabled = self.params.toggle_reverb();
        log::debug!("reverb {}", if enabled { "on" } else { "off" });
    }

    /// One render tick: deliver transport notifications, draw the next
    /// spectrogram column if a window is ready, refresh the position.
    ///
    /// Returns whether a new column was drawn.
    pub fn on_tick(&mut self) -> bool {
        while self.machine.poll(&mut self.transport) {}
        let drew = self.render.tick();
        self.position = PlaybackPosition::read(&self.transport);
        self.transport.collect_retired();
        drew
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key_to_action(&key) {
            Action::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            Action::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::Enter => self.enter_selected(),
            Action::Back => {
                if self.current_dir.pop() {
                    self.entries = load_entries(&self.current_dir);
                    self.selected = 0;
                }
            }
            Action::PlayPause => self.play_pause(),
            Action::Stop => self.stop(),
            Action::SeekBackward => self.seek_backward(),
            Action::SeekForward => self.seek_forward(),
            Action::GainUp => self.adjust_gain(1.0),
            Action::GainDown => self.adjust_gain(-1.0),
            Action::RoomUp => self.adjust_room_size(1.0),
            Action::RoomDown => self.adjust_room_size(-1.0),
            Action::ToggleReverb => self.toggle_reverb(),
            Action::Quit => return true,
            Action::None => {}
        }

        self.state.select(Some(self.selected));
        false
    }

    fn enter_selected(&mut self) {
        let Some(entry) = self.entries.get(self.selected).cloned() else {
            return;
        };
        let path = entry_path(&self.current_dir, &entry);

        if entry.is_dir {
            self.current_dir = path;
            self.entries = load_entries(&self.current_dir);
            self.selected = 0;
        } else {
            self.open(&path);
        }
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let layout = compute_layout(f.area());

        let title = format!("Files: {}", tail_path(&self.current_dir, 3));
        render_file_list(f, layout.files, &title, &self.entries, &mut self.state);

        let effects = self.params.snapshot();
        let view = PlayerView {
            track_name: self.track_name.as_deref(),
            loaded: self.can_play(),
            position: self.position,
            state: self.machine.state(),
            effects,
            status: self.status.as_deref(),
        };
        render_player_panel(f, layout.player, &view);

        render_spectrogram(f, layout.spectrogram, &self.render);
    }

    /// Stop playback and release the audio device.
    pub fn shutdown(&mut self) {
        self.transport.stop();
        if let Some(audio) = self.audio.take() {
            audio.shutdown();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
