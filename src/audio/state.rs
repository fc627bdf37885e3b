// src/audio/state.rs
//! Transport state machine driving play/pause/stop against a transport.

use super::transport::PlaybackTransport;

/// Seek step for the backward/forward commands, in seconds.
pub const SEEK_STEP_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Starting,
    Playing,
    Pausing,
    Paused,
    Stopping,
}

impl TransportState {
    /// Label for the play/pause control.
    pub fn play_label(self) -> &'static str {
        match self {
            TransportState::Stopped => "Play",
            // Stays "Pause" until the stop is confirmed
            TransportState::Starting | TransportState::Playing | TransportState::Stopping => "Pause",
            TransportState::Pausing | TransportState::Paused => "Resume",
        }
    }

    /// Label for the stop control.
    pub fn stop_label(self) -> &'static str {
        match self {
            TransportState::Pausing | TransportState::Paused => "Return to Zero",
            _ => "Stop",
        }
    }

    /// Whether the stop control does anything useful.
    pub fn stop_enabled(self) -> bool {
        self != TransportState::Stopped
    }
}

/// Owns the current [`TransportState`]; borrows the transport per call.
#[derive(Debug)]
pub struct TransportStateMachine {
    state: TransportState,
}

impl TransportStateMachine {
    pub fn new() -> Self {
        Self {
            state: TransportState::Stopped,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Play/pause toggle.
    pub fn play_pressed(&mut self, transport: &mut dyn PlaybackTransport) {
        match self.state {
            TransportState::Stopped | TransportState::Paused => {
                self.change_state(TransportState::Starting, transport)
            }
            TransportState::Playing => self.change_state(TransportState::Pausing, transport),
            _ => {}
        }
    }

    pub fn stop_pressed(&mut self, transport: &mut dyn PlaybackTransport) {
        if self.state == TransportState::Paused {
            self.change_state(TransportState::Stopped, transport);
        } else {
            self.change_state(TransportState::Stopping, transport);
        }
    }

    /// Re-evaluate after the transport reports a play/stop change.
    pub fn on_transport_status_changed(
        &mut self,
        is_playing: bool,
        transport: &mut dyn PlaybackTransport,
    ) {
        if is_playing {
            self.change_state(TransportState::Playing, transport);
            return;
        }
        match self.state {
            TransportState::Stopping | TransportState::Playing => {
                self.change_state(TransportState::Stopped, transport)
            }
            TransportState::Pausing => self.change_state(TransportState::Paused, transport),
            // Playback ended before it was ever reported as started
            TransportState::Starting => self.change_state(TransportState::Stopped, transport),
            _ => {}
        }
    }

    /// Deliver any pending transport notification. Returns whether one arrived.
    pub fn poll(&mut self, transport: &mut dyn PlaybackTransport) -> bool {
        match transport.take_status_change() {
            Some(is_playing) => {
                self.on_transport_status_changed(is_playing, transport);
                true
            }
            None => false,
        }
    }

    /// Jump back one second, stopping at the start.
    pub fn seek_backward(&self, transport: &mut dyn PlaybackTransport) {
        let now = transport.position_secs();
        let target = if now <= SEEK_STEP_SECS {
            0.0
        } else {
            now - SEEK_STEP_SECS
        };
        transport.set_position(target);
    }

    /// Jump forward one second, stopping at the end.
    pub fn seek_forward(&self, transport: &mut dyn PlaybackTransport) {
        let now = transport.position_secs();
        let duration = transport.duration_secs();
        let target = if now + SEEK_STEP_SECS > duration {
            duration
        } else {
            now + SEEK_STEP_SECS
        };
        transport.set_position(target);
    }

    fn change_state(&mut self, next: TransportState, transport: &mut dyn PlaybackTransport) {
        if self.state == next {
            return;
        }
        log::debug!("transport {:?} -> {:?}", self.state, next);
        self.state = next;

        match next {
            TransportState::Stopped => transport.set_position(0.0),
            TransportState::Starting => transport.start(),
            TransportState::Pausing => transport.stop(),
            TransportState::Stopping => {
                if transport.is_playing() {
                    transport.stop();
                } else {
                    // No notification will follow; settle now
                    self.change_state(TransportState::Stopped, transport);
                }
            }
            TransportState::Playing | TransportState::Paused => {}
        }
    }
}

impl Default for TransportStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
