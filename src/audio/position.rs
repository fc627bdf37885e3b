// src/audio/position.rs
//! Playback position snapshot and the `M:SS.mmm` time format.

use super::transport::PlaybackTransport;

/// Position and length of the loaded track, refreshed once per UI tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackPosition {
    pub current_secs: f64,
    pub duration_secs: f64,
}

impl PlaybackPosition {
    pub fn read(transport: &dyn PlaybackTransport) -> Self {
        Self {
            current_secs: transport.position_secs(),
            duration_secs: transport.duration_secs(),
        }
    }

    /// Fraction played in `[0, 1]`. A zero-length track counts as one second.
    pub fn progress(&self) -> f64 {
        let duration = if self.duration_secs > 0.0 {
            self.duration_secs
        } else {
            1.0
        };
        (self.current_secs / duration).clamp(0.0, 1.0)
    }
}

/// Placeholder shown before any track is loaded.
pub const NO_TIME: &str = "--:--.---";

/// Format seconds as `M:SS.mmm`; minutes are not padded.
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = seconds.floor() as u64 % 60;
    let millis = (seconds * 1000.0).floor() as u64 % 1000;
    format!("{minutes}:{secs:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.000");
        assert_eq!(format_time(61.5), "1:01.500");
        assert_eq!(format_time(3599.5), "59:59.500");
        assert_eq!(format_time(754.25), "12:34.250");
        assert_eq!(format_time(-3.0), "0:00.000");
    }

    #[test]
    fn test_progress_handles_empty_duration() {
        let empty = PlaybackPosition::default();
        assert_eq!(empty.progress(), 0.0);

        let half = PlaybackPosition {
            current_secs: 5.0,
            duration_secs: 10.0,
        };
        assert_eq!(half.progress(), 0.5);
    }
}
