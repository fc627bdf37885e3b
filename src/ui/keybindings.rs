// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Enter,
    Back,
    PlayPause,
    Stop,
    SeekBackward,
    SeekForward,
    GainUp,
    GainDown,
    RoomUp,
    RoomDown,
    ToggleReverb,
    Quit,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: &KeyEvent) -> Action {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Enter | KeyCode::Right => Action::Enter,
        KeyCode::Left | KeyCode::Backspace => Action::Back,
        KeyCode::Char(' ') => Action::PlayPause,
        KeyCode::Char('s') => Action::Stop,
        KeyCode::Char(',') | KeyCode::Char('<') => Action::SeekBackward,
        KeyCode::Char('.') | KeyCode::Char('>') => Action::SeekForward,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::GainUp,
        KeyCode::Char('-') => Action::GainDown,
        KeyCode::Char(']') => Action::RoomUp,
        KeyCode::Char('[') => Action::RoomDown,
        KeyCode::Char('r') => Action::ToggleReverb,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

/// One-line key help shown under the player.
pub const HELP: &str =
    "␣ play/pause  s stop  ,/. seek  -/+ gain  [/] room  r reverb  q quit";

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_transport_keys() {
        assert_eq!(key_to_action(&press(KeyCode::Char(' '))), Action::PlayPause);
        assert_eq!(key_to_action(&press(KeyCode::Char('s'))), Action::Stop);
        assert_eq!(key_to_action(&press(KeyCode::Char(','))), Action::SeekBackward);
        assert_eq!(key_to_action(&press(KeyCode::Char('>'))), Action::SeekForward);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(&key), Action::Quit);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(key_to_action(&key), Action::None);
    }
}
