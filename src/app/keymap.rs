use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::model::Intent;
use crate::config::ControlsSettings;

/// Map a key press to an intent. Releases, repeats and unbound keys map to `None`.
pub fn intent_for_key(key: KeyEvent, controls: &ControlsSettings) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }

    let scrub = controls.scrub_seconds as f64;
    let intent = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Intent::TogglePlay,
        KeyCode::Char('s') => Intent::Stop,
        KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => Intent::Next,
        KeyCode::Char('h') | KeyCode::Char('b') | KeyCode::Left => Intent::Previous,
        KeyCode::Char('L') => Intent::SeekBy(scrub),
        KeyCode::Char('H') => Intent::SeekBy(-scrub),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
            Intent::VolumeBy(controls.volume_step)
        }
        KeyCode::Char('-') | KeyCode::Down => Intent::VolumeBy(-controls.volume_step),
        KeyCode::Char('r') => Intent::CycleLoopMode,
        KeyCode::Char('K') => Intent::ToggleDetails,
        KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}
