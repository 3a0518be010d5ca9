//! Keyboard input handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::commands::Command;

/// Converts key events into commands
#[derive(Debug, Default)]
pub struct KeyHandler;

impl KeyHandler {
    pub fn new() -> Self {
        Self
    }

    /// Handle a key event and return a command if applicable
    pub fn handle_key(&self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }

        match key.code {
            // Transport
            KeyCode::Char(' ') => Some(Command::TogglePlay),
            KeyCode::Char('p') => Some(Command::Play),
            KeyCode::Char('s') => Some(Command::Pause),

            // Track list navigation (vim-style plus arrows)
            KeyCode::Char('j') | KeyCode::Down => Some(Command::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Command::SelectPrev),
            KeyCode::Char('g') | KeyCode::Home => Some(Command::SelectFirst),
            KeyCode::Char('G') | KeyCode::End => Some(Command::SelectLast),
            KeyCode::Enter => Some(Command::DropSelected),

            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_transport_keys() {
        let handler = KeyHandler::new();
        assert_eq!(
            handler.handle_key(key(KeyCode::Char(' '))),
            Some(Command::TogglePlay)
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('p'))),
            Some(Command::Play)
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('s'))),
            Some(Command::Pause)
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        let handler = KeyHandler::new();
        let event = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert_eq!(handler.handle_key(event), Some(Command::Quit));
    }

    #[test]
    fn test_unmapped_key_is_none() {
        let handler = KeyHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('z'))), None);
    }
}
