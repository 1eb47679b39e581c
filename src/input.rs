//! Key bindings: normal and vim-style.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Tap the figure under the cursor (or place the grid before it exists).
    Whack,
    /// Tap the table beside the grid.
    TapTable,
    Start,
    Pause,
    Quit,
    None,
}

/// Map key event to game action. Supports both normal (arrows, space) and vim (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Char('s') | KeyCode::Char('S') => Action::Start,
        KeyCode::Char('t') => Action::TapTable,
        KeyCode::Left | KeyCode::Char('h') => Action::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::CursorRight,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Whack,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_vim_and_arrows_agree() {
        assert_eq!(key_to_action(key(KeyCode::Char('h'))), key_to_action(key(KeyCode::Left)));
        assert_eq!(key_to_action(key(KeyCode::Char('j'))), Action::CursorDown);
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::CursorUp);
    }

    #[test]
    fn test_space_and_enter_whack() {
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::Whack);
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Whack);
    }

    #[test]
    fn test_ctrl_c_quits_other_modifiers_ignored() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::ALT)),
            Action::None
        );
    }
}
