//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the view to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    Newline,
    Backspace,
    Insert(char),
    /// Pick suggested prompt `n` (zero-based)
    Suggest(usize),
    ScrollUp,
    ScrollDown,
    FollowLatest,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    let mods = key.modifiers;
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if mods.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        // Shift or Alt turns Enter into a literal newline
        KeyCode::Enter if mods.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            Some(Action::Newline)
        }
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::F(n @ 1..=4) => Some(Action::Suggest(usize::from(n - 1))),
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        KeyCode::End => Some(Action::FollowLatest),
        KeyCode::Char(c) if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(Action::Insert(c))
        }
        _ => None,
    }
}
