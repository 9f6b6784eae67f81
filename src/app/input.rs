//! Key mapping

use crossterm::event::{KeyCode, KeyModifiers};

/// Key mapping for the chat screen
pub fn key_to_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match key {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('b') => Some(Action::ToggleSidebar),
            KeyCode::Char('n') => Some(Action::SidebarNext),
            KeyCode::Char('p') => Some(Action::SidebarPrevious),
            KeyCode::Char('o') => Some(Action::OpenSelected),
            KeyCode::Char('t') => Some(Action::OpenTableOfContents),
            KeyCode::Char('a') => Some(Action::Home),
            KeyCode::Char('e') => Some(Action::End),
            KeyCode::Char('u') => Some(Action::PageUp),
            KeyCode::Char('d') => Some(Action::PageDown),
            _ => None,
        };
    }

    if modifiers.contains(KeyModifiers::ALT) {
        return match key {
            KeyCode::Char(c @ '1'..='9') => {
                c.to_digit(10).map(|d| Action::ActivateAction(d as usize - 1))
            }
            _ => None,
        };
    }

    match key {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextAction),
        KeyCode::BackTab => Some(Action::PrevAction),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Home => Some(Action::Home),
        KeyCode::End => Some(Action::End),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Delete => Some(Action::Delete),
        KeyCode::Char(c) => Some(Action::Insert(c)),
        _ => None,
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Editing
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,

    // Navigation
    Up,
    Down,
    PageUp,
    PageDown,

    // Quick actions
    NextAction,
    PrevAction,
    /// Activate the quick action at this index
    ActivateAction(usize),

    Submit,

    // Chapter list
    ToggleSidebar,
    SidebarNext,
    SidebarPrevious,
    /// Open the selected chapter list row
    OpenSelected,
    OpenTableOfContents,

    Quit,
}
