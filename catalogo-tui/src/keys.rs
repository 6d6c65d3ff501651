//! Keybinding definitions for the TUI.
//!
//! Only normal-mode keys are mapped here; while a text field has focus the
//! event loop routes characters to the field instead.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    OpenSearch,
    CycleActiveFilter,
    ToggleSort,
    PrevPage,
    NextPage,
    NewItem,
    EditItem,
    ToggleActive,
    AddRelation,
    OpenHelp,
    Refresh,
    Confirm,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('f') => Some(Action::CycleActiveFilter),
        KeyCode::Char('s') => Some(Action::ToggleSort),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::ToggleActive),
        KeyCode::Char('a') => Some(Action::AddRelation),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char(c @ '1'..='5') => Some(Action::SwitchView(c as usize - '1' as usize)),
        _ => None,
    }
}

pub const HELP_TEXT: &str = "Tab/BackTab switch view, 1-5 jump, j/k move, / search, \
f active filter, s sort, [ ] page, n new, e edit, d activate/deactivate, \
Enter open/confirm, a add tag, Esc back, Ctrl-R refresh, q quit";
