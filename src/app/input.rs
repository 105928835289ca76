use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::app::{Message, Model};

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

/// Map a terminal event to a message for the current model state.
pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) => handle_key(*key, model),
        Event::Mouse(mouse) => handle_mouse(*mouse, model),
        Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
        _ => None,
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    if model.is_searching() {
        return match key.code {
            KeyCode::Enter => Some(Message::SubmitSearch),
            KeyCode::Esc => Some(Message::CancelSearch),
            KeyCode::Backspace => Some(Message::SearchBackspace),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::SearchInput(c))
            }
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
        KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),
        KeyCode::Char('/') => Some(Message::StartSearch),
        KeyCode::Char('n') => Some(Message::NextMatch),
        KeyCode::Char('N') => Some(Message::PrevMatch),
        KeyCode::Char('d') if ctrl => Some(Message::HalfPageDown),
        KeyCode::Char('u') if ctrl => Some(Message::HalfPageUp),
        KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp(1)),
        KeyCode::Char('f' | ' ') | KeyCode::PageDown => Some(Message::PageDown),
        KeyCode::Char('b') | KeyCode::PageUp => Some(Message::PageUp),
        KeyCode::Char('d') => Some(Message::HalfPageDown),
        KeyCode::Char('u') => Some(Message::HalfPageUp),
        _ => None,
    }
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.is_searching() {
        return None;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_LINES)),
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_LINES)),
        _ => None,
    }
}
