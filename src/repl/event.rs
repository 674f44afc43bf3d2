use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Keys the shell can bind handlers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Function keys, `F(2)` is F2.
    F(u8),
    ControlSpace,
    Control(char),
    Alt(char),
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Escape,
}

/// What the editor receives from the terminal.
pub enum InputEvent {
    Key(Key),
    /// A resize or an unmapped key: nothing to dispatch, just redraw.
    Redraw,
}

/// Translates a crossterm key event into a [`Key`].
///
/// Returns `None` for releases and keys the shell has no name for.
pub fn key_from_event(key_event: KeyEvent) -> Option<Key> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);
    let key = match key_event.code {
        // Terminals send NUL for Ctrl+Space; crossterm reports it either way
        KeyCode::Char(' ') if ctrl => Key::ControlSpace,
        KeyCode::Null => Key::ControlSpace,
        KeyCode::Char(c) if ctrl => Key::Control(c.to_ascii_lowercase()),
        KeyCode::Char(c) if alt => Key::Alt(c),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::F(n) => Key::F(n),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };
    Some(key)
}

/// Blocks until the terminal produces an event.
pub fn read_event() -> io::Result<InputEvent> {
    loop {
        match event::read()? {
            Event::Key(key_event) => {
                log::debug!(
                    "Key event: {:?} with modifiers {:?}",
                    key_event.code,
                    key_event.modifiers
                );
                return Ok(match key_from_event(key_event) {
                    Some(key) => InputEvent::Key(key),
                    None => InputEvent::Redraw,
                });
            }
            Event::Resize(_, _) => return Ok(InputEvent::Redraw),
            _ => {}
        }
    }
}
