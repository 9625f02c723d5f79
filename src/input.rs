//! Key classification
//!
//! Terminal key events are mapped once, at the edge, to the logical keys a
//! TV remote has. Screens only ever see [`KeyPress`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::nav::Direction;

/// Logical remote-control key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKey {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    Digit(u8),
    ChannelUp,
    ChannelDown,
    VolumeUp,
    VolumeDown,
    Mute,
    PlayPause,
    Guide,
    Favorite,
    Quit,
}

impl RemoteKey {
    /// The direction of an arrow key
    pub fn direction(&self) -> Option<Direction> {
        match self {
            RemoteKey::Up => Some(Direction::Up),
            RemoteKey::Down => Some(Direction::Down),
            RemoteKey::Left => Some(Direction::Left),
            RemoteKey::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// A classified key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: RemoteKey,
    /// Auto-repeat from a held key
    pub repeat: bool,
}

impl KeyPress {
    pub fn new(key: RemoteKey) -> Self {
        Self { key, repeat: false }
    }

    pub fn repeated(key: RemoteKey) -> Self {
        Self { key, repeat: true }
    }
}

impl From<RemoteKey> for KeyPress {
    fn from(key: RemoteKey) -> Self {
        Self::new(key)
    }
}

/// Map a terminal key event to a remote key; releases and unmapped keys
/// yield `None`
pub fn classify(event: &KeyEvent) -> Option<KeyPress> {
    let repeat = match event.kind {
        KeyEventKind::Press => false,
        KeyEventKind::Repeat => true,
        KeyEventKind::Release => return None,
    };

    if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(KeyPress::new(RemoteKey::Quit));
    }

    let key = match event.code {
        KeyCode::Up | KeyCode::Char('k') => RemoteKey::Up,
        KeyCode::Down | KeyCode::Char('j') => RemoteKey::Down,
        KeyCode::Left | KeyCode::Char('h') => RemoteKey::Left,
        KeyCode::Right | KeyCode::Char('l') => RemoteKey::Right,
        KeyCode::Enter => RemoteKey::Select,
        KeyCode::Esc | KeyCode::Backspace => RemoteKey::Back,
        KeyCode::Char(c @ '0'..='9') => RemoteKey::Digit(c as u8 - b'0'),
        KeyCode::PageUp => RemoteKey::ChannelUp,
        KeyCode::PageDown => RemoteKey::ChannelDown,
        KeyCode::Char('+') | KeyCode::Char('=') => RemoteKey::VolumeUp,
        KeyCode::Char('-') => RemoteKey::VolumeDown,
        KeyCode::Char('m') => RemoteKey::Mute,
        KeyCode::Char(' ') => RemoteKey::PlayPause,
        KeyCode::Char('g') => RemoteKey::Guide,
        KeyCode::Char('f') => RemoteKey::Favorite,
        KeyCode::Char('q') => RemoteKey::Quit,
        _ => return None,
    };

    Some(KeyPress { key, repeat })
}
