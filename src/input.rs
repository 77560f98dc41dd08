//! Keyboard events delivered by a display surface.
//!
//! This module provides [`KeyEvent`], the surface-agnostic key press the
//! console listens to, and [`last_line_of`], the buffer reduction applied when
//! a line is committed.
//!
//! # Key Names
//!
//! [`KeyEvent::parse`] accepts the dash-separated form used in keymaps:
//!
//! | Input | Key | Modifiers |
//! |-------|-----|-----------|
//! | `enter` | `Enter` | none |
//! | `a` | `Char('a')` | none |
//! | `ctrl-c` | `Char('c')` | control |
//! | `shift-tab` | `Tab` | shift |
//! | `alt-f4` | `F(4)` | alt |
//!
//! # Commit Key
//!
//! Only a plain Enter press commits a line. Modified presses such as
//! Shift+Enter are delivered to listeners but do not count as a commit.
//!
//! # Example
//!
//! ```
//! use console_pane::input::{KeyEvent, last_line_of};
//!
//! assert!(KeyEvent::parse("enter").unwrap().is_commit());
//! assert!(!KeyEvent::parse("shift-enter").unwrap().is_commit());
//! assert_eq!(last_line_of("hello\nworld"), "world");
//! ```

use std::fmt;

/// The key that was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Char(char),
    Backspace,
    Delete,
    Tab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// Modifier keys held during a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !(self.control || self.alt || self.shift)
    }
}

/// A single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

/// Error returned by [`KeyEvent::parse`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized key `{0}`")]
pub struct ParseKeyError(pub String);

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::none())
    }

    pub fn enter() -> Self {
        Self::plain(Key::Enter)
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    /// Parses `"ctrl-alt-x"` style key names.
    pub fn parse(source: &str) -> Result<Self, ParseKeyError> {
        let mut modifiers = Modifiers::none();
        let mut parts = source.split('-').peekable();
        let mut key_name = "";

        while let Some(part) = parts.next() {
            // A trailing empty part means the key itself is '-'
            if parts.peek().is_none() {
                key_name = if part.is_empty() { "-" } else { part };
                break;
            }
            match part {
                "ctrl" | "control" => modifiers.control = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "" => {
                    key_name = "-";
                    break;
                }
                _ => return Err(ParseKeyError(source.to_string())),
            }
        }

        let key = match key_name {
            "enter" | "return" => Key::Enter,
            "backspace" => Key::Backspace,
            "delete" => Key::Delete,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "space" => Key::Char(' '),
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            name => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    (Some('f'), Some(_)) => match name[1..].parse::<u8>() {
                        Ok(n @ 1..=24) => Key::F(n),
                        _ => return Err(ParseKeyError(source.to_string())),
                    },
                    _ => return Err(ParseKeyError(source.to_string())),
                }
            }
        };

        Ok(Self { key, modifiers })
    }

    /// Whether this press finalizes a line of input.
    pub fn is_commit(&self) -> bool {
        self.key == Key::Enter && self.modifiers.is_empty()
    }

    /// The character this press would insert into an editable buffer, if any.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.modifiers.control && !self.modifiers.alt => Some(c),
            Key::Tab if self.modifiers.is_empty() => Some('\t'),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.control {
            f.write_str("ctrl-")?;
        }
        if self.modifiers.alt {
            f.write_str("alt-")?;
        }
        if self.modifiers.shift {
            f.write_str("shift-")?;
        }
        match self.key {
            Key::Enter => f.write_str("enter"),
            Key::Char(' ') => f.write_str("space"),
            Key::Char(c) => write!(f, "{c}"),
            Key::Backspace => f.write_str("backspace"),
            Key::Delete => f.write_str("delete"),
            Key::Tab => f.write_str("tab"),
            Key::Escape => f.write_str("escape"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Home => f.write_str("home"),
            Key::End => f.write_str("end"),
            Key::PageUp => f.write_str("pageup"),
            Key::PageDown => f.write_str("pagedown"),
            Key::F(n) => write!(f, "f{n}"),
        }
    }
}

/// Returns the last line of a buffer snapshot.
///
/// Trailing empty lines are ignored, so `"a\nb\n"` yields `"b"`. An empty or
/// all-newline buffer yields `""`.
pub fn last_line_of(text: &str) -> &str {
    text.trim_end_matches('\n')
        .rsplit('\n')
        .next()
        .unwrap_or_default()
}
