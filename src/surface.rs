//! Display surfaces.
//!
//! A display surface is the widget the console writes to and listens on: a
//! text sink with a readable buffer and a key-event source. Rendering, layout
//! and window management belong to the surface; the console only needs the
//! operations on [`DisplaySurface`].
//!
//! # Provided Surface
//!
//! [`BufferSurface`] is a headless surface backed by a [`ropey::Rope`]. It is
//! what the tests and the demo binary use, and it is a reasonable base for a
//! toolkit adapter that repaints from [`BufferSurface::text`] and
//! [`BufferSurface::spans`].
//!
//! # Thread Safety
//!
//! All buffer mutation in [`BufferSurface`] happens under a single
//! `parking_lot::Mutex`, so a commit-time snapshot taken from a key listener
//! never interleaves with an append issued by a scheduler callback. Surfaces
//! built on a native widget should give the same guarantee by routing every
//! mutation through the widget's event-dispatch context.
//!
//! # Example
//!
//! ```
//! use console_pane::{BufferSurface, DisplaySurface};
//! use console_pane::input::KeyEvent;
//!
//! let surface = BufferSurface::new();
//! surface.append_text("hello\n");
//! surface.type_str("world");
//! surface.press(KeyEvent::enter());
//!
//! assert_eq!(surface.text(), "hello\nworld\n");
//! ```

use crate::colors::{ColorPalette, Rgb, TextStyle};
use crate::config::ConsoleConfig;
use crate::event::{KeyListener, KeyListeners, ListenerId};
use crate::input::{Key, KeyEvent};
use parking_lot::{Mutex, ReentrantMutex};
use ropey::Rope;
use std::ops::Range;

/// The widget a [`Console`](crate::Console) drives.
pub trait DisplaySurface: Send + Sync {
    /// Appends unstyled text at the end of the buffer.
    fn append_text(&self, text: &str);

    /// Appends text with a style.
    ///
    /// Surfaces without styled output ignore the style.
    fn append_styled(&self, text: &str, style: TextStyle) {
        let _ = style;
        self.append_text(text);
    }

    /// Whether [`append_styled`](Self::append_styled) keeps styles.
    fn supports_styles(&self) -> bool {
        false
    }

    /// Replaces the whole buffer.
    fn set_text(&self, text: &str);

    fn clear(&self) {
        self.set_text("");
    }

    /// Snapshot of the whole buffer.
    fn text(&self) -> String;

    /// Snapshot of the buffer split on `\n`.
    fn lines(&self) -> Vec<String> {
        self.text().split('\n').map(str::to_owned).collect()
    }

    fn add_key_listener(&self, listener: KeyListener) -> ListenerId;

    fn remove_key_listener(&self, id: ListenerId) -> bool;

    /// Applies window, font and color settings. Called once by `Console::run`.
    fn apply_config(&self, config: &ConsoleConfig) {
        let _ = config;
    }
}

/// A run of styled text, in char offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledSpan {
    pub range: Range<usize>,
    pub style: TextStyle,
}

struct Buffer {
    text: Rope,
    spans: Vec<StyledSpan>,
    editable: bool,
    config: Option<ConsoleConfig>,
}

impl Buffer {
    fn push(&mut self, text: &str) -> Range<usize> {
        let start = self.text.len_chars();
        self.text.insert(start, text);
        start..self.text.len_chars()
    }

    fn reset(&mut self, text: &str) {
        self.text = Rope::from_str(text);
        self.spans.clear();
    }

    fn pop_char(&mut self) {
        let len = self.text.len_chars();
        if len == 0 {
            return;
        }
        self.text.remove(len - 1..len);
        for span in &mut self.spans {
            span.range.end = span.range.end.min(len - 1);
        }
        self.spans.retain(|span| !span.range.is_empty());
    }
}

/// Headless, in-memory display surface.
pub struct BufferSurface {
    buffer: Mutex<Buffer>,
    listeners: KeyListeners,
    /// Serializes key delivery so listeners observe presses in order.
    dispatch: ReentrantMutex<()>,
}

impl Default for BufferSurface {
    fn default() -> Self {
        Self {
            buffer: Mutex::new(Buffer {
                text: Rope::new(),
                spans: Vec::new(),
                editable: true,
                config: None,
            }),
            listeners: KeyListeners::new(),
            dispatch: ReentrantMutex::new(()),
        }
    }
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a key press the way a native text pane does.
    ///
    /// Listeners see the press before it edits the buffer, so on Enter the
    /// buffer's last line is still the line being committed. When the surface
    /// is editable, printable keys then insert, Enter inserts a newline and
    /// Backspace deletes the last character.
    pub fn press(&self, event: KeyEvent) {
        let _serial = self.dispatch.lock();
        self.listeners.dispatch(&event);

        let mut buffer = self.buffer.lock();
        if !buffer.editable {
            return;
        }
        if let Some(c) = event.printable() {
            let mut utf8 = [0u8; 4];
            buffer.push(c.encode_utf8(&mut utf8));
            return;
        }
        match event.key {
            Key::Enter if !event.modifiers.control && !event.modifiers.alt => {
                buffer.push("\n");
            }
            Key::Backspace => buffer.pop_char(),
            _ => {}
        }
    }

    /// Presses one key per character, without committing.
    pub fn type_str(&self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => self.press(KeyEvent::enter()),
                c => self.press(KeyEvent::char(c)),
            }
        }
    }

    /// Types a line and presses Enter.
    pub fn type_line(&self, line: &str) {
        self.type_str(line);
        self.press(KeyEvent::enter());
    }

    pub fn is_editable(&self) -> bool {
        self.buffer.lock().editable
    }

    pub fn set_editable(&self, editable: bool) {
        self.buffer.lock().editable = editable;
    }

    /// Styled runs currently in the buffer.
    pub fn spans(&self) -> Vec<StyledSpan> {
        self.buffer.lock().spans.clone()
    }

    /// The text covered by a span.
    pub fn span_text(&self, span: &StyledSpan) -> String {
        let buffer = self.buffer.lock();
        let end = span.range.end.min(buffer.text.len_chars());
        let start = span.range.start.min(end);
        buffer.text.slice(start..end).to_string()
    }

    /// The span's foreground, resolved through the applied color palette.
    pub fn span_color(&self, span: &StyledSpan) -> Rgb {
        let buffer = self.buffer.lock();
        match &buffer.config {
            Some(config) => config.colors.resolve_style(&span.style),
            None => ColorPalette::default().resolve_style(&span.style),
        }
    }

    pub fn len_lines(&self) -> usize {
        self.buffer.lock().text.len_lines()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The configuration last applied by the console, if any.
    pub fn applied_config(&self) -> Option<ConsoleConfig> {
        self.buffer.lock().config.clone()
    }
}

impl DisplaySurface for BufferSurface {
    fn append_text(&self, text: &str) {
        self.buffer.lock().push(text);
    }

    fn append_styled(&self, text: &str, style: TextStyle) {
        let mut buffer = self.buffer.lock();
        let range = buffer.push(text);
        if !range.is_empty() {
            buffer.spans.push(StyledSpan { range, style });
        }
    }

    fn supports_styles(&self) -> bool {
        true
    }

    fn set_text(&self, text: &str) {
        self.buffer.lock().reset(text);
    }

    fn text(&self) -> String {
        self.buffer.lock().text.to_string()
    }

    fn add_key_listener(&self, listener: KeyListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_key_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn apply_config(&self, config: &ConsoleConfig) {
        let mut buffer = self.buffer.lock();
        buffer.editable = config.editable;
        buffer.config = Some(config.clone());
    }
}

impl std::fmt::Debug for BufferSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferSurface")
            .field("text", &self.text())
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{NamedColor, TextStyle};
    use std::sync::Arc;
    use std::sync::mpsc::channel;

    #[test]
    fn test_append_set_clear() {
        let surface = BufferSurface::new();
        surface.append_text("one\n");
        surface.append_text("two");
        assert_eq!(surface.text(), "one\ntwo");
        assert_eq!(surface.lines(), vec!["one", "two"]);

        surface.set_text("three");
        assert_eq!(surface.text(), "three");

        surface.clear();
        assert_eq!(surface.text(), "");
    }

    #[test]
    fn test_styled_spans() {
        let surface = BufferSurface::new();
        surface.append_text("plain ");
        surface.append_styled("red", TextStyle::fg(NamedColor::Red));

        let spans = surface.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range, 6..9);
        assert_eq!(surface.span_text(&spans[0]), "red");

        surface.set_text("");
        assert!(surface.spans().is_empty());
    }

    #[test]
    fn test_span_colors_follow_applied_palette() {
        let surface = BufferSurface::new();
        surface.append_styled("warn", TextStyle::fg(NamedColor::Red));
        surface.append_styled("note", TextStyle::default());
        let spans = surface.spans();

        assert_eq!(surface.span_color(&spans[0]), Rgb::new(0xcc, 0x00, 0x00));
        assert_eq!(surface.span_color(&spans[1]), Rgb::new(0, 225, 0));

        let palette = ColorPalette::builder().red(200, 10, 10).foreground(1, 2, 3).build();
        surface.apply_config(&ConsoleConfig::default().colors(palette));
        assert_eq!(surface.span_color(&spans[0]), Rgb::new(200, 10, 10));
        assert_eq!(surface.span_color(&spans[1]), Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_typing_edits_buffer() {
        let surface = BufferSurface::new();
        surface.type_str("helo");
        surface.press(KeyEvent::plain(Key::Backspace));
        surface.type_str("lo");
        assert_eq!(surface.text(), "hello");

        surface.press(KeyEvent::enter());
        assert_eq!(surface.text(), "hello\n");
        assert_eq!(surface.len_lines(), 2);
    }

    #[test]
    fn test_backspace_trims_spans() {
        let surface = BufferSurface::new();
        surface.append_styled("ab", TextStyle::fg(NamedColor::Blue));
        surface.press(KeyEvent::plain(Key::Backspace));
        assert_eq!(surface.spans()[0].range, 0..1);
        surface.press(KeyEvent::plain(Key::Backspace));
        assert!(surface.spans().is_empty());
        surface.press(KeyEvent::plain(Key::Backspace));
        assert_eq!(surface.text(), "");
    }

    #[test]
    fn test_listeners_see_buffer_before_edit() {
        let surface = Arc::new(BufferSurface::new());
        let (tx, rx) = channel();
        let observed = Arc::clone(&surface);
        surface.add_key_listener(Arc::new(move |event: &KeyEvent| {
            if event.is_commit() {
                let _ = tx.send(observed.text());
            }
        }));

        surface.type_line("abc");
        assert_eq!(rx.recv().unwrap(), "abc");
        assert_eq!(surface.text(), "abc\n");
    }

    #[test]
    fn test_read_only_surface_ignores_typing() {
        let surface = BufferSurface::new();
        surface.apply_config(&ConsoleConfig::default().editable(false));
        surface.type_line("ignored");
        assert_eq!(surface.text(), "");
        assert!(!surface.is_editable());
        assert!(surface.applied_config().is_some());
    }

    #[test]
    fn test_remove_listener() {
        let surface = BufferSurface::new();
        let id = surface.add_key_listener(Arc::new(|_event: &KeyEvent| {}));
        assert_eq!(surface.listener_count(), 1);
        assert!(surface.remove_key_listener(id));
        assert_eq!(surface.listener_count(), 0);
    }
}
