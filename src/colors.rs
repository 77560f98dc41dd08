//! Color palette for console output.
//!
//! This module provides [`ColorPalette`] and [`ColorPaletteBuilder`] for the
//! console's default colours and for resolving the colour of styled appends.
//! It supports:
//!
//! - **16 ANSI colors**: The standard named palette
//! - **True color (24-bit RGB)**: Direct RGB color specification
//!
//! # Console Defaults
//!
//! | Role | RGB |
//! |------|-----|
//! | Background | `#000000` |
//! | Foreground | `#00E100` |
//!
//! # Example
//!
//! ```
//! use console_pane::{Color, ColorPalette, NamedColor, Rgb};
//!
//! let palette = ColorPalette::builder()
//!     .background(0x1a, 0x1b, 0x26)
//!     .foreground(0xa9, 0xb1, 0xd6)
//!     .red(0xf7, 0x76, 0x8e)
//!     .build();
//!
//! assert_eq!(palette.resolve(Color::Named(NamedColor::Red)), Rgb::new(0xf7, 0x76, 0x8e));
//! ```

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// The 16 ANSI color names plus the console's own default roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black = 0,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    /// The console's default text color.
    Foreground,
    /// The console's background color.
    Background,
}

/// A color reference carried by styled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Named(NamedColor),
    Rgb(Rgb),
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb)
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        Color::Named(named)
    }
}

/// Style applied to a run of appended text.
///
/// A `None` foreground means the console's default foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    pub foreground: Option<Color>,
}

impl TextStyle {
    pub fn fg(color: impl Into<Color>) -> Self {
        Self {
            foreground: Some(color.into()),
        }
    }
}

const DEFAULT_ANSI: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00), // Black
    Rgb::new(0xcc, 0x00, 0x00), // Red
    Rgb::new(0x4e, 0x9a, 0x06), // Green
    Rgb::new(0xc4, 0xa0, 0x00), // Yellow
    Rgb::new(0x34, 0x65, 0xa4), // Blue
    Rgb::new(0x75, 0x50, 0x7b), // Magenta
    Rgb::new(0x06, 0x98, 0x9a), // Cyan
    Rgb::new(0xd3, 0xd7, 0xcf), // White
    Rgb::new(0x55, 0x57, 0x53), // Bright Black (Gray)
    Rgb::new(0xef, 0x29, 0x29), // Bright Red
    Rgb::new(0x8a, 0xe2, 0x34), // Bright Green
    Rgb::new(0xfc, 0xe9, 0x4f), // Bright Yellow
    Rgb::new(0x72, 0x9f, 0xcf), // Bright Blue
    Rgb::new(0xad, 0x7f, 0xa8), // Bright Magenta
    Rgb::new(0x34, 0xe2, 0xe2), // Bright Cyan
    Rgb::new(0xee, 0xee, 0xec), // Bright White
];

/// The console's color scheme.
///
/// Holds the 16 ANSI colors and the default foreground and background. [`resolve`](Self::resolve) turns any [`Color`]
/// carried by a [`TextStyle`] into a concrete [`Rgb`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    ansi_colors: [Rgb; 16],

    foreground: Rgb,

    background: Rgb,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            ansi_colors: DEFAULT_ANSI,
            foreground: Rgb::new(0, 225, 0),
            background: Rgb::new(0, 0, 0),
        }
    }
}

impl ColorPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ColorPaletteBuilder {
        ColorPaletteBuilder::new()
    }

    /// Resolves a color reference to concrete RGB.
    pub fn resolve(&self, color: Color) -> Rgb {
        match color {
            Color::Named(NamedColor::Foreground) => self.foreground,
            Color::Named(NamedColor::Background) => self.background,
            Color::Named(named) => self.ansi_colors[named as usize],
            Color::Rgb(rgb) => rgb,
        }
    }

    /// Resolves the foreground of a style, falling back to the default.
    pub fn resolve_style(&self, style: &TextStyle) -> Rgb {
        style
            .foreground
            .map_or(self.foreground, |color| self.resolve(color))
    }

    pub fn ansi_colors(&self) -> &[Rgb; 16] {
        &self.ansi_colors
    }

    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub(crate) fn set_foreground(&mut self, rgb: Rgb) {
        self.foreground = rgb;
    }

    pub(crate) fn set_background(&mut self, rgb: Rgb) {
        self.background = rgb;
    }
}

/// Builder for creating a customized color palette.
///
/// Start with default colors and override specific ones as needed.
#[derive(Debug, Clone, Default)]
pub struct ColorPaletteBuilder {
    palette: ColorPalette,
}

impl ColorPaletteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, r: u8, g: u8, b: u8) -> Self {
        self.palette.background = Rgb::new(r, g, b);
        self
    }

    pub fn foreground(mut self, r: u8, g: u8, b: u8) -> Self {
        self.palette.foreground = Rgb::new(r, g, b);
        self
    }

    pub fn black(self, r: u8, g: u8, b: u8) -> Self {
        self.named(NamedColor::Black, r, g, b)
    }

    pub fn red(self, r: u8, g: u8, b: u8) -> Self {
        self.named(NamedColor::Red, r, g, b)
    }

    pub fn green(self, r: u8, g: u8, b: u8) -> Self {
        self.named(NamedColor::Green, r, g, b)
    }

    pub fn yellow(self, r: u8, g: u8, b: u8) -> Self {
        self.named(NamedColor::Yellow, r, g, b)
    }

    pub fn blue(self, r: u8, g: u8, b: u8) -> Self {
        self.named(NamedColor::Blue, r, g, b)
    }

    pub fn magenta(self, r: u8, g: u8, b: u8) -> Self {
        self.named(NamedColor::Magenta, r, g, b)
    }

    pub fn cyan(self, r: u8, g: u8, b: u8) -> Self {
        self.named(NamedColor::Cyan, r, g, b)
    }

    pub fn white(self, r: u8, g: u8, b: u8) -> Self {
        self.named(NamedColor::White, r, g, b)
    }

    /// Sets any of the 16 ANSI colors by name.
    ///
    /// `Foreground` and `Background` are routed to the default roles.
    pub fn named(mut self, name: NamedColor, r: u8, g: u8, b: u8) -> Self {
        let rgb = Rgb::new(r, g, b);
        match name {
            NamedColor::Foreground => self.palette.foreground = rgb,
            NamedColor::Background => self.palette.background = rgb,
            ansi => self.palette.ansi_colors[ansi as usize] = rgb,
        }
        self
    }

    pub fn build(self) -> ColorPalette {
        self.palette
    }
}
