//! Console window configuration.
//!
//! [`ConsoleConfig`] is passive: it is stored by the [`Console`](crate::Console)
//! and handed to the display surface once, when the console is run. Nothing in
//! the line queue or the scheduler reads it.
//!
//! # Default Values
//!
//! | Field | Default |
//! |-------|---------|
//! | `title` | "Terminal" |
//! | `height` | 450 |
//! | `width` | 650 |
//! | `editable` | true |
//! | `resizable` | true |
//! | `fullscreen` | false |
//! | `font` | "Segoe UI", bold, 16 |
//! | `colors` | black background, green (0, 225, 0) foreground |
//!
//! # Example
//!
//! ```
//! use console_pane::{ConsoleConfig, FontStyle};
//!
//! let config = ConsoleConfig::with_title("Build log")
//!     .size(600, 900)
//!     .font_family("JetBrains Mono")
//!     .font_size(13)
//!     .background(0x1a, 0x1a, 0x1a)
//!     .editable(false);
//!
//! assert_eq!(config.font.family, "JetBrains Mono");
//! assert_eq!(config.font.style, FontStyle::Plain);
//! assert_eq!(config.font.size, 13);
//! ```

use crate::colors::{ColorPalette, Rgb};

/// Font weight/slant requested from the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontStyle {
    Plain,
    #[default]
    Bold,
    Italic,
    BoldItalic,
}

/// Font request passed through to the surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub style: FontStyle,
    pub size: u32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, style: FontStyle, size: u32) -> Self {
        Self {
            family: family.into(),
            style,
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Segoe UI", FontStyle::Bold, 16)
    }
}

/// Configuration for console creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Window title
    pub title: String,

    /// Height in pixels
    pub height: u32,

    /// Width in pixels
    pub width: u32,

    /// Whether the user can type into the surface
    pub editable: bool,

    /// Whether the window can be resized by the user
    pub resizable: bool,

    /// Whether the window opens maximized
    pub fullscreen: bool,

    pub font: FontSpec,

    /// Default foreground/background plus the palette used by styled output
    pub colors: ColorPalette,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            title: "Terminal".into(),
            height: 450,
            width: 650,
            editable: true,
            resizable: true,
            fullscreen: false,
            font: FontSpec::default(),
            colors: ColorPalette::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self::default().title(title)
    }

    pub fn with_size(height: u32, width: u32) -> Self {
        Self::default().size(height, width)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, height: u32, width: u32) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    /// Replaces the font family as a plain face, keeping the current size.
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font = FontSpec::new(family, FontStyle::Plain, self.font.size);
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font.size = size;
        self
    }

    pub fn colors(mut self, colors: ColorPalette) -> Self {
        self.colors = colors;
        self
    }

    pub fn background(mut self, r: u8, g: u8, b: u8) -> Self {
        self.colors.set_background(Rgb::new(r, g, b));
        self
    }

    pub fn foreground(mut self, r: u8, g: u8, b: u8) -> Self {
        self.colors.set_foreground(Rgb::new(r, g, b));
        self
    }
}
