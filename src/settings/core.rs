//! Core editor settings: Font and Theme

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Font settings - shared by the text area and the gutter
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct FontSettings {
    /// Font asset path; empty for the embedded default font (Fira Mono)
    pub family: String,

    /// Font size in pixels
    pub size: f32,

    /// Character width (for monospace calculations)
    pub char_width: f32,

    /// Width of the widest decimal digit, used to size the gutter
    pub digit_width: f32,

    /// Line height in pixels (one visual row)
    pub line_height: f32,

    /// Cached font handle (set at runtime)
    #[serde(skip)]
    pub handle: Option<Handle<Font>>,
}

impl Default for FontSettings {
    fn default() -> Self {
        let size = 14.0;
        Self {
            family: String::new(),
            size,
            char_width: size * 0.6,
            digit_width: size * 0.6,
            line_height: size * 1.5,
            handle: None,
        }
    }
}

impl FontSettings {
    /// Monospace metrics derived from a font size
    pub fn monospace(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            char_width: size * 0.6,
            digit_width: size * 0.6,
            line_height: size * 1.5,
            handle: None,
        }
    }
}

/// Theme settings - colors for the editor chrome
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Background color
    pub background: Color,

    /// Text color (default)
    pub foreground: Color,

    /// Line numbers color
    pub line_numbers: Color,

    /// Line number color of the caret line
    pub line_numbers_active: Color,

    /// Gutter background
    pub gutter_background: Color,

    /// Separator line color
    pub separator: Color,

    /// Max line length ruler color
    pub ruler: Color,
}

impl ThemeSettings {
    pub fn vscode_dark() -> Self {
        Self {
            background: Color::srgb(0.117, 0.117, 0.117),
            foreground: Color::srgb(0.827, 0.827, 0.827),
            line_numbers: Color::srgb_u8(120, 120, 120),
            line_numbers_active: Color::srgb_u8(90, 255, 30),
            gutter_background: Color::srgb(0.098, 0.098, 0.098),
            separator: Color::srgb(0.2, 0.2, 0.2),
            ruler: Color::srgb(0.16, 0.16, 0.16),
        }
    }

    pub fn vscode_light() -> Self {
        Self {
            background: Color::srgb(1.0, 1.0, 1.0),
            foreground: Color::srgb(0.0, 0.0, 0.0),
            line_numbers: Color::srgb(0.588, 0.588, 0.588),
            line_numbers_active: Color::srgb(0.0, 0.0, 0.0),
            gutter_background: Color::srgb(0.95, 0.95, 0.95),
            separator: Color::srgb(0.85, 0.85, 0.85),
            ruler: Color::srgb(0.9, 0.9, 0.9),
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::vscode_dark()
    }
}
