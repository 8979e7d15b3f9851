//! Syntax highlighting settings

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::syntax::TextStyle;

/// Syntax highlighting settings
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct SyntaxSettings {
    /// Enable syntax highlighting
    pub enabled: bool,

    /// Syntax theme styles
    pub theme: SyntaxTheme,
}

/// One text style per lexical category of the rule table
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyntaxTheme {
    pub keyword: TextStyle,
    pub brace: TextStyle,
    pub number: TextStyle,
    pub operator: TextStyle,
    pub punctuation: TextStyle,
    pub self_ref: TextStyle,
    pub builtin: TextStyle,
    pub definition: TextStyle,
    pub dunder: TextStyle,
    pub string: TextStyle,
    pub decorator: TextStyle,
    pub comment: TextStyle,
}

impl Default for SyntaxSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: SyntaxTheme::default(),
        }
    }
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        Self::darcula()
    }
}

impl SyntaxTheme {
    /// Warm dark palette
    pub fn darcula() -> Self {
        Self {
            keyword: TextStyle::new(Color::srgb_u8(200, 120, 50)),
            brace: TextStyle::new(Color::srgb_u8(160, 160, 164)),
            number: TextStyle::new(Color::srgb_u8(106, 149, 185)),
            operator: TextStyle::new(Color::srgb_u8(210, 160, 160)),
            punctuation: TextStyle::new(Color::srgb_u8(200, 120, 50)),
            self_ref: TextStyle::new(Color::srgb_u8(145, 86, 140)),
            builtin: TextStyle::new(Color::srgb_u8(135, 135, 197)),
            definition: TextStyle::new(Color::srgb_u8(253, 197, 107)),
            dunder: TextStyle::new(Color::srgb_u8(173, 1, 177)),
            string: TextStyle::new(Color::srgb_u8(88, 133, 74)),
            decorator: TextStyle::new(Color::srgb_u8(185, 180, 40)),
            comment: TextStyle::new(Color::srgb_u8(128, 128, 128)).italic(),
        }
    }

    pub fn vscode_light() -> Self {
        Self {
            keyword: TextStyle::new(Color::srgb(0.0, 0.0, 1.0)),
            brace: TextStyle::new(Color::srgb(0.0, 0.0, 0.0)),
            number: TextStyle::new(Color::srgb(0.0, 0.4, 0.0)),
            operator: TextStyle::new(Color::srgb(0.0, 0.0, 0.0)),
            punctuation: TextStyle::new(Color::srgb(0.0, 0.0, 0.0)),
            self_ref: TextStyle::new(Color::srgb(0.0, 0.0, 1.0)),
            builtin: TextStyle::new(Color::srgb(0.463, 0.294, 0.0)),
            definition: TextStyle::new(Color::srgb(0.463, 0.294, 0.0)).bold(),
            dunder: TextStyle::new(Color::srgb(0.0, 0.502, 0.502)),
            string: TextStyle::new(Color::srgb(0.647, 0.0, 0.0)),
            decorator: TextStyle::new(Color::srgb(0.933, 0.286, 0.0)),
            comment: TextStyle::new(Color::srgb(0.0, 0.502, 0.0)).italic(),
        }
    }
}
