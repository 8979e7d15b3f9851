//! Modular settings system for the code editor
//!
//! Each component has its own settings struct; `EditorSettings` groups them
//! into the single resource the plugin reads. Use `EditorSettingsBuilder`
//! for convenient initialization.

mod core;
mod ui;
mod syntax;
mod scrolling;
mod wrapping;

pub use core::*;
pub use ui::*;
pub use syntax::*;
pub use scrolling::*;
pub use wrapping::*;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// All editor settings
#[derive(Clone, Debug, Default, Resource, Serialize, Deserialize)]
pub struct EditorSettings {
    pub font: FontSettings,
    pub theme: ThemeSettings,
    pub ui: UiSettings,
    pub indentation: IndentationSettings,
    pub scrolling: ScrollingSettings,
    pub syntax: SyntaxSettings,
    pub wrapping: WrappingSettings,
}

impl EditorSettings {
    /// Plain editor: no highlighting, no ruler, no separator
    pub fn minimal() -> Self {
        let mut settings = Self::default();
        settings.syntax.enabled = false;
        settings.ui.show_ruler = false;
        settings.ui.show_separator = false;
        settings
    }
}

/// Builder for configuring all editor settings at once
///
/// # Example
/// ```no_run
/// use bevy_lite_editor::settings::EditorSettingsBuilder;
///
/// let settings = EditorSettingsBuilder::default()
///     .font_size(16.0)
///     .theme_dark()
///     .soft_wrap(None)
///     .build();
/// ```
#[derive(Default)]
pub struct EditorSettingsBuilder {
    settings: EditorSettings,
}

impl EditorSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // Font configuration
    pub fn font_size(mut self, size: f32) -> Self {
        let family = std::mem::take(&mut self.settings.font.family);
        self.settings.font = FontSettings::monospace(family, size);
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.settings.font.family = family.into();
        self
    }

    pub fn font(mut self, font: FontSettings) -> Self {
        self.settings.font = font;
        self
    }

    // Theme presets
    pub fn theme_dark(mut self) -> Self {
        self.settings.theme = ThemeSettings::vscode_dark();
        self.settings.syntax.theme = SyntaxTheme::darcula();
        self
    }

    pub fn theme_light(mut self) -> Self {
        self.settings.theme = ThemeSettings::vscode_light();
        self.settings.syntax.theme = SyntaxTheme::vscode_light();
        self
    }

    pub fn theme(mut self, theme: ThemeSettings) -> Self {
        self.settings.theme = theme;
        self
    }

    pub fn ui(mut self, ui: UiSettings) -> Self {
        self.settings.ui = ui;
        self
    }

    pub fn indentation(mut self, indentation: IndentationSettings) -> Self {
        self.settings.indentation = indentation;
        self
    }

    pub fn scrolling(mut self, scrolling: ScrollingSettings) -> Self {
        self.settings.scrolling = scrolling;
        self
    }

    pub fn syntax(mut self, syntax: SyntaxSettings) -> Self {
        self.settings.syntax = syntax;
        self
    }

    /// Enable soft wrapping at `column`, or at the viewport width when `None`
    pub fn soft_wrap(mut self, column: Option<usize>) -> Self {
        self.settings.wrapping = WrappingSettings {
            enabled: true,
            wrap_column: column,
        };
        self
    }

    pub fn build(self) -> EditorSettings {
        self.settings
    }
}
