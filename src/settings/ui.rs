//! UI settings - gutter, separator, ruler and document margins

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// UI settings for visual elements
///
/// Note: Layout dimensions (gutter width, text area inset) are computed at
/// runtime and stored in the `ViewportDimensions` resource.
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct UiSettings {
    /// Show line numbers
    pub show_line_numbers: bool,

    /// Paint the caret line's number in the active color
    pub highlight_active_line: bool,

    /// Show separator line between gutter and code
    pub show_separator: bool,

    /// Gutter padding left of the numbers (pixels)
    pub gutter_padding_left: f32,

    /// Gutter padding right of the numbers (pixels)
    pub gutter_padding_right: f32,

    /// Margin around the document content (pixels)
    pub document_margin: f32,

    /// Show the max line length ruler
    pub show_ruler: bool,

    /// Column of the max line length ruler
    pub ruler_column: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            highlight_active_line: true,
            show_separator: true,
            gutter_padding_left: 10.0,
            gutter_padding_right: 10.0,
            document_margin: 4.0,
            show_ruler: true,
            ruler_column: 121,
        }
    }
}

/// Indentation settings
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct IndentationSettings {
    /// Tab stop in characters
    pub tab_width: usize,
}

impl Default for IndentationSettings {
    fn default() -> Self {
        Self { tab_width: 4 }
    }
}

impl IndentationSettings {
    /// Pixel distance between tab stops for a monospace font
    pub fn tab_stop_width(&self, char_width: f32) -> f32 {
        self.tab_width as f32 * char_width
    }
}
