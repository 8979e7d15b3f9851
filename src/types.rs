//! Shared component and resource types

use bevy::prelude::*;

use crate::document::EditorDocument;
use crate::gutter::GutterHost;

/// Main editor state resource
#[derive(Resource, Debug)]
pub struct CodeEditorState {
    /// The edited document, its caret and scroll position
    pub document: EditorDocument,

    /// Keyboard input only reaches the document while focused
    pub is_focused: bool,
}

impl CodeEditorState {
    pub fn new(document: EditorDocument) -> Self {
        Self {
            document,
            is_focused: true,
        }
    }
}

impl Default for CodeEditorState {
    fn default() -> Self {
        Self::new(EditorDocument::default())
    }
}

/// A segment of text with a specific color on a specific line
#[derive(Clone, Debug, PartialEq)]
pub struct LineSegment {
    pub text: String,
    pub color: Color,
}

/// Viewport dimensions and layout information
///
/// Tracks the window size and the layout computed from the gutter width.
/// The gutter systems keep `gutter_width` and `text_area_left` current.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ViewportDimensions {
    /// Viewport width in pixels
    pub width: u32,

    /// Viewport height in pixels
    pub height: u32,

    /// Horizontal offset for the editor content (useful for sidebars)
    pub offset_x: f32,

    /// Left edge of the text area (equals the gutter width)
    pub text_area_left: f32,

    /// Width of the gutter area (line numbers)
    pub gutter_width: f32,

    /// X position of the separator line between gutter and code
    pub separator_x: f32,
}

impl Default for ViewportDimensions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            offset_x: 0.0,
            text_area_left: 0.0,
            gutter_width: 0.0,
            separator_x: 0.0,
        }
    }
}

impl GutterHost for ViewportDimensions {
    fn set_left_margin(&mut self, width: f32) {
        self.gutter_width = width;
        self.text_area_left = width;
        self.separator_x = width;
    }
}

/// Marker for pooled code text segments
#[derive(Component, Clone, Copy, Default)]
pub struct CodeText;

/// Marker for gutter line number labels
#[derive(Component, Clone, Copy, Default)]
pub struct LineNumbers;

/// Marker for the gutter background
#[derive(Component, Clone, Copy, Default)]
pub struct GutterBackground;

/// Marker for the gutter/code separator line
#[derive(Component, Clone, Copy, Default)]
pub struct Separator;

/// Marker for the max line length ruler
#[derive(Component, Clone, Copy, Default)]
pub struct Ruler;
