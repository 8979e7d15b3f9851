//! Scrolling behavior settings

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Scrolling settings
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct ScrollingSettings {
    /// Lines scrolled per mouse wheel notch
    pub speed: f32,

    /// Lines that stay visible when the document is scrolled to its end
    pub bottom_lines: usize,

    /// Scroll to keep the caret line visible after it moves
    pub follow_caret: bool,
}

impl Default for ScrollingSettings {
    fn default() -> Self {
        Self {
            speed: 3.0,
            bottom_lines: 3,
            follow_caret: true,
        }
    }
}
