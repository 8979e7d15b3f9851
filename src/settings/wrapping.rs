//! Text wrapping settings

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Text wrapping settings
#[derive(Clone, Debug, Default, Resource, Serialize, Deserialize)]
pub struct WrappingSettings {
    /// Enable soft line wrapping
    pub enabled: bool,

    /// Wrap column (None = wrap at viewport width)
    pub wrap_column: Option<usize>,
}
