//! # Bevy Lite Editor
//!
//! Lightweight code editor component for Bevy: a rope-backed document,
//! rule-based syntax highlighting and a line number gutter that tracks the
//! text viewport.
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_lite_editor::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(CodeEditorPlugin::default().with_text("def main():\n    pass\n"))
//!         .run();
//! }
//! ```
//!
//! ## Customization
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_lite_editor::prelude::*;
//!
//! fn main() {
//!     let input_map = InputMap::default()
//!         .with(EditorAction::MoveCaretUp, KeyCode::ArrowUp)
//!         .with(EditorAction::MoveCaretDown, KeyCode::ArrowDown);
//!     let settings = EditorSettingsBuilder::new().font_size(16.0).theme_light().build();
//!
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(CodeEditorPlugin::new(input_map).with_settings(settings))
//!         .run();
//! }
//! ```
//!
//! The gutter and the highlighter do not depend on Bevy's schedule: the
//! gutter paints from any [`viewport::ViewportQuery`] through a
//! [`gutter::GutterPainter`], and [`syntax::RegexHighlighter`] works on
//! plain strings.

pub mod display_map;
pub mod document;
pub mod events;
pub mod gutter;
pub mod input;
pub mod plugin;
pub mod settings;
pub mod syntax;
pub mod types;
pub mod viewport;

pub mod prelude {
    //! Convenient re-exports for common usage
    pub use crate::document::{EditorChange, EditorDocument, FontMetrics};
    pub use crate::events::*;
    pub use crate::gutter::{
        GutterFrame, GutterHost, GutterLayout, GutterPainter, GutterRenderer,
    };
    pub use crate::input::*;
    pub use crate::plugin::{CodeEditorPlugin, EditorSystems, GutterState, SyntaxPlugin, SyntaxResource};
    pub use crate::settings::*;
    pub use crate::syntax::{HighlightCache, RegexHighlighter, SyntaxProvider};
    pub use crate::types::*;
    pub use crate::viewport::{ViewportQuery, ViewportState};

    pub use crate::display_map::{FoldMap, FoldRegion, WrapMap};
}
