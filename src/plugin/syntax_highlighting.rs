//! Syntax highlighting plugin
//!
//! Holds the highlighter as a Bevy resource, decoupled from editor state,
//! and keeps the per-line [`HighlightCache`] in step with text changes.

use bevy::prelude::*;
use ropey::Rope;

use super::EditorSystems;
use crate::events::TextChangedEvent;
use crate::settings::SyntaxSettings;
use crate::syntax::{HighlightCache, RegexHighlighter, SyntaxProvider};
use crate::types::CodeEditorState;

/// Resource that holds the syntax highlighting provider
#[derive(Resource, Default)]
pub struct SyntaxResource {
    provider: Option<Box<dyn SyntaxProvider>>,
}

impl SyntaxResource {
    /// Create a new syntax resource (no provider initially)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the rule-table highlighter from settings. A table that fails
    /// to build is logged and leaves highlighting off.
    pub fn from_settings(settings: &SyntaxSettings) -> Self {
        if !settings.enabled {
            return Self::new();
        }
        match RegexHighlighter::python(&settings.theme) {
            Ok(highlighter) => {
                info!("syntax highlighting: {} rules", highlighter.table().len());
                Self {
                    provider: Some(Box::new(highlighter)),
                }
            }
            Err(err) => {
                error!("syntax highlighting disabled: {err}");
                Self::new()
            }
        }
    }

    /// Set the provider
    pub fn set_provider(&mut self, provider: impl SyntaxProvider + 'static) {
        self.provider = Some(Box::new(provider));
    }

    pub fn clear_provider(&mut self) {
        self.provider = None;
    }

    pub fn provider(&self) -> Option<&dyn SyntaxProvider> {
        self.provider.as_deref()
    }

    /// Check if syntax highlighting is available
    pub fn is_available(&self) -> bool {
        self.provider().is_some_and(|provider| provider.is_available())
    }

    /// Re-highlight every line, or clear the cache without a provider
    pub fn rebuild(&self, cache: &mut HighlightCache, rope: &Rope) {
        match self.provider() {
            Some(provider) => cache.rebuild(provider, rope),
            None => cache.clear(rope.len_lines()),
        }
    }

    /// Re-highlight only the lines one edit replaced
    pub fn apply_edit(&self, cache: &mut HighlightCache, rope: &Rope, edit: &TextChangedEvent) {
        match self.provider() {
            Some(provider) => cache.splice(provider, rope, edit.first_line, edit.old_lines, edit.new_lines),
            None => cache.clear(rope.len_lines()),
        }
    }
}

/// Highlight the initial text
pub(crate) fn init_highlights(
    syntax: Res<SyntaxResource>,
    state: Res<CodeEditorState>,
    mut cache: ResMut<HighlightCache>,
) {
    syntax.rebuild(&mut cache, state.document.rope());
}

/// Re-highlight the lines text edits touched.
///
/// A single edit splices the cache. Several edits in one frame refer to
/// intermediate texts, so the whole document is re-highlighted instead.
pub(crate) fn rehighlight_changed_lines(
    syntax: Res<SyntaxResource>,
    state: Res<CodeEditorState>,
    mut cache: ResMut<HighlightCache>,
    mut events: MessageReader<TextChangedEvent>,
) {
    let rope = state.document.rope();

    if syntax.is_changed() && !syntax.is_added() {
        events.clear();
        syntax.rebuild(&mut cache, rope);
        return;
    }

    let edits: Vec<TextChangedEvent> = events.read().copied().collect();
    match edits.as_slice() {
        [] => return,
        [edit] => syntax.apply_edit(&mut cache, rope, edit),
        _ => {
            debug!("{} edits in one frame, re-highlighting everything", edits.len());
            syntax.rebuild(&mut cache, rope);
        }
    }

    if cache.len() != rope.len_lines() {
        warn!(
            "highlight cache out of step ({} cached, {} lines), rebuilding",
            cache.len(),
            rope.len_lines()
        );
        syntax.rebuild(&mut cache, rope);
    }
}

/// Syntax highlighting plugin
pub struct SyntaxPlugin;

impl Plugin for SyntaxPlugin {
    fn build(&self, app: &mut App) {
        // The highlighter itself is inserted by the editor plugin from settings
        app.init_resource::<SyntaxResource>();
        app.insert_resource(HighlightCache::default());
        app.add_message::<TextChangedEvent>();

        app.add_systems(PostStartup, init_highlights);
        app.add_systems(Update, rehighlight_changed_lines.in_set(EditorSystems::Highlight));
    }
}
