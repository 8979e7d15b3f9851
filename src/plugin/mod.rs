//! Bevy plugin for the code editor
//!
//! Renders the document with `Text2d` segments and a sprite-backed line
//! number gutter. Each frame runs in a fixed order: input edits the document,
//! the document's queued changes become messages, highlighting and gutter
//! width catch up, then everything on screen is repositioned.

mod syntax_highlighting;
mod ui_elements;

pub(crate) use ui_elements::*;

pub use syntax_highlighting::{SyntaxPlugin, SyntaxResource};
pub use ui_elements::GutterState;

use bevy::prelude::*;
use leafwing_input_manager::prelude::{ActionState, InputManagerPlugin, InputMap};

use crate::document::EditorDocument;
use crate::events::{EditorMessages, LineCountChangedEvent, TextChangedEvent, ViewportChangedEvent};
use crate::input::{EditorAction, EditorInputManager};
use crate::settings::EditorSettings;
use crate::types::*;
use crate::viewport::ViewportQuery;

/// Stages of one editor frame, run in declaration order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorSystems {
    /// Keyboard and mouse edit the document
    Input,
    /// Queued document changes are sent as messages
    Changes,
    /// The highlight cache follows text edits
    Highlight,
    /// Gutter width and viewport follow line count and window size
    Layout,
    /// Text, numbers and decorations are repositioned
    Render,
}

/// Code editor plugin
pub struct CodeEditorPlugin {
    settings: EditorSettings,
    input_map: InputMap<EditorAction>,
    initial_text: String,
}

impl CodeEditorPlugin {
    /// Create a new code editor plugin with the given input map
    ///
    /// # Example
    /// ```ignore
    /// use bevy::prelude::*;
    /// use bevy_lite_editor::prelude::*;
    ///
    /// let input_map = InputMap::default()
    ///     .with(EditorAction::MoveCaretUp, KeyCode::ArrowUp)
    ///     .with(EditorAction::ToggleFold, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::BracketLeft]));
    ///
    /// App::new()
    ///     .add_plugins(DefaultPlugins)
    ///     .add_plugins(CodeEditorPlugin::new(input_map))
    ///     .run();
    /// ```
    pub fn new(input_map: InputMap<EditorAction>) -> Self {
        Self {
            settings: EditorSettings::default(),
            input_map,
            initial_text: String::new(),
        }
    }

    /// Set custom editor settings
    pub fn with_settings(mut self, settings: EditorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Text the editor opens with
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.initial_text = text.into();
        self
    }
}

impl Default for CodeEditorPlugin {
    fn default() -> Self {
        Self::new(crate::input::default_input_map())
    }
}

/// Resource to hold the configured input map until it's spawned
#[derive(Resource)]
struct PendingInputMap(InputMap<EditorAction>);

impl Plugin for CodeEditorPlugin {
    fn build(&self, app: &mut App) {
        let document = EditorDocument::with_settings(&self.initial_text, &self.settings);

        app.insert_resource(self.settings.clone());
        app.insert_resource(CodeEditorState::new(document));
        app.insert_resource(ClearColor(self.settings.theme.background));
        app.insert_resource(ViewportDimensions::default());
        app.insert_resource(GutterState::from_settings(&self.settings));

        // Store the configured input map for the spawn system
        app.insert_resource(PendingInputMap(self.input_map.clone()));

        // Register leafwing-input-manager plugin for action-based input
        app.add_plugins(InputManagerPlugin::<EditorAction>::default());

        app.add_message::<TextChangedEvent>();
        app.add_message::<LineCountChangedEvent>();
        app.add_message::<ViewportChangedEvent>();

        app.configure_sets(
            Update,
            (
                EditorSystems::Input,
                EditorSystems::Changes,
                EditorSystems::Highlight,
                EditorSystems::Layout,
                EditorSystems::Render,
            )
                .chain(),
        );

        // Highlighter from settings; the plugin below only registers its systems
        app.add_plugins(SyntaxPlugin);
        app.insert_resource(SyntaxResource::from_settings(&self.settings.syntax));

        app.add_systems(
            Startup,
            (spawn_input_manager, init_viewport_from_window, setup, init_gutter).chain(),
        );

        app.add_systems(
            Update,
            (
                crate::input::handle_keyboard_input,
                crate::input::handle_mouse_input,
                crate::input::handle_mouse_wheel,
            )
                .chain()
                .in_set(EditorSystems::Input),
        );
        app.add_systems(
            Update,
            (apply_settings_changes, detect_viewport_resize, forward_document_changes)
                .chain()
                .in_set(EditorSystems::Changes),
        );
        app.add_systems(Update, update_gutter_width.in_set(EditorSystems::Layout));
        app.add_systems(
            Update,
            (update_gutter_decorations, update_line_numbers, update_code_text).in_set(EditorSystems::Render),
        );
    }
}

/// Spawn the input manager entity with configured keybindings
fn spawn_input_manager(mut commands: Commands, pending: Res<PendingInputMap>) {
    commands.spawn((
        EditorInputManager,
        pending.0.clone(),
        ActionState::<EditorAction>::default(),
        Name::new("EditorInputManager"),
    ));
}

/// Convert top-left coordinates (0,0 = top-left) to Bevy world coordinates (center-origin)
pub(crate) fn to_bevy_coords(x: f32, y: f32, viewport: &ViewportDimensions, z: f32) -> Vec3 {
    Vec3::new(
        x - viewport.width as f32 / 2.0 + viewport.offset_x,
        viewport.height as f32 / 2.0 - y,
        z,
    )
}

/// Initialize viewport dimensions from the actual window size
fn init_viewport_from_window(
    mut viewport: ResMut<ViewportDimensions>,
    mut state: ResMut<CodeEditorState>,
    windows: Query<&Window>,
) {
    if let Some(window) = windows.iter().next() {
        viewport.width = window.resolution.width() as u32;
        viewport.height = window.resolution.height() as u32;
    }
    state.document.resize(viewport_frame(&viewport));
}

fn viewport_frame(viewport: &ViewportDimensions) -> Rect {
    Rect::new(0.0, 0.0, viewport.width as f32, viewport.height as f32)
}

/// Detect window resizes and hand the new frame to the document
fn detect_viewport_resize(
    mut viewport: ResMut<ViewportDimensions>,
    windows: Query<&Window>,
    mut state: ResMut<CodeEditorState>,
) {
    let Some(window) = windows.iter().next() else {
        return;
    };
    let new_width = window.resolution.width() as u32;
    let new_height = window.resolution.height() as u32;

    if viewport.width != new_width || viewport.height != new_height {
        viewport.width = new_width;
        viewport.height = new_height;
        state.document.resize(viewport_frame(&viewport));
        debug!("viewport resized to {new_width}x{new_height}");
    }
}

/// Re-apply everything derived from settings when they are edited at runtime
fn apply_settings_changes(
    settings: Res<EditorSettings>,
    mut state: ResMut<CodeEditorState>,
    mut gutter: ResMut<GutterState>,
    mut syntax: ResMut<SyntaxResource>,
    mut viewport: ResMut<ViewportDimensions>,
    mut clear_color: ResMut<ClearColor>,
) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }

    clear_color.0 = settings.theme.background;
    state.document.apply_settings(&settings);

    // Replaced in place so the highlight system sees a change, not an insert
    *syntax = SyntaxResource::from_settings(&settings.syntax);

    let line_count = state.document.line_count();
    *gutter = GutterState::from_settings(&settings);
    gutter.sync(line_count, &mut state.document, &mut viewport);
}

/// Turn the document's queued changes into messages
fn forward_document_changes(
    mut state: ResMut<CodeEditorState>,
    mut text_events: MessageWriter<TextChangedEvent>,
    mut line_count_events: MessageWriter<LineCountChangedEvent>,
    mut viewport_events: MessageWriter<ViewportChangedEvent>,
) {
    if !state.document.has_changes() {
        return;
    }

    // Draining the queue is bookkeeping, not an edit
    let document = &mut state.bypass_change_detection().document;
    let version = document.version();
    let messages = EditorMessages::from_changes(document.drain_changes(), version);

    text_events.write_batch(messages.text);
    line_count_events.write_batch(messages.line_count);
    viewport_events.write_batch(messages.viewport);
}

fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut settings: ResMut<EditorSettings>,
    viewport: Res<ViewportDimensions>,
) {
    // Spawn 2D camera for the editor with 1:1 pixel mapping
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0,
            ..OrthographicProjection::default_2d()
        }),
        Camera {
            clear_color: ClearColorConfig::Custom(settings.theme.background),
            ..default()
        },
        Name::new("EditorCamera"),
    ));

    // An empty family means the embedded default font
    if !settings.font.family.is_empty() {
        let font_handle: Handle<Font> = asset_server.load(&settings.font.family);
        settings.bypass_change_detection().font.handle = Some(font_handle);
    }

    let viewport_height = viewport.height as f32;

    commands.spawn((
        Sprite {
            color: settings.theme.gutter_background,
            custom_size: Some(Vec2::new(0.0, viewport_height)),
            ..default()
        },
        Transform::from_translation(to_bevy_coords(0.0, viewport_height / 2.0, &viewport, GUTTER_Z)),
        Visibility::Hidden,
        GutterBackground,
        Name::new("GutterBackground"),
    ));

    if settings.ui.show_separator {
        commands.spawn((
            Sprite {
                color: settings.theme.separator,
                custom_size: Some(Vec2::new(1.0, viewport_height)),
                ..default()
            },
            Transform::from_translation(to_bevy_coords(0.0, viewport_height / 2.0, &viewport, DECORATION_Z)),
            Separator,
            Name::new("Separator"),
        ));
    }

    if settings.ui.show_ruler {
        commands.spawn((
            Sprite {
                color: settings.theme.ruler,
                custom_size: Some(Vec2::new(1.0, viewport_height)),
                ..default()
            },
            Transform::from_translation(to_bevy_coords(0.0, viewport_height / 2.0, &viewport, RULER_Z)),
            Ruler,
            Name::new("Ruler"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;

    use crate::document::FontMetrics;
    use crate::plugin::syntax_highlighting::rehighlight_changed_lines;
    use crate::settings::SyntaxTheme;
    use crate::syntax::{HighlightCache, TokenKind};

    #[test]
    fn test_bevy_coords_are_center_origin() {
        let viewport = ViewportDimensions {
            width: 800,
            height: 600,
            ..default()
        };
        assert_eq!(to_bevy_coords(0.0, 0.0, &viewport, 0.0), Vec3::new(-400.0, 300.0, 0.0));
        assert_eq!(to_bevy_coords(400.0, 300.0, &viewport, 1.0), Vec3::new(0.0, 0.0, 1.0));

        let shifted = ViewportDimensions {
            offset_x: 50.0,
            ..viewport
        };
        assert_eq!(to_bevy_coords(0.0, 600.0, &shifted, 0.0), Vec3::new(-350.0, -300.0, 0.0));
    }

    #[test]
    fn test_changes_are_forwarded_as_messages() {
        let mut app = App::new();
        app.insert_resource(CodeEditorState::new(EditorDocument::new("one", FontMetrics::default())));
        app.add_message::<TextChangedEvent>();
        app.add_message::<LineCountChangedEvent>();
        app.add_message::<ViewportChangedEvent>();
        app.add_systems(Update, forward_document_changes);

        app.world_mut()
            .resource_mut::<CodeEditorState>()
            .document
            .insert(3, "\ntwo");
        app.update();

        let texts = app.world().resource::<Messages<TextChangedEvent>>();
        let mut cursor = texts.get_cursor();
        let sent: Vec<_> = cursor.read(texts).copied().collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].first_line, 0);
        assert_eq!(sent[0].new_lines, 2);

        let counts = app.world().resource::<Messages<LineCountChangedEvent>>();
        let mut cursor = counts.get_cursor();
        assert_eq!(
            cursor.read(counts).copied().collect::<Vec<_>>(),
            vec![LineCountChangedEvent { old: 1, new: 2 }]
        );
        assert!(!app.world().resource::<CodeEditorState>().document.has_changes());
    }

    #[test]
    fn test_theme_edit_rehighlights() {
        let settings = EditorSettings::default();
        let mut app = App::new();
        app.insert_resource(CodeEditorState::new(EditorDocument::with_settings("return x", &settings)));
        app.insert_resource(GutterState::from_settings(&settings));
        app.insert_resource(SyntaxResource::from_settings(&settings.syntax));
        app.insert_resource(HighlightCache::new());
        app.insert_resource(ViewportDimensions::default());
        app.insert_resource(ClearColor::default());
        app.insert_resource(settings);
        app.add_message::<TextChangedEvent>();
        app.add_systems(Update, (apply_settings_changes, rehighlight_changed_lines).chain());

        app.world_mut().resource_scope(|world, mut cache: Mut<HighlightCache>| {
            let syntax = world.resource::<SyntaxResource>();
            syntax.rebuild(&mut cache, world.resource::<CodeEditorState>().document.rope());
        });
        app.update();

        let keyword = |app: &App| app.world().resource::<HighlightCache>().line(0)[0];
        assert_eq!(keyword(&app).kind, TokenKind::Keyword);
        assert_eq!(keyword(&app).style.color, SyntaxTheme::darcula().keyword.color);

        {
            let mut settings = app.world_mut().resource_mut::<EditorSettings>();
            settings.syntax.theme = SyntaxTheme::vscode_light();
            settings.indentation.tab_width = 2;
        }
        app.update();

        assert_eq!(keyword(&app).style.color, SyntaxTheme::vscode_light().keyword.color);
        assert_eq!(app.world().resource::<CodeEditorState>().document.tab_width(), 2);

        app.world_mut().resource_mut::<EditorSettings>().syntax.enabled = false;
        app.update();
        assert!(app.world().resource::<HighlightCache>().line(0).is_empty());
    }
}
