use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::settings::EditorSettings;
use crate::types::*;

/// Pixels to scroll for one wheel event
pub fn wheel_delta(event: &MouseWheel, settings: &EditorSettings) -> f32 {
    match event.unit {
        MouseScrollUnit::Line => event.y * settings.font.line_height * settings.scrolling.speed,
        MouseScrollUnit::Pixel => event.y,
    }
}

/// Scroll the document with the mouse wheel
pub fn handle_mouse_wheel(
    mut state: ResMut<CodeEditorState>,
    mut mouse_wheel_events: MessageReader<MouseWheel>,
    settings: Res<EditorSettings>,
) {
    let delta: f32 = mouse_wheel_events
        .read()
        .map(|event| wheel_delta(event, &settings))
        .sum();

    // wheel up (positive y) moves towards the top of the document
    if delta != 0.0 {
        state.document.scroll_by(-delta);
    }
}

/// Place the caret where the text area is clicked; a click in the gutter
/// goes to the start of that line
pub fn handle_mouse_input(
    mut state: ResMut<CodeEditorState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    viewport: Res<ViewportDimensions>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let point = Vec2::new(cursor.x - viewport.offset_x, cursor.y);
    if point.x < 0.0 {
        return;
    }

    let document = &mut state.document;
    if point.x < viewport.gutter_width {
        let line = document.line_at_y(point.y);
        let start = document.rope().line_to_char(line);
        document.set_caret(start);
    } else {
        let char_idx = document.char_at(point);
        document.set_caret(char_idx);
    }
}
