use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::types::*;
use crate::viewport::ViewportQuery;

use super::actions::{execute_action, insert_text};
use super::keybindings::EditorAction;

/// Marker component for the editor's input manager entity
#[derive(Component)]
pub struct EditorInputManager;

/// System to handle keyboard input using leafwing-input-manager
///
/// Bound actions win over typed characters: in a frame where an action
/// fired, character input is dropped so chords do not also type.
pub fn handle_keyboard_input(
    mut state: ResMut<CodeEditorState>,
    mut char_events: MessageReader<KeyboardInput>,
    action_query: Query<&ActionState<EditorAction>, With<EditorInputManager>>,
) {
    if !state.is_focused {
        char_events.clear();
        return;
    }

    let Ok(action_state) = action_query.single() else {
        warn!("No EditorInputManager entity found with ActionState");
        return;
    };

    let pressed = EditorAction::ALL
        .into_iter()
        .find(|action| action_state.just_pressed(action));
    if let Some(action) = pressed {
        char_events.clear();
        if execute_action(&mut state.document, action) {
            debug!("{action:?} edited line {}", state.document.caret_line());
        }
        return;
    }

    let mut typed = String::new();
    for event in char_events.read() {
        if !event.state.is_pressed() {
            continue;
        }
        match &event.logical_key {
            Key::Character(text) => typed.extend(text.chars().filter(|c| !c.is_control())),
            Key::Space => typed.push(' '),
            _ => {}
        }
    }
    if !typed.is_empty() {
        insert_text(&mut state.document, &typed);
    }
}
