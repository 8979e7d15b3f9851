//! Input handling for the code editor
//!
//! Keyboard input goes through leafwing-input-manager actions; the mouse
//! wheel scrolls and clicks place the caret.

mod keybindings;
mod actions;
mod keyboard;
mod mouse;

// Re-export public types
pub use keybindings::{EditorAction, default_input_map};
pub use actions::*;
pub use keyboard::{handle_keyboard_input, EditorInputManager};
pub use mouse::{handle_mouse_input, handle_mouse_wheel, wheel_delta};

// Re-export leafwing types for user customization
pub use leafwing_input_manager::prelude::{InputMap, ButtonlikeChord, ActionState, Actionlike};
