use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

/// Create the default input map with all keybindings
pub fn default_input_map() -> InputMap<EditorAction> {
    let mut input_map = InputMap::default();

    // Deletion
    input_map.insert(EditorAction::DeleteBackward, KeyCode::Backspace);
    input_map.insert(EditorAction::DeleteForward, KeyCode::Delete);

    // Special insertion
    input_map.insert(EditorAction::InsertNewline, KeyCode::Enter);
    input_map.insert(EditorAction::InsertTab, KeyCode::Tab);

    // Caret movement
    input_map.insert(EditorAction::MoveCaretLeft, KeyCode::ArrowLeft);
    input_map.insert(EditorAction::MoveCaretRight, KeyCode::ArrowRight);
    input_map.insert(EditorAction::MoveCaretUp, KeyCode::ArrowUp);
    input_map.insert(EditorAction::MoveCaretDown, KeyCode::ArrowDown);
    input_map.insert(EditorAction::MoveCaretLineStart, KeyCode::Home);
    input_map.insert(EditorAction::MoveCaretLineEnd, KeyCode::End);
    input_map.insert(EditorAction::MoveCaretDocumentStart, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::Home]));
    input_map.insert(EditorAction::MoveCaretDocumentEnd, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::End]));
    input_map.insert(EditorAction::PageUp, KeyCode::PageUp);
    input_map.insert(EditorAction::PageDown, KeyCode::PageDown);

    // Code folding
    input_map.insert(EditorAction::ToggleFold, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::BracketLeft]));
    input_map.insert(EditorAction::UnfoldAll, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::AltLeft, KeyCode::BracketRight]));

    input_map
}

/// Editor action that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Actionlike)]
pub enum EditorAction {
    // Deletion
    DeleteBackward,
    DeleteForward,

    // Special insertion
    InsertNewline,
    InsertTab,

    // Caret movement
    MoveCaretLeft,
    MoveCaretRight,
    MoveCaretUp,
    MoveCaretDown,
    MoveCaretLineStart,
    MoveCaretLineEnd,
    MoveCaretDocumentStart,
    MoveCaretDocumentEnd,
    PageUp,
    PageDown,

    // Code folding
    /// Fold the indented block at the caret line, or open it (Ctrl+Shift+[)
    ToggleFold,
    /// Open every fold (Ctrl+Alt+])
    UnfoldAll,
}

impl EditorAction {
    /// Checked in this order every frame; chords come first so that
    /// Ctrl+Home is not also read as Home
    pub const ALL: [EditorAction; 16] = [
        EditorAction::MoveCaretDocumentStart,
        EditorAction::MoveCaretDocumentEnd,
        EditorAction::ToggleFold,
        EditorAction::UnfoldAll,
        EditorAction::DeleteBackward,
        EditorAction::DeleteForward,
        EditorAction::InsertNewline,
        EditorAction::InsertTab,
        EditorAction::MoveCaretLeft,
        EditorAction::MoveCaretRight,
        EditorAction::MoveCaretUp,
        EditorAction::MoveCaretDown,
        EditorAction::MoveCaretLineStart,
        EditorAction::MoveCaretLineEnd,
        EditorAction::PageUp,
        EditorAction::PageDown,
    ];
}
