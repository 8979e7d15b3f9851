//! Editor messages for inter-plugin communication
//!
//! The plugin turns the document's queued [`EditorChange`]s into these
//! messages once per frame, so other systems can react without polling the
//! document.

use bevy::prelude::*;

use crate::document::EditorChange;

/// Lines of text were replaced
///
/// `old_lines` lines starting at `first_line` became `new_lines` lines.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextChangedEvent {
    pub first_line: usize,
    pub old_lines: usize,
    pub new_lines: usize,
    /// Document version after the edit
    pub version: u64,
}

/// The number of lines changed
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCountChangedEvent {
    pub old: usize,
    pub new: usize,
}

/// Something the gutter paints from moved
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportChangedEvent {
    Scrolled,
    CaretMoved { from: usize, to: usize },
    Relayout,
}

/// Messages queued from one batch of document changes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorMessages {
    pub text: Vec<TextChangedEvent>,
    pub line_count: Vec<LineCountChangedEvent>,
    pub viewport: Vec<ViewportChangedEvent>,
}

impl EditorMessages {
    /// Sort changes by message type, keeping their order
    pub fn from_changes(changes: impl IntoIterator<Item = EditorChange>, version: u64) -> Self {
        let mut messages = Self::default();
        for change in changes {
            match change {
                EditorChange::TextChanged {
                    first_line,
                    old_lines,
                    new_lines,
                } => messages.text.push(TextChangedEvent {
                    first_line,
                    old_lines,
                    new_lines,
                    version,
                }),
                EditorChange::LineCountChanged { old, new } => {
                    messages.line_count.push(LineCountChangedEvent { old, new })
                }
                EditorChange::ScrollChanged => messages.viewport.push(ViewportChangedEvent::Scrolled),
                EditorChange::CaretMoved { from, to } => messages
                    .viewport
                    .push(ViewportChangedEvent::CaretMoved { from, to }),
                EditorChange::LayoutChanged => messages.viewport.push(ViewportChangedEvent::Relayout),
            }
        }
        messages
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.line_count.is_empty() && self.viewport.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_split_by_kind() {
        let changes = [
            EditorChange::TextChanged { first_line: 3, old_lines: 1, new_lines: 2 },
            EditorChange::LineCountChanged { old: 10, new: 11 },
            EditorChange::CaretMoved { from: 3, to: 4 },
            EditorChange::ScrollChanged,
        ];
        let messages = EditorMessages::from_changes(changes, 7);

        assert_eq!(
            messages.text,
            vec![TextChangedEvent { first_line: 3, old_lines: 1, new_lines: 2, version: 7 }]
        );
        assert_eq!(messages.line_count, vec![LineCountChangedEvent { old: 10, new: 11 }]);
        assert_eq!(
            messages.viewport,
            vec![
                ViewportChangedEvent::CaretMoved { from: 3, to: 4 },
                ViewportChangedEvent::Scrolled,
            ]
        );
    }

    #[test]
    fn test_no_changes() {
        assert!(EditorMessages::from_changes([], 0).is_empty());
    }
}
