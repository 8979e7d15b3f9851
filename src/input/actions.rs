//! Editing and caret actions on the document
//!
//! Plain functions so they can run outside the Bevy schedule.

use crate::document::EditorDocument;
use crate::viewport::ViewportQuery;

use super::keybindings::EditorAction;

/// Run one keybinding action. Returns whether the text changed.
pub fn execute_action(document: &mut EditorDocument, action: EditorAction) -> bool {
    match action {
        EditorAction::DeleteBackward => return delete_backward(document),
        EditorAction::DeleteForward => return delete_forward(document),
        EditorAction::InsertNewline => {
            insert_newline(document);
            return true;
        }
        EditorAction::InsertTab => {
            insert_tab(document);
            return true;
        }
        EditorAction::MoveCaretLeft => move_caret_left(document),
        EditorAction::MoveCaretRight => move_caret_right(document),
        EditorAction::MoveCaretUp => move_caret_vertical(document, -1),
        EditorAction::MoveCaretDown => move_caret_vertical(document, 1),
        EditorAction::MoveCaretLineStart => move_caret_line_start(document),
        EditorAction::MoveCaretLineEnd => move_caret_line_end(document),
        EditorAction::MoveCaretDocumentStart => document.set_caret(0),
        EditorAction::MoveCaretDocumentEnd => document.set_caret(document.rope().len_chars()),
        EditorAction::PageUp => page(document, -1),
        EditorAction::PageDown => page(document, 1),
        EditorAction::ToggleFold => {
            let line = document.caret_line();
            document.toggle_fold(line);
        }
        EditorAction::UnfoldAll => document.unfold_all(),
    }
    false
}

/// Insert typed text at the caret
pub fn insert_text(document: &mut EditorDocument, text: &str) {
    document.insert(document.caret(), text);
}

/// Line break that keeps the current line's indentation
pub fn insert_newline(document: &mut EditorDocument) {
    let line = document.line(document.caret_line());
    let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
    insert_text(document, &format!("\n{indent}"));
}

/// Spaces up to the next tab stop
pub fn insert_tab(document: &mut EditorDocument) {
    let tab_width = document.tab_width().max(1);
    let column = column_of(document, document.caret());
    let spaces = tab_width - column % tab_width;
    insert_text(document, &" ".repeat(spaces));
}

pub fn delete_backward(document: &mut EditorDocument) -> bool {
    let caret = document.caret();
    if caret == 0 {
        return false;
    }
    // "\r\n" goes as a whole
    let start = if caret >= 2
        && document.rope().char(caret - 1) == '\n'
        && document.rope().char(caret - 2) == '\r'
    {
        caret - 2
    } else {
        caret - 1
    };
    document.remove(start..caret);
    true
}

pub fn delete_forward(document: &mut EditorDocument) -> bool {
    let caret = document.caret();
    let len = document.rope().len_chars();
    if caret >= len {
        return false;
    }
    let end = if caret + 1 < len
        && document.rope().char(caret) == '\r'
        && document.rope().char(caret + 1) == '\n'
    {
        caret + 2
    } else {
        caret + 1
    };
    document.remove(caret..end);
    true
}

pub fn move_caret_left(document: &mut EditorDocument) {
    let caret = document.caret();
    if caret > 0 {
        document.set_caret(caret - 1);
    }
}

pub fn move_caret_right(document: &mut EditorDocument) {
    document.set_caret(document.caret() + 1);
}

pub fn move_caret_line_start(document: &mut EditorDocument) {
    let line = document.caret_line();
    document.set_caret(document.rope().line_to_char(line));
}

pub fn move_caret_line_end(document: &mut EditorDocument) {
    let line = document.caret_line();
    let len = document.line(line).chars().count();
    document.set_caret(document.rope().line_to_char(line) + len);
}

/// Move the caret by `lines` visible lines, keeping its column where the
/// target line is long enough
pub fn move_caret_vertical(document: &mut EditorDocument, lines: isize) {
    let from = document.caret_line();
    let column = column_of(document, document.caret());

    let mut target = from;
    let mut remaining = lines.unsigned_abs();
    while remaining > 0 {
        let next = if lines < 0 {
            match target.checked_sub(1) {
                Some(next) => next,
                None => break,
            }
        } else if target + 1 < document.line_count() {
            target + 1
        } else {
            break;
        };
        target = next;
        if document.is_line_visible(target) {
            remaining -= 1;
        }
    }
    // ran into folded lines at a document edge
    while !document.is_line_visible(target) && target > 0 {
        target -= 1;
    }

    if target == from {
        return;
    }
    let len = document.line(target).chars().count();
    document.set_caret(document.rope().line_to_char(target) + column.min(len));
}

/// Scroll by one screen and take the caret along
pub fn page(document: &mut EditorDocument, direction: isize) {
    let rows = document.visible_rows().max(1) as isize;
    let distance = rows as f32 * document.metrics().line_height;
    document.scroll_by(distance * direction as f32);
    move_caret_vertical(document, rows * direction);
}

fn column_of(document: &EditorDocument, char_idx: usize) -> usize {
    let line = document.rope().char_to_line(char_idx);
    char_idx - document.rope().line_to_char(line)
}
