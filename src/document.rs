//! The edited document and its layout
//!
//! `EditorDocument` owns the rope, the caret and the scroll position, and
//! lays every line out as a stack of display rows. It answers
//! [`ViewportQuery`] for the gutter and receives the gutter width through
//! [`GutterHost`]. Every mutation queues [`EditorChange`]s for the plugin.

use std::ops::Range;

use bevy::prelude::*;
use ropey::Rope;

use crate::display_map::{indent_block_end, DisplayMap, FoldMap, FoldRegion};
use crate::gutter::GutterHost;
use crate::settings::{EditorSettings, FontSettings};
use crate::syntax::line_text;
use crate::viewport::{LineHeightIndex, ViewportQuery, ViewportState};

/// Font measurements the layout is built from
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub line_height: f32,
    pub char_width: f32,
    pub digit_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::from(&FontSettings::default())
    }
}

impl From<&FontSettings> for FontMetrics {
    fn from(font: &FontSettings) -> Self {
        Self {
            line_height: font.line_height,
            char_width: font.char_width,
            digit_width: font.digit_width,
        }
    }
}

/// What a document mutation changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorChange {
    /// `old_lines` lines starting at `first_line` were replaced by `new_lines` lines
    TextChanged {
        first_line: usize,
        old_lines: usize,
        new_lines: usize,
    },
    LineCountChanged { old: usize, new: usize },
    ScrollChanged,
    /// Caret moved between lines
    CaretMoved { from: usize, to: usize },
    /// Line heights or viewport geometry changed (resize, wrap, fold)
    LayoutChanged,
}

/// A text document laid out for display
#[derive(Clone, Debug)]
pub struct EditorDocument {
    rope: Rope,
    metrics: FontMetrics,
    /// Widget rectangle in editor space, gutter included
    frame: Rect,
    left_margin: f32,
    scroll: f32,
    /// Caret as a char index
    caret: usize,
    document_margin: f32,
    bottom_lines: usize,
    follow_caret: bool,
    tab_width: usize,
    ruler_column: usize,
    /// Wrap at the viewport width instead of a fixed column
    wrap_to_viewport: bool,
    display: DisplayMap,
    heights: LineHeightIndex,
    changes: Vec<EditorChange>,
    version: u64,
}

impl EditorDocument {
    pub fn new(text: &str, metrics: FontMetrics) -> Self {
        let rope = Rope::from_str(text);
        let display = DisplayMap::new(&rope, None);
        let mut document = Self {
            rope,
            metrics,
            frame: Rect::new(0.0, 0.0, 800.0, 600.0),
            left_margin: 0.0,
            scroll: 0.0,
            caret: 0,
            document_margin: 0.0,
            bottom_lines: 3,
            follow_caret: true,
            tab_width: 4,
            ruler_column: 121,
            wrap_to_viewport: false,
            display,
            heights: LineHeightIndex::default(),
            changes: Vec::new(),
            version: 0,
        };
        document.relayout();
        document
    }

    pub fn with_settings(text: &str, settings: &EditorSettings) -> Self {
        let mut document = Self::new(text, FontMetrics::from(&settings.font));
        document.apply_settings(settings);
        document.drain_changes();
        document
    }

    /// Re-apply font, margins, scrolling, indentation, ruler and wrapping
    /// from `settings`, then relayout.
    pub fn apply_settings(&mut self, settings: &EditorSettings) {
        self.metrics = FontMetrics::from(&settings.font);
        self.document_margin = settings.ui.document_margin;
        self.bottom_lines = settings.scrolling.bottom_lines;
        self.follow_caret = settings.scrolling.follow_caret;
        self.tab_width = settings.indentation.tab_width;
        self.ruler_column = settings.ui.ruler_column;

        self.wrap_to_viewport = settings.wrapping.enabled && settings.wrapping.wrap_column.is_none();
        let wrap_width = match (settings.wrapping.enabled, settings.wrapping.wrap_column) {
            (false, _) => None,
            (true, Some(column)) => Some(column as u32),
            (true, None) => self.viewport_wrap_width(),
        };
        self.apply_wrap_width(wrap_width);
        self.layout_changed();
    }

    // ---- text -------------------------------------------------------------

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of `line` without its terminator
    pub fn line(&self, line: usize) -> String {
        line_text(&self.rope, line)
    }

    /// Bumped on every text change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole text. Folds are dropped, the caret is clamped.
    pub fn set_text(&mut self, text: &str) {
        let old = self.rope.len_lines();
        let caret_line = self.caret_line();

        self.rope = Rope::from_str(text);
        self.display.reset(&self.rope);
        self.caret = self.caret.min(self.rope.len_chars());
        self.relayout();

        self.text_changed(0, old, self.rope.len_lines(), old);
        self.caret_changed(caret_line);
        self.clamp_scroll();
    }

    /// Insert `text` at a char index (clamped to the end)
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let char_idx = char_idx.min(self.rope.len_chars());
        let old = self.rope.len_lines();
        let first_line = self.rope.char_to_line(char_idx);
        let caret_line = self.caret_line();

        self.rope.insert(char_idx, text);
        let new_lines = (1 + self.rope.len_lines()).saturating_sub(old);
        self.display.splice(&self.rope, first_line, 1, new_lines);
        self.relayout();

        if self.caret >= char_idx {
            self.caret += text.chars().count();
        }

        self.text_changed(first_line, 1, new_lines, old);
        self.caret_changed(caret_line);
        self.clamp_scroll();
    }

    /// Remove a char range (clamped to the document)
    pub fn remove(&mut self, range: Range<usize>) {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return;
        }

        let old = self.rope.len_lines();
        let first_line = self.rope.char_to_line(start);
        let old_lines = self.rope.char_to_line(end) - first_line + 1;
        let caret_line = self.caret_line();

        self.rope.remove(start..end);
        let new_lines = (old_lines + self.rope.len_lines()).saturating_sub(old);
        self.display.splice(&self.rope, first_line, old_lines, new_lines);
        self.relayout();

        if self.caret >= end {
            self.caret -= end - start;
        } else if self.caret > start {
            self.caret = start;
        }

        self.text_changed(first_line, old_lines, new_lines, old);
        self.caret_changed(caret_line);
        self.clamp_scroll();
    }

    // ---- caret ------------------------------------------------------------

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret to a char index. A caret landing inside a fold opens it.
    pub fn set_caret(&mut self, char_idx: usize) {
        let from = self.caret_line();
        self.caret = char_idx.min(self.rope.len_chars());

        let to = self.caret_line();
        if !self.display.is_line_visible(to) {
            let start = self
                .display
                .folds
                .folded_regions()
                .find(|fold| fold.hides(to))
                .map(|fold| fold.start_line);
            if let Some(start) = start {
                self.unfold(start);
            }
        }

        self.caret_changed(from);
        if self.follow_caret {
            self.reveal_caret();
        }
    }

    // ---- scrolling --------------------------------------------------------

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Total height of the laid out text, document margins included
    pub fn content_height(&self) -> f32 {
        self.heights.total_height() + 2.0 * self.document_margin
    }

    /// Extra room below the last line so it can be scrolled up towards the
    /// top, leaving `bottom_lines` lines of text on screen
    pub fn overscroll(&self) -> f32 {
        self.visible_rows().saturating_sub(self.bottom_lines) as f32 * self.metrics.line_height
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height() + self.overscroll() - self.viewport_height()).max(0.0)
    }

    /// Scroll to `y`, clamped to `0..=max_scroll()`. Returns whether the
    /// position changed.
    pub fn scroll_to(&mut self, y: f32) -> bool {
        let y = y.clamp(0.0, self.max_scroll());
        if y == self.scroll {
            return false;
        }
        self.scroll = y;
        self.changes.push(EditorChange::ScrollChanged);
        true
    }

    pub fn scroll_by(&mut self, dy: f32) -> bool {
        self.scroll_to(self.scroll + dy)
    }

    /// Scroll the least amount that brings the caret line fully on screen
    pub fn reveal_caret(&mut self) -> bool {
        let line = self.caret_line();
        let top = self.document_margin + self.heights.top(line);
        let bottom = self.document_margin + self.heights.bottom(line);
        let height = self.viewport_height();

        if top < self.scroll {
            self.scroll_to(top)
        } else if bottom > self.scroll + height {
            self.scroll_to(bottom - height)
        } else {
            false
        }
    }

    // ---- layout -----------------------------------------------------------

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    pub fn set_metrics(&mut self, metrics: FontMetrics) {
        if metrics == self.metrics {
            return;
        }
        self.metrics = metrics;
        self.refresh_viewport_wrap();
        self.layout_changed();
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Set the widget rectangle (gutter included)
    pub fn resize(&mut self, frame: Rect) {
        if frame == self.frame {
            return;
        }
        self.frame = frame;
        self.refresh_viewport_wrap();
        self.layout_changed();
    }

    pub fn left_margin(&self) -> f32 {
        self.left_margin
    }

    pub fn wrap_width(&self) -> Option<u32> {
        self.display.wraps.wrap_width()
    }

    /// Wrap at a fixed column, or turn wrapping off with `None`
    pub fn set_wrap_width(&mut self, wrap_width: Option<u32>) {
        self.wrap_to_viewport = false;
        if self.apply_wrap_width(wrap_width) {
            self.layout_changed();
        }
    }

    /// Wrap at whatever fits the viewport, following resizes
    pub fn wrap_to_viewport(&mut self) {
        self.wrap_to_viewport = true;
        if self.apply_wrap_width(self.viewport_wrap_width()) {
            self.layout_changed();
        }
    }

    /// Hide the lines after `start_line` through `end_line`. A caret inside
    /// moves to the fold line.
    pub fn fold(&mut self, start_line: usize, end_line: usize) -> bool {
        if !self.display.folds.fold(start_line, end_line) {
            return false;
        }

        let caret_line = self.caret_line();
        if caret_line > start_line && caret_line <= end_line {
            self.caret = self.rope.line_to_char(start_line);
            self.caret_changed(caret_line);
        }
        self.layout_changed();
        true
    }

    pub fn unfold(&mut self, start_line: usize) -> Option<FoldRegion> {
        let region = self.display.folds.unfold(start_line)?;
        self.layout_changed();
        Some(region)
    }

    /// Fold the indented block under `line`, or open the fold there
    pub fn toggle_fold(&mut self, line: usize) -> bool {
        if self.display.folds.fold_at_line(line).is_some() {
            return self.unfold(line).is_some();
        }
        match indent_block_end(&self.rope, line, self.tab_width) {
            Some(end) => self.fold(line, end),
            None => false,
        }
    }

    pub fn unfold_all(&mut self) {
        if self.display.folds.fold_count() == 0 {
            return;
        }
        self.display.folds = FoldMap::new(self.rope.len_lines());
        self.layout_changed();
    }

    pub fn folds(&self) -> impl Iterator<Item = &FoldRegion> {
        self.display.folds.folded_regions()
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Rows that fit in the viewport
    pub fn visible_rows(&self) -> usize {
        (self.viewport_height() / self.metrics.line_height).floor() as usize
    }

    /// Width of one tab stop in pixels
    pub fn tab_stop_width(&self) -> f32 {
        self.tab_width as f32 * self.metrics.char_width
    }

    /// X offset of the max-line-length ruler from the text's left edge
    pub fn ruler_x(&self) -> f32 {
        self.ruler_column as f32 * self.metrics.char_width
    }

    pub fn line_heights(&self) -> &LineHeightIndex {
        &self.heights
    }

    /// Viewport state through the height index
    pub fn viewport_state(&self) -> ViewportState {
        ViewportState::compute_indexed(self, &self.heights)
    }

    /// Line under an editor-space y coordinate
    pub fn line_at_y(&self, y: f32) -> usize {
        let viewport = self.viewport_geometry();
        self.heights
            .line_at(y - viewport.min.y + self.scroll - self.document_margin)
    }

    /// Char index under an editor-space point, clamped to the line under it
    pub fn char_at(&self, point: Vec2) -> usize {
        let line = self.line_at_y(point.y);
        let viewport = self.viewport_geometry();
        let line_top = viewport.min.y + self.document_margin + self.heights.top(line) - self.scroll;
        let row = ((point.y - line_top) / self.metrics.line_height).floor().max(0.0) as usize;
        let column = ((point.x - viewport.min.x - self.document_margin) / self.metrics.char_width)
            .round()
            .max(0.0) as usize;

        let column = match self.wrap_width() {
            Some(width) => row * width as usize + column.min(width as usize),
            None => column,
        };
        let len = line_text(&self.rope, line).chars().count();
        self.rope.line_to_char(line) + column.min(len)
    }

    // ---- notifications ----------------------------------------------------

    pub fn drain_changes(&mut self) -> Vec<EditorChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    // ---- internals --------------------------------------------------------

    fn viewport_height(&self) -> f32 {
        self.frame.height()
    }

    fn viewport_wrap_width(&self) -> Option<u32> {
        let width = self.viewport_geometry().width() - 2.0 * self.document_margin;
        Some((width / self.metrics.char_width).floor().max(1.0) as u32)
    }

    fn apply_wrap_width(&mut self, wrap_width: Option<u32>) -> bool {
        self.display.wraps.set_wrap_width(wrap_width, &self.rope)
    }

    fn refresh_viewport_wrap(&mut self) {
        if self.wrap_to_viewport {
            self.apply_wrap_width(self.viewport_wrap_width());
        }
    }

    fn relayout(&mut self) {
        let line_height = self.metrics.line_height;
        let display = &self.display;
        self.heights = LineHeightIndex::from_heights(
            (0..self.rope.len_lines()).map(|line| display.rows(line) as f32 * line_height),
        );
    }

    fn layout_changed(&mut self) {
        self.relayout();
        self.changes.push(EditorChange::LayoutChanged);
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let scroll = self.scroll;
        self.scroll_to(scroll);
    }

    fn text_changed(&mut self, first_line: usize, old_lines: usize, new_lines: usize, old_count: usize) {
        self.version += 1;
        self.changes.push(EditorChange::TextChanged {
            first_line,
            old_lines,
            new_lines,
        });
        let new = self.rope.len_lines();
        if new != old_count {
            self.changes.push(EditorChange::LineCountChanged { old: old_count, new });
        }
    }

    fn caret_changed(&mut self, from: usize) {
        let to = self.caret_line();
        if to != from {
            self.changes.push(EditorChange::CaretMoved { from, to });
        }
    }
}

impl Default for EditorDocument {
    fn default() -> Self {
        Self::new("", FontMetrics::default())
    }
}

impl ViewportQuery for EditorDocument {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_bounds(&self, line: usize) -> Rect {
        let top = self.document_margin + self.heights.top(line);
        let bottom = self.document_margin + self.heights.bottom(line);
        Rect::new(0.0, top, self.viewport_geometry().width(), bottom)
    }

    fn is_line_visible(&self, line: usize) -> bool {
        self.display.is_line_visible(line)
    }

    fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    fn viewport_geometry(&self) -> Rect {
        let left = (self.frame.min.x + self.left_margin).min(self.frame.max.x);
        Rect::new(left, self.frame.min.y, self.frame.max.x, self.frame.max.y)
    }

    fn document_margin(&self) -> f32 {
        self.document_margin
    }

    fn caret_line(&self) -> usize {
        self.rope.char_to_line(self.caret)
    }
}

impl GutterHost for EditorDocument {
    fn set_left_margin(&mut self, width: f32) {
        if width == self.left_margin {
            return;
        }
        self.left_margin = width;
        self.refresh_viewport_wrap();
        self.layout_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gutter::{GutterFrame, GutterLayout, GutterRenderer};
    use crate::viewport::first_visible_line;

    fn metrics() -> FontMetrics {
        FontMetrics {
            line_height: 20.0,
            char_width: 8.0,
            digit_width: 8.0,
        }
    }

    fn numbered(lines: usize) -> String {
        (1..=lines).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    fn document(lines: usize) -> EditorDocument {
        let mut document = EditorDocument::new(&numbered(lines), metrics());
        document.resize(Rect::new(0.0, 0.0, 400.0, 200.0));
        document.drain_changes();
        document
    }

    #[test]
    fn test_line_bounds_stack_rows() {
        let mut document = document(5);
        document.document_margin = 4.0;
        document.relayout();

        let bounds = document.line_bounds(2);
        assert_eq!((bounds.min.y, bounds.max.y), (44.0, 64.0));
        assert_eq!(document.content_height(), 108.0);
        assert_eq!(document.line(2), "line 3");
    }

    #[test]
    fn test_insert_newline_reports_lines() {
        let mut document = document(3);
        let at = document.rope().line_to_char(1) + 2;
        document.insert(at, "\nnew\n");

        assert_eq!(
            document.drain_changes(),
            vec![
                EditorChange::TextChanged { first_line: 1, old_lines: 1, new_lines: 3 },
                EditorChange::LineCountChanged { old: 3, new: 5 },
            ]
        );
        assert_eq!(document.line(1), "li");
        assert_eq!(document.line(2), "new");
        assert_eq!(document.line(3), "ne 2");
        assert_eq!(document.version(), 1);
    }

    #[test]
    fn test_insert_within_line_keeps_count() {
        let mut document = document(3);
        document.insert(0, "# ");
        assert_eq!(
            document.drain_changes(),
            vec![EditorChange::TextChanged { first_line: 0, old_lines: 1, new_lines: 1 }]
        );
    }

    #[test]
    fn test_remove_across_lines() {
        let mut document = document(4);
        let start = document.rope().line_to_char(1) + 4;
        let end = document.rope().line_to_char(3) + 4;
        document.remove(start..end);

        assert_eq!(document.line(1), "line 4");
        assert_eq!(
            document.drain_changes(),
            vec![
                EditorChange::TextChanged { first_line: 1, old_lines: 3, new_lines: 1 },
                EditorChange::LineCountChanged { old: 4, new: 2 },
            ]
        );
    }

    #[test]
    fn test_caret_follows_edits() {
        let mut document = document(3);
        let end_of_second = document.rope().line_to_char(1) + 6;
        document.set_caret(end_of_second);
        assert_eq!(document.caret_line(), 1);
        document.drain_changes();

        document.insert(0, "top\n");
        assert_eq!(document.caret_line(), 2);
        assert!(document
            .drain_changes()
            .contains(&EditorChange::CaretMoved { from: 1, to: 2 }));

        document.remove(0..4);
        assert_eq!(document.caret(), end_of_second);

        // caret inside removed text moves to its start
        document.remove(end_of_second - 3..end_of_second + 3);
        assert_eq!(document.caret(), end_of_second - 3);
    }

    #[test]
    fn test_caret_moves_report_lines() {
        let mut document = document(5);
        document.set_caret(2);
        assert!(document.drain_changes().is_empty());

        document.set_caret(document.rope().line_to_char(3));
        assert_eq!(document.drain_changes(), vec![EditorChange::CaretMoved { from: 0, to: 3 }]);

        document.set_caret(usize::MAX);
        assert_eq!(document.caret(), document.rope().len_chars());
    }

    #[test]
    fn test_scroll_is_clamped_with_overscroll() {
        let mut document = document(100);
        // 10 rows visible, 3 kept at the end
        assert_eq!(document.overscroll(), 140.0);
        assert_eq!(document.max_scroll(), 2000.0 + 140.0 - 200.0);

        assert!(document.scroll_to(5000.0));
        assert_eq!(document.scroll(), 1940.0);
        assert!(document.scroll_by(-10_000.0));
        assert_eq!(document.scroll(), 0.0);
        assert!(!document.scroll_to(-1.0));
        assert_eq!(document.drain_changes(), vec![EditorChange::ScrollChanged; 2]);
    }

    #[test]
    fn test_overscroll_keeps_bottom_lines_on_screen() {
        let mut document = document(12);
        assert_eq!(document.max_scroll(), 240.0 + 140.0 - 200.0);
        document.scroll_to(1000.0);
        // the last three lines remain at the top
        assert_eq!(document.line_at_y(0.0), 9);

        let mut short = EditorDocument::new("a\nb", metrics());
        short.resize(Rect::new(0.0, 0.0, 400.0, 200.0));
        assert_eq!(short.max_scroll(), 0.0);
    }

    #[test]
    fn test_reveal_caret() {
        let mut document = document(100);
        document.follow_caret = false;

        document.set_caret(document.rope().line_to_char(30));
        assert!(document.reveal_caret());
        // line 30 spans 600..620, bottom aligned with the viewport
        assert_eq!(document.scroll(), 420.0);
        assert!(!document.reveal_caret());

        document.set_caret(document.rope().line_to_char(5));
        assert!(document.reveal_caret());
        assert_eq!(document.scroll(), 100.0);
    }

    #[test]
    fn test_follow_caret_scrolls() {
        let mut document = document(100);
        document.set_caret(document.rope().line_to_char(50));
        assert_eq!(document.viewport_state().first_visible_line, 41);
    }

    #[test]
    fn test_indexed_viewport_matches_scan() {
        let mut document = document(200);
        document.document_margin = 4.0;
        document.set_wrap_width(Some(5));
        document.fold(10, 20);
        document.fold(40, 41);

        for step in 0..300 {
            document.scroll_to(step as f32 * 13.0);
            assert_eq!(
                document.viewport_state().first_visible_line,
                first_visible_line(&document),
                "scroll {}",
                document.scroll()
            );
        }
    }

    #[test]
    fn test_wrapping_grows_line_heights() {
        let mut document = EditorDocument::new("short\n0123456789abcdefghij", metrics());
        document.set_wrap_width(Some(8));
        assert_eq!(document.line_bounds(1).height(), 60.0);
        assert_eq!(document.drain_changes(), vec![EditorChange::LayoutChanged]);

        document.set_wrap_width(None);
        assert_eq!(document.line_bounds(1).height(), 20.0);
    }

    #[test]
    fn test_wrap_to_viewport_follows_resize() {
        let mut document = EditorDocument::new(&"x".repeat(100), metrics());
        document.resize(Rect::new(0.0, 0.0, 400.0, 200.0));
        document.wrap_to_viewport();
        assert_eq!(document.wrap_width(), Some(50));

        document.set_left_margin(80.0);
        assert_eq!(document.wrap_width(), Some(40));
        assert_eq!(document.line_bounds(0).height(), 60.0);
    }

    #[test]
    fn test_fold_hides_lines_and_moves_caret() {
        let mut document = document(10);
        document.set_caret(document.rope().line_to_char(4));
        document.drain_changes();

        assert!(document.fold(2, 6));
        assert_eq!(document.caret_line(), 2);
        assert!(!document.is_line_visible(4));
        assert_eq!(document.line_bounds(4).height(), 0.0);
        assert_eq!(document.line_bounds(7).min.y, 60.0);
        assert_eq!(
            document.drain_changes(),
            vec![EditorChange::CaretMoved { from: 4, to: 2 }, EditorChange::LayoutChanged]
        );

        assert_eq!(document.unfold(2), Some(FoldRegion::new(2, 6)));
        assert_eq!(document.line_bounds(7).min.y, 140.0);
    }

    #[test]
    fn test_toggle_fold_uses_indentation() {
        let mut document = EditorDocument::new(
            "def f():\n    a = 1\n    return a\n\nprint(f())",
            metrics(),
        );
        assert!(document.toggle_fold(0));
        assert_eq!(document.folds().next(), Some(&FoldRegion::new(0, 2)));
        assert!(!document.toggle_fold(4));

        assert!(document.toggle_fold(0));
        assert_eq!(document.folds().count(), 0);

        document.toggle_fold(0);
        document.unfold_all();
        assert!(document.is_line_visible(1));
    }

    #[test]
    fn test_caret_into_fold_opens_it() {
        let mut document = document(10);
        document.fold(2, 6);
        document.set_caret(document.rope().line_to_char(5));
        assert_eq!(document.folds().count(), 0);
        assert!(document.is_line_visible(5));
    }

    #[test]
    fn test_set_text_resets() {
        let mut document = document(10);
        document.fold(1, 3);
        document.set_caret(document.rope().len_chars());
        document.drain_changes();

        document.set_text("one\ntwo");
        assert_eq!(document.folds().count(), 0);
        assert_eq!(document.caret(), 7);
        let changes = document.drain_changes();
        assert_eq!(changes[0], EditorChange::TextChanged { first_line: 0, old_lines: 10, new_lines: 2 });
        assert_eq!(changes[1], EditorChange::LineCountChanged { old: 10, new: 2 });
        assert!(changes.contains(&EditorChange::CaretMoved { from: 9, to: 1 }));
    }

    #[test]
    fn test_gutter_margin_insets_viewport() {
        let mut document = document(120);
        let mut layout = GutterLayout::new(8.0, 10.0, 10.0);
        layout.update_line_count(document.line_count(), &mut document);

        assert_eq!(document.left_margin(), 44.0);
        assert_eq!(document.viewport_geometry().min.x, 44.0);
        assert_eq!(document.line_bounds(0).width(), 356.0);
    }

    #[test]
    fn test_gutter_paints_document() {
        let mut document = document(30);
        document.scroll_to(50.0);
        let renderer = GutterRenderer::new(
            GutterLayout::new(8.0, 10.0, 10.0),
            crate::gutter::GutterColors::from(&crate::settings::ThemeSettings::default()),
            20.0,
        );

        let mut frame = GutterFrame::new();
        renderer.paint(&mut frame, Rect::new(0.0, 0.0, 36.0, 200.0), &document);
        let labels: Vec<String> = frame.labels().map(|l| l.text.clone()).collect();
        // line 3 spans 40..60 and is cut off; labels start at line 4 with y 10
        assert_eq!(labels.first().map(String::as_str), Some("4"));
        assert_eq!(frame.labels().next().map(|l| l.rect.min.y), Some(10.0));
        assert_eq!(labels.len(), 10);
    }

    #[test]
    fn test_apply_settings_relayouts() {
        let mut document = document(3);
        let mut settings = EditorSettings::default();
        settings.indentation.tab_width = 2;
        settings.ui.ruler_column = 100;
        settings.wrapping.enabled = true;
        settings.wrapping.wrap_column = Some(3);
        document.apply_settings(&settings);

        assert_eq!(document.tab_width(), 2);
        assert_eq!(document.wrap_width(), Some(3));
        assert_eq!(document.ruler_x(), 100.0 * document.metrics().char_width);
        assert_eq!(document.drain_changes(), vec![EditorChange::LayoutChanged]);

        settings.wrapping.enabled = false;
        document.apply_settings(&settings);
        assert_eq!(document.wrap_width(), None);
    }

    #[test]
    fn test_ruler_and_tab_stops() {
        let document = document(1);
        assert_eq!(document.ruler_x(), 968.0);
        assert_eq!(document.tab_stop_width(), 32.0);
    }

    #[test]
    fn test_char_at_point() {
        let mut document = document(10);
        assert_eq!(document.char_at(Vec2::new(25.0, 25.0)), 10);
        // past the end of the line
        assert_eq!(document.char_at(Vec2::new(390.0, 25.0)), 13);

        document.set_wrap_width(Some(4));
        // "line 2" wraps into "line" / " 2", second row of line 1 starts at y 60
        assert_eq!(document.char_at(Vec2::new(9.0, 65.0)), 7 + 5);
    }

    #[test]
    fn test_line_at_y() {
        let mut document = document(50);
        document.scroll_to(30.0);
        assert_eq!(document.line_at_y(0.0), 1);
        assert_eq!(document.line_at_y(15.0), 2);
    }
}
