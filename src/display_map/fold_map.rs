//! Fold Map - collapsed line ranges
//!
//! A folded region keeps its first line on screen and hides the lines after
//! it up to and including `end_line`.

use ropey::Rope;
use serde::{Deserialize, Serialize};

use crate::syntax::line_text;

/// A folded range of buffer lines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldRegion {
    /// First line, stays visible
    pub start_line: usize,
    /// Last hidden line (inclusive)
    pub end_line: usize,
}

impl FoldRegion {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self { start_line, end_line }
    }

    pub fn hidden_line_count(&self) -> usize {
        self.end_line - self.start_line
    }

    pub fn hides(&self, line: usize) -> bool {
        line > self.start_line && line <= self.end_line
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start_line <= end && start <= self.end_line
    }
}

/// Sorted, non-overlapping folds over a document of `line_count` lines
#[derive(Clone, Debug, Default)]
pub struct FoldMap {
    folds: Vec<FoldRegion>,
    line_count: usize,
    hidden: usize,
}

impl FoldMap {
    pub fn new(line_count: usize) -> Self {
        Self {
            folds: Vec::new(),
            line_count,
            hidden: 0,
        }
    }

    /// Fold `start..=end`. Refused (returns false) for empty ranges, ranges
    /// past the document end and ranges overlapping an existing fold.
    pub fn fold(&mut self, start: usize, end: usize) -> bool {
        if end <= start || end >= self.line_count {
            return false;
        }
        if self.folds.iter().any(|fold| fold.overlaps(start, end)) {
            return false;
        }

        let idx = self.folds.partition_point(|fold| fold.start_line < start);
        self.folds.insert(idx, FoldRegion::new(start, end));
        self.recount();
        true
    }

    /// Remove the fold starting at `start`
    pub fn unfold(&mut self, start: usize) -> Option<FoldRegion> {
        let idx = self
            .folds
            .binary_search_by_key(&start, |fold| fold.start_line)
            .ok()?;
        let region = self.folds.remove(idx);
        self.recount();
        Some(region)
    }

    /// Keep folds in place across an edit that replaced `old_lines` lines
    /// starting at `first_line` with `new_lines` lines. Folds touching the
    /// edited lines are dropped; folds below it move with the text.
    pub fn splice(&mut self, first_line: usize, old_lines: usize, new_lines: usize) {
        let edited_end = first_line + old_lines.max(1) - 1;
        self.folds.retain(|fold| !fold.overlaps(first_line, edited_end));

        for fold in &mut self.folds {
            if fold.start_line > edited_end {
                fold.start_line = fold.start_line + new_lines - old_lines;
                fold.end_line = fold.end_line + new_lines - old_lines;
            }
        }

        self.line_count = self.line_count + new_lines - old_lines;
        self.folds.retain(|fold| fold.end_line < self.line_count);
        self.recount();
    }

    pub fn set_line_count(&mut self, line_count: usize) {
        self.line_count = line_count;
        self.folds.retain(|fold| fold.end_line < line_count);
        self.recount();
    }

    /// O(log n) in the number of folds
    pub fn is_line_hidden(&self, line: usize) -> bool {
        let idx = self.folds.partition_point(|fold| fold.start_line < line);
        idx > 0 && self.folds[idx - 1].hides(line)
    }

    /// The fold whose visible first line is `line`
    pub fn fold_at_line(&self, line: usize) -> Option<&FoldRegion> {
        self.folds
            .binary_search_by_key(&line, |fold| fold.start_line)
            .ok()
            .map(|idx| &self.folds[idx])
    }

    pub fn visible_line_count(&self) -> usize {
        self.line_count - self.hidden
    }

    pub fn folded_regions(&self) -> impl Iterator<Item = &FoldRegion> {
        self.folds.iter()
    }

    pub fn fold_count(&self) -> usize {
        self.folds.len()
    }

    fn recount(&mut self) {
        self.hidden = self.folds.iter().map(FoldRegion::hidden_line_count).sum();
    }
}

/// Indentation width of a line, tabs counted as `tab_width` columns.
/// `None` for blank lines.
pub fn indent_width(text: &str, tab_width: usize) -> Option<usize> {
    let mut width = 0;
    for c in text.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += tab_width,
            _ => return Some(width),
        }
    }
    None
}

/// Last line of the indented block introduced by `line`.
///
/// The block is every following line indented deeper than `line`; blank
/// lines inside it belong to it, trailing blank lines do not. `None` when
/// the next non-blank line is not indented deeper.
pub fn indent_block_end(rope: &Rope, line: usize, tab_width: usize) -> Option<usize> {
    let base = indent_width(&line_text(rope, line), tab_width)?;
    let mut end = None;
    for next in line + 1..rope.len_lines() {
        match indent_width(&line_text(rope, next), tab_width) {
            Some(width) if width > base => end = Some(next),
            Some(_) => break,
            None => {}
        }
    }
    end
}
