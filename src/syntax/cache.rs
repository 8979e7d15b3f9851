//! Per-line span cache kept in step with the document's line structure

use std::ops::Range;

use bevy::prelude::Resource;
use ropey::Rope;

use super::highlighter::{StyleSpan, SyntaxProvider};

/// Highlighted spans for every document line.
///
/// Edits splice the cache the same way they splice the document, so only
/// lines whose text changed are handed back to the provider.
#[derive(Resource, Clone, Debug, Default)]
pub struct HighlightCache {
    lines: Vec<Vec<StyleSpan>>,
    /// Incremented on every update
    version: u64,
}

impl HighlightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-highlight the whole document
    pub fn rebuild(&mut self, provider: &dyn SyntaxProvider, rope: &Rope) {
        self.lines = provider.highlight_range(rope, 0..rope.len_lines());
        self.version += 1;
    }

    /// Replace `old_lines` cached lines starting at `first_line` with fresh
    /// highlights of the `new_lines` lines that now occupy that position.
    pub fn splice(
        &mut self,
        provider: &dyn SyntaxProvider,
        rope: &Rope,
        first_line: usize,
        old_lines: usize,
        new_lines: usize,
    ) {
        let first = first_line.min(self.lines.len());
        let old_end = (first + old_lines).min(self.lines.len());
        let fresh = provider.highlight_range(rope, first..first + new_lines);
        self.lines.splice(first..old_end, fresh);
        self.version += 1;
    }

    /// Clear all spans (highlighting disabled)
    pub fn clear(&mut self, line_count: usize) {
        self.lines = vec![Vec::new(); line_count];
        self.version += 1;
    }

    pub fn line(&self, line: usize) -> &[StyleSpan] {
        self.lines.get(line).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lines(&self, range: Range<usize>) -> impl Iterator<Item = &[StyleSpan]> + '_ {
        range.map(move |line| self.line(line))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
