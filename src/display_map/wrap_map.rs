//! Wrap Map - soft wrapping of long lines
//!
//! One buffer line is shown across `ceil(len / wrap_width)` display rows.
//! Empty lines still take one row. Without a wrap width every line is a
//! single row.

use ropey::Rope;

use crate::syntax::line_text;

/// Number of display rows per buffer line
#[derive(Clone, Debug, Default)]
pub struct WrapMap {
    /// Wrap width in characters, `None` disables wrapping
    wrap_width: Option<u32>,
    rows: Vec<u32>,
    total_rows: u32,
}

impl WrapMap {
    pub fn new(wrap_width: Option<u32>) -> Self {
        Self {
            wrap_width: wrap_width.map(|width| width.max(1)),
            rows: Vec::new(),
            total_rows: 0,
        }
    }

    pub fn wrap_width(&self) -> Option<u32> {
        self.wrap_width
    }

    pub fn is_enabled(&self) -> bool {
        self.wrap_width.is_some()
    }

    /// Change the wrap width and recompute every line. Returns false when
    /// the width was already set.
    pub fn set_wrap_width(&mut self, wrap_width: Option<u32>, rope: &Rope) -> bool {
        let wrap_width = wrap_width.map(|width| width.max(1));
        if wrap_width == self.wrap_width {
            return false;
        }
        self.wrap_width = wrap_width;
        self.update(rope);
        true
    }

    /// Recompute rows for the whole document
    pub fn update(&mut self, rope: &Rope) {
        self.rows = (0..rope.len_lines()).map(|line| self.rows_for(rope, line)).collect();
        self.total_rows = self.rows.iter().sum();
    }

    /// Recompute after `old_lines` lines at `first_line` became `new_lines`
    pub fn splice(&mut self, rope: &Rope, first_line: usize, old_lines: usize, new_lines: usize) {
        let end = (first_line + old_lines).min(self.rows.len());
        let first = first_line.min(end);
        let fresh: Vec<u32> = (first_line..first_line + new_lines)
            .map(|line| self.rows_for(rope, line))
            .collect();
        self.rows.splice(first..end, fresh);

        if self.rows.len() != rope.len_lines() {
            // out of step with the rope, start over
            self.update(rope);
            return;
        }
        self.total_rows = self.rows.iter().sum();
    }

    /// Display rows taken by `line`, 1 for lines past the end
    pub fn rows(&self, line: usize) -> u32 {
        self.rows.get(line).copied().unwrap_or(1)
    }

    pub fn display_row_count(&self) -> u32 {
        self.total_rows
    }

    /// Row within `line` and column within that row for a char column
    pub fn wrap_position(&self, line: usize, column: usize) -> (u32, u32) {
        let column = column as u32;
        match self.wrap_width {
            Some(width) => {
                let row = (column / width).min(self.rows(line).saturating_sub(1));
                (row, column - row * width)
            }
            None => (0, column),
        }
    }

    fn rows_for(&self, rope: &Rope, line: usize) -> u32 {
        let Some(width) = self.wrap_width else {
            return 1;
        };
        if line >= rope.len_lines() {
            return 1;
        }
        let len = line_text(rope, line).chars().count() as u32;
        len.div_ceil(width).max(1)
    }
}
