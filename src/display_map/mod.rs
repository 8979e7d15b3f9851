//! Display Map - how buffer lines turn into display rows
//!
//! - **FoldMap**: hides folded regions, collapsing several buffer lines into one
//! - **WrapMap**: wraps long lines visually without modifying the buffer
//!
//! A buffer line takes `rows(line)` display rows: zero when it is folded
//! away, otherwise the number of soft-wrapped rows.

mod fold_map;
mod wrap_map;

pub use fold_map::*;
pub use wrap_map::*;

use ropey::Rope;

/// Fold and wrap layers for one document
#[derive(Clone, Debug, Default)]
pub struct DisplayMap {
    pub folds: FoldMap,
    pub wraps: WrapMap,
}

impl DisplayMap {
    pub fn new(rope: &Rope, wrap_width: Option<u32>) -> Self {
        let mut wraps = WrapMap::new(wrap_width);
        wraps.update(rope);
        Self {
            folds: FoldMap::new(rope.len_lines()),
            wraps,
        }
    }

    /// Rebuild both layers for new content, dropping all folds
    pub fn reset(&mut self, rope: &Rope) {
        self.folds = FoldMap::new(rope.len_lines());
        self.wraps.update(rope);
    }

    /// Follow an edit that replaced `old_lines` lines at `first_line`
    pub fn splice(&mut self, rope: &Rope, first_line: usize, old_lines: usize, new_lines: usize) {
        self.folds.splice(first_line, old_lines, new_lines);
        self.wraps.splice(rope, first_line, old_lines, new_lines);
        self.folds.set_line_count(rope.len_lines());
    }

    pub fn is_line_visible(&self, line: usize) -> bool {
        !self.folds.is_line_hidden(line)
    }

    /// Display rows taken by `line`
    pub fn rows(&self, line: usize) -> u32 {
        if self.folds.is_line_hidden(line) {
            0
        } else {
            self.wraps.rows(line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_combine_folds_and_wraps() {
        let rope = Rope::from_str("def f():\n    return 1234567890\n    pass\nx = 1");
        let mut map = DisplayMap::new(&rope, Some(10));

        assert_eq!((0..4).map(|l| map.rows(l)).collect::<Vec<_>>(), vec![1, 3, 1, 1]);

        assert!(map.folds.fold(0, 2));
        assert_eq!((0..4).map(|l| map.rows(l)).collect::<Vec<_>>(), vec![1, 0, 0, 1]);
        assert!(!map.is_line_visible(1));
    }

    #[test]
    fn test_reset_drops_folds() {
        let rope = Rope::from_str("a\nb\nc");
        let mut map = DisplayMap::new(&rope, None);
        map.folds.fold(0, 1);
        map.reset(&Rope::from_str("a\nb\nc\nd"));
        assert_eq!(map.folds.fold_count(), 0);
        assert_eq!(map.folds.visible_line_count(), 4);
    }
}
