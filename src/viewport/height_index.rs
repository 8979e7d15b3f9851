//! Cumulative line heights for sub-linear position lookups

/// Prefix sums of line heights.
///
/// `tops[i]` is the distance from the first line's top to line `i`'s top;
/// the extra trailing entry is the total height. Rebuilt after layout
/// changes, queried by binary search.
#[derive(Clone, Debug, PartialEq)]
pub struct LineHeightIndex {
    tops: Vec<f32>,
}

impl Default for LineHeightIndex {
    fn default() -> Self {
        Self { tops: vec![0.0] }
    }
}

impl LineHeightIndex {
    pub fn from_heights(heights: impl IntoIterator<Item = f32>) -> Self {
        let mut tops = vec![0.0];
        let mut acc = 0.0;
        for height in heights {
            acc += height.max(0.0);
            tops.push(acc);
        }
        Self { tops }
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.tops.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_height(&self) -> f32 {
        self.tops[self.tops.len() - 1]
    }

    /// Top of `line`; lines past the end sit at the total height
    pub fn top(&self, line: usize) -> f32 {
        self.tops[line.min(self.len())]
    }

    pub fn bottom(&self, line: usize) -> f32 {
        self.top(line + 1)
    }

    pub fn height(&self, line: usize) -> f32 {
        self.bottom(line) - self.top(line)
    }

    /// First line whose top is at or below `y`, or `len()` if none
    pub fn first_line_at_or_below(&self, y: f32) -> usize {
        self.tops[..self.len()].partition_point(|&top| top < y)
    }

    /// Line covering `y`, clamped to the document. Zero-height lines never
    /// cover anything.
    pub fn line_at(&self, y: f32) -> usize {
        if self.is_empty() {
            return 0;
        }
        let after = self.tops[1..].partition_point(|&bottom| bottom <= y);
        after.min(self.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_sums() {
        let index = LineHeightIndex::from_heights([10.0, 20.0, 0.0, 5.0]);
        assert_eq!(index.len(), 4);
        assert_eq!(index.top(2), 30.0);
        assert_eq!(index.bottom(3), 35.0);
        assert_eq!(index.height(2), 0.0);
        assert_eq!(index.total_height(), 35.0);
        assert_eq!(index.top(99), 35.0);
    }

    #[test]
    fn test_line_at() {
        let index = LineHeightIndex::from_heights([10.0, 20.0, 0.0, 5.0]);
        assert_eq!(index.line_at(-5.0), 0);
        assert_eq!(index.line_at(0.0), 0);
        assert_eq!(index.line_at(10.0), 1);
        assert_eq!(index.line_at(29.9), 1);
        // the zero-height line 2 is skipped
        assert_eq!(index.line_at(30.0), 3);
        assert_eq!(index.line_at(500.0), 3);
    }

    #[test]
    fn test_first_line_at_or_below() {
        let index = LineHeightIndex::from_heights([10.0, 10.0, 10.0]);
        assert_eq!(index.first_line_at_or_below(-1.0), 0);
        assert_eq!(index.first_line_at_or_below(10.0), 1);
        assert_eq!(index.first_line_at_or_below(11.0), 2);
        assert_eq!(index.first_line_at_or_below(25.0), 3);
    }

    #[test]
    fn test_empty() {
        let index = LineHeightIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.line_at(10.0), 0);
        assert_eq!(index.first_line_at_or_below(0.0), 0);
    }
}
