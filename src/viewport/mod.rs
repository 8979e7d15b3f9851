//! Viewport tracking
//!
//! Works out which document line sits at the top of the viewport and where
//! every following line lands on screen. All y coordinates grow downwards.
//!
//! Two coordinate spaces are involved:
//!
//! - **document space**: what [`ViewportQuery::line_bounds`] returns, with the
//!   document margin included and no scrolling applied
//! - **editor space**: the widget the viewport and the gutter live in;
//!   a document point maps to `viewport.min + point - (0, scroll_offset)`

mod height_index;

pub use height_index::LineHeightIndex;

use std::iter::FusedIterator;

use bevy::prelude::*;

/// Read-only view of the host document and its layout.
///
/// The gutter depends only on this trait, so any text view (or a test
/// double) can drive it.
pub trait ViewportQuery {
    /// Number of lines (blocks) in the document
    fn line_count(&self) -> usize;

    /// Layout rectangle of a line in document space. Wrapped lines span
    /// several rows; collapsed lines have zero height.
    fn line_bounds(&self, line: usize) -> Rect;

    /// False for collapsed (folded) lines
    fn is_line_visible(&self, _line: usize) -> bool {
        true
    }

    /// Vertical scroll position in pixels, 0 at the top
    fn scroll_offset(&self) -> f32;

    /// The text viewport in editor space
    fn viewport_geometry(&self) -> Rect;

    /// Margin between the document edge and its first line
    fn document_margin(&self) -> f32 {
        0.0
    }

    /// Line holding the caret
    fn caret_line(&self) -> usize;
}

/// Result of one viewport computation. Not cached between paints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub first_visible_line: usize,
    pub scroll_offset: f32,
    /// Editor-space top of the first visible line
    pub line_top: f32,
    /// Editor-space bottom of the first visible line
    pub line_bottom: f32,
}

impl ViewportState {
    /// Compute with the linear scan
    pub fn compute<Q: ViewportQuery + ?Sized>(query: &Q) -> Self {
        Self::starting_at(query, first_visible_line(query))
    }

    /// Compute with a prebuilt height index
    pub fn compute_indexed<Q: ViewportQuery + ?Sized>(query: &Q, index: &LineHeightIndex) -> Self {
        Self::starting_at(query, first_visible_line_indexed(query, index))
    }

    fn starting_at<Q: ViewportQuery + ?Sized>(query: &Q, first_visible_line: usize) -> Self {
        let line_top = first_line_top(query, first_visible_line);
        let line_bottom = if first_visible_line < query.line_count() {
            line_top + query.line_bounds(first_visible_line).height()
        } else {
            line_top
        };
        Self {
            first_visible_line,
            scroll_offset: query.scroll_offset(),
            line_top,
            line_bottom,
        }
    }

    /// Extents of the lines from the first visible one down to `paint_bottom`
    pub fn extents<'a, Q: ViewportQuery + ?Sized>(&self, query: &'a Q, paint_bottom: f32) -> LineExtents<'a, Q> {
        LineExtents {
            query,
            next: self.first_visible_line,
            top: self.line_top,
            limit: paint_bottom,
        }
    }
}

/// The line the caret is on, as seen by the gutter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaretState {
    pub current_line: usize,
}

impl CaretState {
    pub fn of<Q: ViewportQuery + ?Sized>(query: &Q) -> Self {
        Self {
            current_line: query.caret_line(),
        }
    }
}

/// Vertical extent of one line in editor space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineExtent {
    pub index: usize,
    pub top: f32,
    pub bottom: f32,
    pub visible: bool,
}

/// Index of the first line whose on-screen rectangle lies entirely inside
/// the viewport.
///
/// Scans from the top of the document on every call. Returns 0 when the
/// document is not scrolled, and also when no line fits (a viewport shorter
/// than a line).
pub fn first_visible_line<Q: ViewportQuery + ?Sized>(query: &Q) -> usize {
    let scroll = query.scroll_offset();
    if scroll <= 0.0 {
        return 0;
    }

    let viewport = query.viewport_geometry();
    let shift = Vec2::new(viewport.min.x, viewport.min.y - scroll);

    (0..query.line_count())
        .find(|&line| {
            query.is_line_visible(line)
                && contains_rect(viewport, translate(query.line_bounds(line), shift))
        })
        .unwrap_or(0)
}

/// Same contract as [`first_visible_line`], answered by binary search over a
/// height index built from the same layout.
pub fn first_visible_line_indexed<Q: ViewportQuery + ?Sized>(query: &Q, index: &LineHeightIndex) -> usize {
    let scroll = query.scroll_offset();
    if scroll <= 0.0 {
        return 0;
    }

    let viewport = query.viewport_geometry();
    let margin = query.document_margin();
    let count = query.line_count().min(index.len());

    let mut line = index.first_line_at_or_below(scroll - margin);
    while line < count && !query.is_line_visible(line) {
        line += 1;
    }
    if line >= count {
        return 0;
    }

    // every later line ends further down, so only this one can fit
    let bottom = margin + index.bottom(line) - scroll;
    if bottom <= viewport.height() {
        line
    } else {
        0
    }
}

/// Lazily yields `(index, top, bottom)` for consecutive lines starting at
/// `start`, stopping once a line starts below `paint_rect` or the document
/// ends. Cloning restarts nothing; call again to restart.
pub fn line_extents<Q: ViewportQuery + ?Sized>(query: &Q, start: usize, paint_rect: Rect) -> LineExtents<'_, Q> {
    LineExtents {
        query,
        next: start,
        top: first_line_top(query, start),
        limit: paint_rect.max.y,
    }
}

/// Editor-space top of `line` when it is the first visible line.
///
/// For line 0 the document margin (minus scrolling) is the offset. For any
/// other line the visible part of the previous line, which is partly
/// scrolled off, sits above it.
fn first_line_top<Q: ViewportQuery + ?Sized>(query: &Q, line: usize) -> f32 {
    let viewport = query.viewport_geometry();
    let scroll = query.scroll_offset();

    let previous = (0..line).rev().find(|&l| query.is_line_visible(l));
    let offset = match previous {
        Some(previous) => {
            let local = Rect::new(0.0, 0.0, viewport.width(), viewport.height());
            let shifted = translate(query.line_bounds(previous), Vec2::new(0.0, -scroll));
            let visible = shifted.intersect(local);
            if visible.is_empty() {
                0.0
            } else {
                visible.height()
            }
        }
        None if line == 0 => query.document_margin() - scroll,
        None => query.line_bounds(line).min.y - scroll,
    };

    viewport.min.y + offset
}

/// Iterator over [`LineExtent`]s, see [`line_extents`]
pub struct LineExtents<'a, Q: ?Sized> {
    query: &'a Q,
    next: usize,
    top: f32,
    limit: f32,
}

impl<Q: ?Sized> Clone for LineExtents<'_, Q> {
    fn clone(&self) -> Self {
        Self {
            query: self.query,
            next: self.next,
            top: self.top,
            limit: self.limit,
        }
    }
}

impl<Q: ViewportQuery + ?Sized> Iterator for LineExtents<'_, Q> {
    type Item = LineExtent;

    fn next(&mut self) -> Option<LineExtent> {
        if self.next >= self.query.line_count() || self.top > self.limit {
            return None;
        }

        let index = self.next;
        let top = self.top;
        let bottom = top + self.query.line_bounds(index).height();
        self.next += 1;
        self.top = bottom;

        Some(LineExtent {
            index,
            top,
            bottom,
            visible: self.query.is_line_visible(index),
        })
    }
}

impl<Q: ViewportQuery + ?Sized> FusedIterator for LineExtents<'_, Q> {}

fn translate(rect: Rect, by: Vec2) -> Rect {
    Rect {
        min: rect.min + by,
        max: rect.max + by,
    }
}

/// Inclusive containment: a line resting exactly on the viewport edge counts
/// as inside.
fn contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.min.x >= outer.min.x
        && inner.min.y >= outer.min.y
        && inner.max.x <= outer.max.x
        && inner.max.y <= outer.max.y
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed layout: each line has its own height, hidden lines have none
    struct Layout {
        heights: Vec<f32>,
        hidden: Vec<usize>,
        margin: f32,
        scroll: f32,
        viewport: Rect,
        caret: usize,
    }

    impl Layout {
        fn uniform(lines: usize, height: f32, viewport_height: f32) -> Self {
            Self {
                heights: vec![height; lines],
                hidden: Vec::new(),
                margin: 0.0,
                scroll: 0.0,
                viewport: Rect::new(40.0, 0.0, 400.0, viewport_height),
                caret: 0,
            }
        }

        fn height(&self, line: usize) -> f32 {
            if self.hidden.contains(&line) {
                0.0
            } else {
                self.heights[line]
            }
        }

        fn index(&self) -> LineHeightIndex {
            LineHeightIndex::from_heights((0..self.heights.len()).map(|l| self.height(l)))
        }
    }

    impl ViewportQuery for Layout {
        fn line_count(&self) -> usize {
            self.heights.len()
        }

        fn line_bounds(&self, line: usize) -> Rect {
            let top = self.margin + (0..line).map(|l| self.height(l)).sum::<f32>();
            Rect::new(0.0, top, self.viewport.width(), top + self.height(line))
        }

        fn is_line_visible(&self, line: usize) -> bool {
            !self.hidden.contains(&line)
        }

        fn scroll_offset(&self) -> f32 {
            self.scroll
        }

        fn viewport_geometry(&self) -> Rect {
            self.viewport
        }

        fn document_margin(&self) -> f32 {
            self.margin
        }

        fn caret_line(&self) -> usize {
            self.caret
        }
    }

    #[test]
    fn test_top_of_document_is_line_zero() {
        let layout = Layout::uniform(100, 20.0, 200.0);
        assert_eq!(first_visible_line(&layout), 0);
        assert_eq!(first_visible_line_indexed(&layout, &layout.index()), 0);
    }

    #[test]
    fn test_scrolled_by_whole_lines() {
        let mut layout = Layout::uniform(100, 20.0, 200.0);
        layout.scroll = 60.0;
        assert_eq!(first_visible_line(&layout), 3);

        let state = ViewportState::compute(&layout);
        // previous line is fully scrolled off
        assert_eq!(state.line_top, 0.0);
        assert_eq!(state.line_bottom, 20.0);
    }

    #[test]
    fn test_partially_visible_previous_line_offsets_top() {
        let mut layout = Layout::uniform(100, 20.0, 200.0);
        layout.scroll = 55.0;
        // line 2 spans 40..60, 5px of it remain visible
        assert_eq!(first_visible_line(&layout), 3);

        let extents: Vec<LineExtent> = line_extents(&layout, 3, layout.viewport).take(2).collect();
        assert_eq!(extents[0].top, 5.0);
        assert_eq!(extents[0].bottom, 25.0);
        assert_eq!(extents[1].top, 25.0);

        // tops line up with the scrolled document
        for extent in &extents {
            let bounds = layout.line_bounds(extent.index);
            assert_eq!(extent.top, bounds.min.y - layout.scroll);
        }
    }

    #[test]
    fn test_document_margin_at_top() {
        let mut layout = Layout::uniform(5, 20.0, 200.0);
        layout.margin = 4.0;
        let first = line_extents(&layout, 0, layout.viewport).next().unwrap();
        assert_eq!((first.top, first.bottom), (4.0, 24.0));
    }

    #[test]
    fn test_viewport_shorter_than_a_line_defaults_to_zero() {
        let mut layout = Layout::uniform(10, 20.0, 15.0);
        layout.scroll = 30.0;
        assert_eq!(first_visible_line(&layout), 0);
        assert_eq!(first_visible_line_indexed(&layout, &layout.index()), 0);
    }

    #[test]
    fn test_empty_document() {
        let mut layout = Layout::uniform(0, 20.0, 200.0);
        layout.scroll = 10.0;
        assert_eq!(first_visible_line(&layout), 0);
        assert_eq!(line_extents(&layout, 0, layout.viewport).count(), 0);
        let state = ViewportState::compute(&layout);
        assert_eq!(state.line_top, state.line_bottom);
    }

    #[test]
    fn test_extents_stop_below_paint_rect() {
        let layout = Layout::uniform(100, 20.0, 200.0);
        let paint = Rect::new(0.0, 0.0, 40.0, 100.0);
        let extents: Vec<usize> = line_extents(&layout, 0, paint).map(|e| e.index).collect();
        // tops 0, 20, .., 100 are all <= the bottom edge
        assert_eq!(extents, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_extents_stop_at_document_end() {
        let layout = Layout::uniform(3, 20.0, 200.0);
        let extents: Vec<LineExtent> = line_extents(&layout, 0, layout.viewport).collect();
        assert_eq!(extents.len(), 3);
        assert_eq!(extents[2].bottom, 60.0);
    }

    #[test]
    fn test_extents_are_restartable() {
        let layout = Layout::uniform(10, 20.0, 200.0);
        let mut extents = line_extents(&layout, 0, layout.viewport);
        extents.next();
        let snapshot = extents.clone();
        assert_eq!(extents.collect::<Vec<_>>(), snapshot.collect::<Vec<_>>());
    }

    #[test]
    fn test_variable_heights() {
        let mut layout = Layout::uniform(6, 20.0, 100.0);
        layout.heights[1] = 60.0; // wrapped over three rows
        layout.scroll = 30.0;
        // line 1 spans 20..80 -> -10..50 after scrolling, not contained
        assert_eq!(first_visible_line(&layout), 2);

        let extents: Vec<LineExtent> = line_extents(&layout, 2, layout.viewport).collect();
        assert_eq!(extents[0].top, 50.0);
        assert_eq!(extents[0].bottom, 70.0);
    }

    #[test]
    fn test_hidden_lines_are_skipped_but_yielded() {
        let mut layout = Layout::uniform(10, 20.0, 200.0);
        layout.hidden = vec![2, 3];
        layout.scroll = 40.0;
        // lines 2 and 3 collapse at y = 40, the next visible line is 4
        assert_eq!(first_visible_line(&layout), 4);
        assert_eq!(first_visible_line_indexed(&layout, &layout.index()), 4);

        let extents: Vec<LineExtent> = line_extents(&layout, 1, layout.viewport).take(4).collect();
        assert!(extents[0].visible);
        assert!(!extents[1].visible);
        assert_eq!(extents[1].top, extents[1].bottom);
        assert_eq!(extents[3].index, 4);
    }

    #[test]
    fn test_indexed_lookup_agrees_with_scan() {
        let mut layout = Layout::uniform(40, 18.0, 130.0);
        layout.margin = 4.0;
        for (line, height) in layout.heights.iter_mut().enumerate() {
            *height = 18.0 * (1 + line % 3) as f32;
        }
        layout.hidden = vec![7, 8, 20];
        let index = layout.index();

        for step in 0..200 {
            layout.scroll = step as f32 * 7.0;
            assert_eq!(
                first_visible_line_indexed(&layout, &index),
                first_visible_line(&layout),
                "scroll {}",
                layout.scroll
            );
        }
    }
}
