//! Line number gutter
//!
//! The gutter is painted from [`ViewportQuery`] data only. Drawing goes
//! through the [`GutterPainter`] trait; [`GutterFrame`] records the draw
//! calls so the Bevy systems (and tests) can consume them.

use bevy::prelude::*;

use crate::settings::{EditorSettings, ThemeSettings};
use crate::viewport::{CaretState, ViewportQuery, ViewportState};

/// Receives the gutter width so the host can inset its text area
pub trait GutterHost {
    fn set_left_margin(&mut self, width: f32);
}

/// Drawing surface of the gutter
pub trait GutterPainter {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `text` right-aligned inside `rect`
    fn draw_text_right(&mut self, rect: Rect, text: &str, color: Color);
}

/// Number of decimal digits in `n`
pub fn digit_count(n: usize) -> usize {
    let mut digits = 1;
    let mut rest = n / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

/// Gutter width bookkeeping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GutterLayout {
    pub digit_width: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    line_count: usize,
}

impl GutterLayout {
    pub fn new(digit_width: f32, left_margin: f32, right_margin: f32) -> Self {
        Self {
            digit_width,
            left_margin,
            right_margin,
            line_count: 1,
        }
    }

    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self::new(
            settings.font.digit_width,
            settings.ui.gutter_padding_left,
            settings.ui.gutter_padding_right,
        )
    }

    /// Width needed to show numbers up to `line_count`
    pub fn width_for(&self, line_count: usize) -> f32 {
        digit_count(line_count.max(1)) as f32 * self.digit_width + self.left_margin + self.right_margin
    }

    pub fn width(&self) -> f32 {
        self.width_for(self.line_count)
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Record a new line count. When the width changes the host gets the
    /// new left margin and `true` is returned.
    pub fn update_line_count<H: GutterHost + ?Sized>(&mut self, line_count: usize, host: &mut H) -> bool {
        let old = self.width();
        self.line_count = line_count;
        let new = self.width();
        if new != old {
            host.set_left_margin(new);
            true
        } else {
            false
        }
    }

    /// Push the current width to the host unconditionally
    pub fn apply<H: GutterHost + ?Sized>(&self, host: &mut H) {
        host.set_left_margin(self.width());
    }
}

/// Colors the gutter paints with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GutterColors {
    pub background: Color,
    pub number: Color,
    pub active_number: Color,
}

impl From<&ThemeSettings> for GutterColors {
    fn from(theme: &ThemeSettings) -> Self {
        Self {
            background: theme.gutter_background,
            number: theme.line_numbers,
            active_number: theme.line_numbers_active,
        }
    }
}

/// Paints line numbers for the lines a [`ViewportQuery`] reports on screen
#[derive(Clone, Debug)]
pub struct GutterRenderer {
    pub layout: GutterLayout,
    pub colors: GutterColors,
    /// Height of the number label (one text row)
    pub label_height: f32,
    pub highlight_active_line: bool,
}

impl GutterRenderer {
    pub fn new(layout: GutterLayout, colors: GutterColors, label_height: f32) -> Self {
        Self {
            layout,
            colors,
            label_height,
            highlight_active_line: true,
        }
    }

    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self {
            layout: GutterLayout::from_settings(settings),
            colors: GutterColors::from(&settings.theme),
            label_height: settings.font.line_height,
            highlight_active_line: settings.ui.highlight_active_line,
        }
    }

    pub fn width(&self) -> f32 {
        self.layout.width()
    }

    /// Paint `region` using a freshly computed viewport
    pub fn paint<Q, P>(&self, painter: &mut P, region: Rect, query: &Q)
    where
        Q: ViewportQuery + ?Sized,
        P: GutterPainter + ?Sized,
    {
        let viewport = ViewportState::compute(query);
        self.paint_with(painter, region, query, &viewport, CaretState::of(query));
    }

    /// Paint `region` from an already computed viewport state.
    ///
    /// Lines whose bottom is above the region or that are collapsed are
    /// skipped; painting stops at the first line starting below it.
    pub fn paint_with<Q, P>(
        &self,
        painter: &mut P,
        region: Rect,
        query: &Q,
        viewport: &ViewportState,
        caret: CaretState,
    ) where
        Q: ViewportQuery + ?Sized,
        P: GutterPainter + ?Sized,
    {
        painter.fill_rect(region, self.colors.background);

        let text_right = self.layout.width() - self.layout.right_margin;
        for extent in viewport.extents(query, region.max.y) {
            if !extent.visible || extent.bottom < region.min.y {
                continue;
            }

            let color = if self.highlight_active_line && extent.index == caret.current_line {
                self.colors.active_number
            } else {
                self.colors.number
            };
            let rect = Rect::new(0.0, extent.top, text_right, extent.top + self.label_height);
            painter.draw_text_right(rect, &(extent.index + 1).to_string(), color);
        }
    }

    /// Editor-space rectangle covering the gutter rows of `lines`, for
    /// repainting only what a caret move touched. `None` if none of them
    /// is on screen.
    pub fn dirty_region<Q: ViewportQuery + ?Sized>(&self, query: &Q, lines: &[usize]) -> Option<Rect> {
        let viewport = ViewportState::compute(query);
        let geometry = query.viewport_geometry();

        viewport
            .extents(query, geometry.max.y)
            .filter(|extent| extent.visible && lines.contains(&extent.index))
            .map(|extent| Rect::new(0.0, extent.top, self.width(), extent.bottom))
            .reduce(|a, b| a.union(b))
            .map(|rect| rect.intersect(Rect::new(0.0, geometry.min.y, self.width(), geometry.max.y)))
            .filter(|rect| !rect.is_empty())
    }
}

/// One line number drawn by the gutter
#[derive(Clone, Debug, PartialEq)]
pub struct GutterLabel {
    pub text: String,
    pub rect: Rect,
    pub color: Color,
}

/// A recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum GutterCommand {
    Fill { rect: Rect, color: Color },
    Text(GutterLabel),
}

/// Painter that records draw calls
#[derive(Clone, Debug, Default)]
pub struct GutterFrame {
    pub commands: Vec<GutterCommand>,
}

impl GutterFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> impl Iterator<Item = &GutterLabel> + '_ {
        self.commands.iter().filter_map(|command| match command {
            GutterCommand::Text(label) => Some(label),
            GutterCommand::Fill { .. } => None,
        })
    }

    pub fn background(&self) -> Option<(Rect, Color)> {
        self.commands.iter().find_map(|command| match command {
            GutterCommand::Fill { rect, color } => Some((*rect, *color)),
            GutterCommand::Text(_) => None,
        })
    }
}

impl GutterPainter for GutterFrame {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(GutterCommand::Fill { rect, color });
    }

    fn draw_text_right(&mut self, rect: Rect, text: &str, color: Color) {
        self.commands.push(GutterCommand::Text(GutterLabel {
            text: text.to_string(),
            rect,
            color,
        }));
    }
}
