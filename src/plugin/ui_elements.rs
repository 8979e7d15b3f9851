//! Rendering systems: code text, line numbers and gutter decorations
//!
//! Text entities are pooled. Each update repositions as many pooled entities
//! as there are things to draw, spawns the shortfall and hides the rest.

use bevy::prelude::*;

use super::to_bevy_coords;
use crate::document::EditorDocument;
use crate::events::LineCountChangedEvent;
use crate::gutter::{GutterFrame, GutterHost, GutterLabel, GutterRenderer};
use crate::settings::EditorSettings;
use crate::syntax::{line_text, segments_from_spans, HighlightCache};
use crate::types::*;
use crate::viewport::{CaretState, ViewportQuery};

pub(crate) const GUTTER_Z: f32 = 0.5;
pub(crate) const RULER_Z: f32 = 0.6;
pub(crate) const TEXT_Z: f32 = 1.0;
pub(crate) const DECORATION_Z: f32 = 2.0;

/// The gutter renderer and whether line numbers are shown at all
#[derive(Resource, Clone, Debug)]
pub struct GutterState {
    pub renderer: GutterRenderer,
    pub enabled: bool,
}

impl GutterState {
    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self {
            renderer: GutterRenderer::from_settings(settings),
            enabled: settings.ui.show_line_numbers,
        }
    }

    /// Gutter width; zero when line numbers are off
    pub fn width(&self) -> f32 {
        if self.enabled {
            self.renderer.width()
        } else {
            0.0
        }
    }

    /// Size the gutter for `line_count` lines and push the width to both hosts
    pub fn sync(&mut self, line_count: usize, document: &mut EditorDocument, viewport: &mut ViewportDimensions) {
        if self.enabled {
            self.renderer.layout.update_line_count(line_count, document);
        }
        let width = self.width();
        document.set_left_margin(width);
        viewport.set_left_margin(width);
    }

    /// Record every line number label for the current viewport
    pub fn paint(&self, document: &EditorDocument) -> GutterFrame {
        let geometry = document.viewport_geometry();
        let region = Rect::new(0.0, geometry.min.y, self.width(), geometry.max.y);

        let mut frame = GutterFrame::new();
        self.renderer.paint_with(
            &mut frame,
            region,
            document,
            &document.viewport_state(),
            CaretState::of(document),
        );
        frame
    }
}

/// One pooled text entity's content, positioned by its center in editor space
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextItem {
    pub text: String,
    pub color: Color,
    pub center: Vec2,
}

/// A piece of a highlighted segment that fits on one display row
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlacedSegment {
    pub row: usize,
    pub column: usize,
    pub text: String,
    pub color: Color,
}

/// Split a line's segments into display rows of `wrap_width` columns.
/// Whitespace-only pieces are dropped; tabs occupy one column.
pub(crate) fn place_segments(segments: &[LineSegment], wrap_width: Option<usize>) -> Vec<PlacedSegment> {
    let wrap_width = wrap_width.filter(|width| *width > 0);
    let mut placed = Vec::new();
    let mut offset = 0;

    for segment in segments {
        let chars: Vec<char> = segment
            .text
            .chars()
            .map(|c| if c == '\t' { ' ' } else { c })
            .collect();

        let mut start = 0;
        while start < chars.len() {
            let position = offset + start;
            let (row, column, take) = match wrap_width {
                Some(width) => (position / width, position % width, (width - position % width).min(chars.len() - start)),
                None => (0, position, chars.len() - start),
            };

            let text: String = chars[start..start + take].iter().collect();
            if !text.trim().is_empty() {
                placed.push(PlacedSegment {
                    row,
                    column,
                    text,
                    color: segment.color,
                });
            }
            start += take;
        }
        offset += chars.len();
    }
    placed
}

/// Code text for every display row on screen
pub(crate) fn code_text_items(document: &EditorDocument, cache: &HighlightCache, foreground: Color) -> Vec<TextItem> {
    let metrics = document.metrics();
    let geometry = document.viewport_geometry();
    let text_left = geometry.min.x + document.document_margin();
    let wrap_width = document.wrap_width().map(|width| width as usize);

    let mut items = Vec::new();
    for extent in document.viewport_state().extents(document, geometry.max.y) {
        if !extent.visible {
            continue;
        }

        let text = line_text(document.rope(), extent.index);
        let segments = segments_from_spans(&text, cache.line(extent.index), foreground);
        for piece in place_segments(&segments, wrap_width) {
            let top = extent.top + piece.row as f32 * metrics.line_height;
            if top + metrics.line_height <= geometry.min.y {
                continue;
            }
            if top >= geometry.max.y {
                break;
            }

            let len = piece.text.chars().count() as f32;
            items.push(TextItem {
                center: Vec2::new(
                    text_left + (piece.column as f32 + len / 2.0) * metrics.char_width,
                    top + metrics.line_height / 2.0,
                ),
                text: piece.text,
                color: piece.color,
            });
        }
    }
    items
}

/// A right-aligned gutter label, centered for `Text2d`
pub(crate) fn label_item(label: &GutterLabel, digit_width: f32) -> TextItem {
    let len = label.text.chars().count() as f32;
    TextItem {
        text: label.text.clone(),
        color: label.color,
        center: Vec2::new(label.rect.max.x - len * digit_width / 2.0, label.rect.center().y),
    }
}

type PooledText<'a> = (
    &'a mut Text2d,
    &'a mut TextColor,
    &'a mut TextFont,
    &'a mut Transform,
    &'a mut Visibility,
);

/// Show `items` on pooled text entities carrying `marker`
fn sync_text_pool<M: Component + Copy>(
    commands: &mut Commands,
    pool: &mut Query<PooledText, With<M>>,
    items: Vec<TextItem>,
    font: &TextFont,
    viewport: &ViewportDimensions,
    marker: M,
    name: &str,
) {
    let mut existing = pool.iter_mut();

    for item in items {
        let translation = to_bevy_coords(item.center.x, item.center.y, viewport, TEXT_Z);
        match existing.next() {
            Some((mut text, mut color, mut text_font, mut transform, mut visibility)) => {
                if text.0 != item.text {
                    text.0 = item.text;
                }
                color.0 = item.color;
                if text_font.font != font.font || text_font.font_size != font.font_size {
                    *text_font = font.clone();
                }
                transform.translation = translation;
                *visibility = Visibility::Visible;
            }
            None => {
                commands.spawn((
                    Text2d::new(item.text),
                    font.clone(),
                    TextColor(item.color),
                    Transform::from_translation(translation),
                    Visibility::Visible,
                    marker,
                    Name::new(name.to_string()),
                ));
            }
        }
    }

    for (_, _, _, _, mut visibility) in existing {
        *visibility = Visibility::Hidden;
    }
}

fn text_font(settings: &EditorSettings) -> TextFont {
    TextFont {
        font: settings.font.handle.clone().unwrap_or_default(),
        font_size: settings.font.size,
        ..default()
    }
}

/// Size the gutter for the initial text
pub(crate) fn init_gutter(
    mut state: ResMut<CodeEditorState>,
    mut gutter: ResMut<GutterState>,
    mut viewport: ResMut<ViewportDimensions>,
) {
    let line_count = state.document.line_count();
    gutter.sync(line_count, &mut state.document, &mut viewport);
    info!("gutter width {} for {} lines", gutter.width(), line_count);
}

/// Widen or narrow the gutter when the line count crosses a power of ten
pub(crate) fn update_gutter_width(
    mut events: MessageReader<LineCountChangedEvent>,
    mut state: ResMut<CodeEditorState>,
    mut gutter: ResMut<GutterState>,
    mut viewport: ResMut<ViewportDimensions>,
) {
    let Some(last) = events.read().last().copied() else {
        return;
    };
    if !gutter.enabled {
        return;
    }

    let state = &mut *state;
    if gutter.renderer.layout.update_line_count(last.new, &mut state.document) {
        gutter.renderer.layout.apply(&mut *viewport);
        debug!("gutter width now {} ({} lines)", gutter.width(), last.new);
    }
}

/// Update line number labels for the lines on screen
pub(crate) fn update_line_numbers(
    mut commands: Commands,
    state: Res<CodeEditorState>,
    settings: Res<EditorSettings>,
    gutter: Res<GutterState>,
    viewport: Res<ViewportDimensions>,
    mut pool: Query<PooledText, With<LineNumbers>>,
) {
    if !gutter.enabled {
        for (_, _, _, _, mut visibility) in pool.iter_mut() {
            *visibility = Visibility::Hidden;
        }
        return;
    }

    if !state.is_changed() && !gutter.is_changed() && !viewport.is_changed() && !settings.is_changed() {
        return;
    }

    let frame = gutter.paint(&state.document);
    let digit_width = gutter.renderer.layout.digit_width;
    let items = frame.labels().map(|label| label_item(label, digit_width)).collect();

    sync_text_pool(
        &mut commands,
        &mut pool,
        items,
        &text_font(&settings),
        &viewport,
        LineNumbers,
        "LineNumber",
    );
}

/// Update the highlighted code text for the rows on screen
pub(crate) fn update_code_text(
    mut commands: Commands,
    state: Res<CodeEditorState>,
    settings: Res<EditorSettings>,
    cache: Res<crate::syntax::HighlightCache>,
    viewport: Res<ViewportDimensions>,
    mut pool: Query<PooledText, With<CodeText>>,
) {
    if !state.is_changed() && !cache.is_changed() && !viewport.is_changed() && !settings.is_changed() {
        return;
    }

    let items = code_text_items(&state.document, &cache, settings.theme.foreground);
    sync_text_pool(
        &mut commands,
        &mut pool,
        items,
        &text_font(&settings),
        &viewport,
        CodeText,
        "CodeText",
    );
}

/// Keep the gutter background, separator and ruler in place
pub(crate) fn update_gutter_decorations(
    state: Res<CodeEditorState>,
    gutter: Res<GutterState>,
    viewport: Res<ViewportDimensions>,
    mut background: Query<
        (&mut Sprite, &mut Transform, &mut Visibility),
        (With<GutterBackground>, Without<Separator>, Without<Ruler>),
    >,
    mut separator: Query<&mut Transform, (With<Separator>, Without<GutterBackground>, Without<Ruler>)>,
    mut ruler: Query<(&mut Sprite, &mut Transform), (With<Ruler>, Without<GutterBackground>, Without<Separator>)>,
) {
    if !state.is_changed() && !gutter.is_changed() && !viewport.is_changed() {
        return;
    }

    let height = viewport.height as f32;
    let middle = height / 2.0;

    if let Ok((mut sprite, mut transform, mut visibility)) = background.single_mut() {
        let width = gutter.width();
        sprite.color = gutter.renderer.colors.background;
        sprite.custom_size = Some(Vec2::new(width, height));
        transform.translation = to_bevy_coords(width / 2.0, middle, &viewport, GUTTER_Z);
        *visibility = if width > 0.0 {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }

    if let Ok(mut transform) = separator.single_mut() {
        transform.translation = to_bevy_coords(viewport.separator_x, middle, &viewport, DECORATION_Z);
    }

    if let Ok((mut sprite, mut transform)) = ruler.single_mut() {
        let document = &state.document;
        let x = viewport.text_area_left + document.document_margin() + document.ruler_x();
        sprite.custom_size = Some(Vec2::new(1.0, height));
        transform.translation = to_bevy_coords(x, middle, &viewport, RULER_Z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FontMetrics;
    use crate::settings::SyntaxSettings;
    use crate::syntax::RegexHighlighter;

    fn metrics() -> FontMetrics {
        FontMetrics {
            line_height: 20.0,
            char_width: 8.0,
            digit_width: 8.0,
        }
    }

    fn segment(text: &str, color: Color) -> LineSegment {
        LineSegment {
            text: text.to_string(),
            color,
        }
    }

    #[test]
    fn test_segments_split_at_wrap_width() {
        let red = Color::srgb(1.0, 0.0, 0.0);
        let white = Color::WHITE;
        let segments = [segment("def", red), segment(" foo()", white)];

        let placed = place_segments(&segments, Some(4));
        let rows: Vec<_> = placed.iter().map(|p| (p.row, p.column, p.text.as_str())).collect();
        assert_eq!(rows, vec![(0, 0, "def"), (1, 0, "foo("), (2, 0, ")")]);
        assert_eq!(placed[0].color, red);

        let unwrapped = place_segments(&segments, None);
        let rows: Vec<_> = unwrapped.iter().map(|p| (p.row, p.column, p.text.as_str())).collect();
        assert_eq!(rows, vec![(0, 0, "def"), (0, 3, " foo()")]);
    }

    #[test]
    fn test_code_text_starts_after_gutter() {
        let mut doc = EditorDocument::new("x = 1\n\ny", metrics());
        doc.resize(Rect::new(0.0, 0.0, 400.0, 100.0));
        doc.set_left_margin(36.0);

        let items = code_text_items(&doc, &HighlightCache::new(), Color::WHITE);
        let texts: Vec<_> = items.iter().map(|item| item.text.as_str()).collect();
        assert_eq!(texts, vec!["x = 1", "y"]);
        // "x = 1" is 5 chars centered at 36 + 20
        assert_eq!(items[0].center, Vec2::new(56.0, 10.0));
        assert_eq!(items[1].center, Vec2::new(40.0, 50.0));
    }

    #[test]
    fn test_code_text_uses_highlight_colors() {
        let highlighter = RegexHighlighter::python(&SyntaxSettings::default().theme).unwrap();
        let doc = EditorDocument::new("return x", metrics());
        let mut cache = HighlightCache::new();
        cache.rebuild(&highlighter, doc.rope());

        let items = code_text_items(&doc, &cache, Color::WHITE);
        assert_eq!(items[0].text, "return");
        assert_ne!(items[0].color, Color::WHITE);
        assert_eq!(items.last().map(|item| item.color), Some(Color::WHITE));
    }

    #[test]
    fn test_scrolled_rows_above_viewport_are_skipped() {
        let text = (0..20).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
        let mut doc = EditorDocument::new(&text, metrics());
        doc.resize(Rect::new(0.0, 0.0, 400.0, 100.0));
        doc.scroll_to(60.0);

        let items = code_text_items(&doc, &HighlightCache::new(), Color::WHITE);
        assert_eq!(items.first().map(|item| item.text.as_str()), Some("line3"));
        assert_eq!(items.first().map(|item| item.center.y), Some(10.0));
        assert!(items.len() <= 6);
    }

    #[test]
    fn test_label_is_right_aligned() {
        let label = GutterLabel {
            text: "12".to_string(),
            rect: Rect::new(0.0, 40.0, 26.0, 60.0),
            color: Color::WHITE,
        };
        let item = label_item(&label, 8.0);
        assert_eq!(item.center, Vec2::new(18.0, 50.0));
    }

    #[test]
    fn test_disabled_gutter_has_no_width() {
        let settings = EditorSettings {
            ui: crate::settings::UiSettings {
                show_line_numbers: false,
                ..default()
            },
            ..default()
        };
        let mut gutter = GutterState::from_settings(&settings);
        let mut doc = EditorDocument::with_settings("a\nb", &settings);
        let mut viewport = ViewportDimensions::default();

        gutter.sync(2, &mut doc, &mut viewport);
        assert_eq!(doc.left_margin(), 0.0);
        assert_eq!(viewport.gutter_width, 0.0);
    }

    #[test]
    fn test_sync_pushes_width_to_both_hosts() {
        let settings = EditorSettings::default();
        let mut gutter = GutterState::from_settings(&settings);
        let mut doc = EditorDocument::with_settings("", &settings);
        let mut viewport = ViewportDimensions::default();

        gutter.sync(150, &mut doc, &mut viewport);
        let expected = gutter.renderer.layout.width_for(150);
        assert_eq!(gutter.width(), expected);
        assert_eq!(doc.left_margin(), expected);
        assert_eq!(viewport.text_area_left, expected);

        let frame = gutter.paint(&doc);
        assert_eq!(frame.background().map(|(rect, _)| rect.width()), Some(expected));
    }
}
