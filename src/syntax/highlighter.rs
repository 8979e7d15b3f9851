//! Syntax highlighting trait and the regex rule-table highlighter

use std::ops::Range;

use bevy::prelude::*;
use ropey::Rope;

use super::rules::{RuleError, RuleTable, TextStyle, TokenKind};
use crate::settings::SyntaxTheme;
use crate::types::LineSegment;

/// A run of characters within one line painted with one style.
///
/// Offsets are in chars, not bytes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleSpan {
    pub start: usize,
    pub len: usize,
    pub style: TextStyle,
    pub kind: TokenKind,
    /// Index of the rule that produced the span; higher wins on overlap
    pub rule: usize,
}

impl StyleSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Trait for syntax highlighting providers
///
/// Providers work line by line and keep no state between lines, so the
/// editor only re-runs them on lines whose text changed.
pub trait SyntaxProvider: Send + Sync {
    /// Highlight one line (without its line terminator) and return
    /// non-overlapping spans sorted by offset
    fn highlight_line(&self, text: &str) -> Vec<StyleSpan>;

    /// Highlight a range of rope lines
    fn highlight_range(&self, rope: &Rope, lines: Range<usize>) -> Vec<Vec<StyleSpan>> {
        let end = lines.end.min(rope.len_lines());
        (lines.start.min(end)..end)
            .map(|line| self.highlight_line(&line_text(rope, line)))
            .collect()
    }

    /// Check if highlighting is available
    fn is_available(&self) -> bool {
        true
    }
}

/// Text of a rope line without its trailing line break
pub fn line_text(rope: &Rope, line: usize) -> String {
    let mut text = rope.line(line).to_string();
    while text.ends_with('\n') || text.ends_with('\r') {
        text.pop();
    }
    text
}

/// Highlighter driven by an ordered rule table
#[derive(Clone, Debug)]
pub struct RegexHighlighter {
    table: RuleTable,
}

impl RegexHighlighter {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    /// Highlighter with the built-in Python table
    pub fn python(theme: &SyntaxTheme) -> Result<Self, RuleError> {
        Ok(Self::new(RuleTable::python(theme)?))
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Run every rule over `text` and return the raw spans in application
    /// order (rule by rule, left to right). Spans of different rules may
    /// overlap; see [`compose`].
    pub fn scan_line(&self, text: &str) -> Vec<StyleSpan> {
        let offsets = CharOffsets::new(text);
        let mut hits: Vec<(Range<usize>, usize)> = Vec::new();

        for (index, rule) in self.table.rules().iter().enumerate() {
            let mut pos = 0;
            let mut masks: Option<Vec<Range<usize>>> = None;
            while pos <= text.len() {
                let Some(caps) = rule.regex().captures_at(text, pos) else {
                    break;
                };
                let Some(whole) = caps.get(0) else {
                    break;
                };

                // Resume after the whole match; empty matches step one char
                let resume = if whole.is_empty() {
                    next_char_boundary(text, whole.end())
                } else {
                    whole.end()
                };

                if let Some(mask) = rule.masked_by() {
                    let masks = masks.get_or_insert_with(|| self.resolve_mask(text, mask, index));
                    let enclosing = masks
                        .iter()
                        .find(|bytes| bytes.start < whole.start() && whole.start() < bytes.end);
                    if let Some(bytes) = enclosing {
                        pos = bytes.end;
                        continue;
                    }
                }

                // A group that did not participate styles nothing
                if let Some(group) = caps.get(rule.capture_group()) {
                    if !group.is_empty() {
                        hits.push((group.range(), index));
                    }
                }

                pos = resume;
            }
        }

        hits.into_iter()
            .map(|(bytes, index)| {
                let rule = &self.table.rules()[index];
                let start = offsets.char_at(bytes.start);
                StyleSpan {
                    start,
                    len: offsets.char_at(bytes.end) - start,
                    style: rule.style(),
                    kind: rule.kind(),
                    rule: index,
                }
            })
            .collect()
    }

    /// Byte ranges of the `mask` spans a left-to-right reading of `text`
    /// accepts, with rule `masked` competing for the same text.
    ///
    /// At each position the leftmost match among the `mask` rules and
    /// `masked` is taken and the scan resumes after it, so a quote inside
    /// an accepted literal or after a comment marker never opens another.
    fn resolve_mask(&self, text: &str, mask: TokenKind, masked: usize) -> Vec<Range<usize>> {
        let rules = self.table.rules();
        let candidates: Vec<usize> = (0..rules.len())
            .filter(|&i| i == masked || rules[i].kind() == mask)
            .collect();

        let mut resolved = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let leftmost = candidates
                .iter()
                .filter_map(|&i| {
                    rules[i]
                        .regex()
                        .find_at(text, pos)
                        .filter(|found| !found.is_empty())
                        .map(|found| (found.range(), i))
                })
                .min_by_key(|(bytes, i)| (bytes.start, *i));
            let Some((bytes, owner)) = leftmost else {
                break;
            };
            pos = bytes.end;
            if owner != masked {
                resolved.push(bytes);
            }
        }
        resolved
    }

    /// Colored segments covering the whole line, for text renderers
    pub fn segments(&self, text: &str, default_color: Color) -> Vec<LineSegment> {
        segments_from_spans(text, &self.highlight_line(text), default_color)
    }
}

impl SyntaxProvider for RegexHighlighter {
    fn highlight_line(&self, text: &str) -> Vec<StyleSpan> {
        compose(&self.scan_line(text))
    }

    fn is_available(&self) -> bool {
        !self.table.is_empty()
    }
}

/// Resolve overlapping spans cell by cell: the span from the highest rule
/// index owns a character, ties go to the span applied last. Returns
/// non-overlapping spans sorted by offset; a span clipped by a later one
/// may come back as several fragments.
pub fn compose(spans: &[StyleSpan]) -> Vec<StyleSpan> {
    let width = spans.iter().map(StyleSpan::end).max().unwrap_or(0);
    let mut owner: Vec<Option<usize>> = vec![None; width];

    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by_key(|&i| spans[i].rule);
    for i in order {
        for cell in spans[i].range() {
            owner[cell] = Some(i);
        }
    }

    let mut composed = Vec::new();
    let mut cell = 0;
    while cell < width {
        let Some(i) = owner[cell] else {
            cell += 1;
            continue;
        };
        let start = cell;
        while cell < width && owner[cell] == Some(i) {
            cell += 1;
        }
        composed.push(StyleSpan {
            start,
            len: cell - start,
            ..spans[i]
        });
    }
    composed
}

/// Split `text` into colored segments following non-overlapping `spans`
pub fn segments_from_spans(text: &str, spans: &[StyleSpan], default_color: Color) -> Vec<LineSegment> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();
    let mut cursor = 0;

    let mut push = |range: Range<usize>, color: Color| {
        if !range.is_empty() {
            segments.push(LineSegment {
                text: chars[range].iter().collect(),
                color,
            });
        }
    };

    for span in spans {
        let start = span.start.min(chars.len());
        let end = span.end().min(chars.len());
        if start < cursor {
            continue;
        }
        push(cursor..start, default_color);
        push(start..end, span.style.color);
        cursor = end;
    }
    push(cursor..chars.len(), default_color);
    segments
}

fn next_char_boundary(text: &str, byte: usize) -> usize {
    text[byte..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| byte + c.len_utf8())
}

/// Byte offset to char offset lookup for one line
struct CharOffsets {
    starts: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(byte, _)| byte).collect(),
        }
    }

    fn char_at(&self, byte: usize) -> usize {
        self.starts.partition_point(|&start| start < byte)
    }
}
