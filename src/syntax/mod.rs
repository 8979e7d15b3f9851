//! Syntax highlighting module
//!
//! Lexical, pattern-based highlighting: an ordered rule table is applied to
//! one line at a time and overlapping matches resolve in favor of the later
//! rule. No state is carried between lines.

pub mod rules;
pub mod highlighter;
pub mod cache;

// Re-export main types
pub use rules::{Rule, RuleError, RuleTable, TextStyle, TokenKind};
pub use highlighter::{
    compose, line_text, segments_from_spans, RegexHighlighter, StyleSpan, SyntaxProvider,
};
pub use cache::HighlightCache;
