//! Rule table: ordered lexical patterns and the styles they paint
//!
//! Rules are evaluated in table order and later rules win wherever their
//! spans overlap earlier ones, so the table lists generic categories first
//! and the overriding ones (dunder names, strings, decorators, comments) last.

use std::fmt;

use bevy::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::settings::SyntaxTheme;

/// Lexical category a rule paints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Brace,
    Number,
    Operator,
    Punctuation,
    SelfRef,
    Builtin,
    Definition,
    Dunder,
    String,
    Decorator,
    Comment,
}

/// Visual attributes of a span
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Error raised while building a rule table
#[derive(Debug)]
pub enum RuleError {
    /// The pattern does not compile
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    /// The pattern has no capture group with the requested index
    MissingGroup { pattern: String, group: usize },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::InvalidPattern { pattern, source } => {
                write!(f, "invalid highlight pattern `{pattern}`: {source}")
            }
            RuleError::MissingGroup { pattern, group } => {
                write!(f, "highlight pattern `{pattern}` has no capture group {group}")
            }
        }
    }
}

impl std::error::Error for RuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuleError::InvalidPattern { source, .. } => Some(source),
            RuleError::MissingGroup { .. } => None,
        }
    }
}

/// A single highlighting rule
#[derive(Clone, Debug)]
pub struct Rule {
    regex: Regex,
    kind: TokenKind,
    style: TextStyle,
    capture_group: usize,
    mask: Option<TokenKind>,
}

impl Rule {
    pub fn new(pattern: &str, kind: TokenKind, style: TextStyle) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            kind,
            style,
            capture_group: 0,
            mask: None,
        })
    }

    /// Style only a capture group of each match.
    ///
    /// The scan still resumes after the whole match.
    pub fn with_capture_group(mut self, group: usize) -> Result<Self, RuleError> {
        // captures_len counts group 0
        if group >= self.regex.captures_len() {
            return Err(RuleError::MissingGroup {
                pattern: self.regex.as_str().to_string(),
                group,
            });
        }
        self.capture_group = group;
        Ok(self)
    }

    /// Ignore matches that start inside a span of `kind`, as the line
    /// reads left to right. The scan resumes after that span.
    pub fn mask(mut self, kind: TokenKind) -> Self {
        self.mask = Some(kind);
        self
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn capture_group(&self) -> usize {
        self.capture_group
    }

    pub fn masked_by(&self) -> Option<TokenKind> {
        self.mask
    }
}

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "exec", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "nonlocal", "not", "or", "pass", "print", "raise", "return", "try", "while",
    "with", "yield", "None", "True", "False",
];

const BUILTINS: &[&str] = &[
    "__import__", "abs", "all", "any", "ascii", "bin", "bool", "breakpoint", "bytearray",
    "bytes", "callable", "chr", "classmethod", "compile", "complex", "delattr", "dict", "dir",
    "divmod", "enumerate", "eval", "exec", "filter", "float", "format", "frozenset", "getattr",
    "globals", "hasattr", "hash", "help", "hex", "id", "input", "int", "isinstance",
    "issubclass", "iter", "len", "list", "locals", "map", "max", "memoryview", "min", "next",
    "object", "oct", "open", "ord", "pow", "print", "property", "range", "repr", "reversed",
    "round", "set", "setattr", "slice", "sorted", "staticmethod", "str", "sum", "super",
    "tuple", "type", "vars", "zip",
];

fn word_alternation(words: &[&str]) -> String {
    format!(r"\b(?:{})\b", words.join("|"))
}

/// Immutable ordered list of rules
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Python-flavoured table
    pub fn python(theme: &SyntaxTheme) -> Result<Self, RuleError> {
        use TokenKind::*;

        let mut rules = vec![
            Rule::new(&word_alternation(KEYWORDS), Keyword, theme.keyword)?,
            Rule::new(r"[()\[\]{}]", Brace, theme.brace)?,
            // integer, hex, float with optional exponent
            Rule::new(r"\b[+-]?[0-9]+[lL]?\b", Number, theme.number)?,
            Rule::new(r"\b[+-]?0[xX][0-9A-Fa-f]+[lL]?\b", Number, theme.number)?,
            Rule::new(
                r"\b[+-]?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?\b",
                Number,
                theme.number,
            )?,
            Rule::new(
                r"\*\*=|//=|>>=|<<=|==|!=|<=|>=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|\*\*|//|>>|<<|[=<>+\-*/%^|&~]",
                Operator,
                theme.operator,
            )?,
            Rule::new(r"[,:]", Punctuation, theme.punctuation)?,
            Rule::new(r"\bself\b", SelfRef, theme.self_ref)?,
            Rule::new(&word_alternation(BUILTINS), Builtin, theme.builtin)?,
            Rule::new(r"\bdef\b\s*(\w+)", Definition, theme.definition)?.with_capture_group(1)?,
            Rule::new(r"\bclass\b\s*(\w+)", Definition, theme.definition)?.with_capture_group(1)?,
            Rule::new(r"\b__[a-zA-Z_]*__\b", Dunder, theme.dunder)?,
        ];

        // string literals tolerate escaped quotes and take up to two prefix letters
        rules.push(Rule::new(
            r#"(?:\b[rRbBuUfF]{1,2})?"[^"\\]*(?:\\.[^"\\]*)*""#,
            String,
            theme.string,
        )?);
        rules.push(Rule::new(
            r"(?:\b[rRbBuUfF]{1,2})?'[^'\\]*(?:\\.[^'\\]*)*'",
            String,
            theme.string,
        )?);
        rules.push(Rule::new(r"@[A-Za-z_][\w.]*", Decorator, theme.decorator)?);
        rules.push(Rule::new(r"#[^\n]*", Comment, theme.comment)?.mask(String));

        Ok(Self::new(rules))
    }
}
