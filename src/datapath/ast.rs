//! Segment types for parsed data paths.

use std::fmt;
use std::str::FromStr;

use super::error::DataPathError;
use super::parser::Parser;

/// How the evaluator treats a segment whose value is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modifier {
    /// Bare token: a missing value is an error.
    #[default]
    None,
    /// Trailing `?`: a missing value stops traversal with no result.
    Optional,
    /// Leading `?`: a missing value stops traversal and returns the last
    /// node that was resolved.
    Maybe,
}

/// One parsed unit of a data path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The key or index to look up, already unescaped.
    pub token: String,
    /// What to do when `token` is absent from the current node.
    pub modifier: Modifier,
}

impl Segment {
    /// Creates a segment with no modifier.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_modifier(token, Modifier::None)
    }

    /// Creates a segment marked with a trailing `?`.
    pub fn optional(token: impl Into<String>) -> Self {
        Self::with_modifier(token, Modifier::Optional)
    }

    /// Creates a segment marked with a leading `?`.
    pub fn maybe(token: impl Into<String>) -> Self {
        Self::with_modifier(token, Modifier::Maybe)
    }

    pub fn with_modifier(token: impl Into<String>, modifier: Modifier) -> Self {
        Self {
            token: token.into(),
            modifier,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.modifier == Modifier::Optional
    }

    pub fn is_maybe(&self) -> bool {
        self.modifier == Modifier::Maybe
    }
}

impl fmt::Display for Segment {
    /// Renders the segment so that parsing the output yields the same segment.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_maybe() {
            f.write_str("?")?;
        }
        if needs_quoting(&self.token) {
            write!(f, "\"{}\"", escape_double(&self.token))?;
        } else {
            f.write_str(&self.token)?;
        }
        if self.is_optional() {
            f.write_str("?")?;
        }
        Ok(())
    }
}

fn needs_quoting(token: &str) -> bool {
    token.starts_with('\'')
        || token.starts_with('"')
        || token
            .chars()
            .any(|ch| matches!(ch, '/' | '?' | '\\') || ch.is_control())
}

fn escape_double(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len() + 2);
    for ch in token.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0C}' => escaped.push_str("\\f"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{0B}' => escaped.push_str("\\v"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// A complete parsed data path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataPath {
    /// Segments in traversal order.
    pub segments: Vec<Segment>,
}

impl DataPath {
    /// Creates a data path from already parsed segments.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parses a path string such as `animal/0/name?`.
    pub fn parse(path: &str) -> Result<Self, DataPathError> {
        Parser::parse(path).map(Self::new)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl FromStr for DataPath {
    type Err = DataPathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Self::parse(path)
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, segment) in self.segments.iter().enumerate() {
            if n > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
