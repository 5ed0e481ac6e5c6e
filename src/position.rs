use serde::Serialize;
use std::fmt;

/// A location in the source text
///
/// `offset` counts characters (not bytes) from the start of the input.
/// `line` and `column` are 1-based and describe the character at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Position of the first character of any input
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a span in the source code with start and end positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Get the length of the span in characters
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start.offset >= self.end.offset
    }

    /// Smallest span covering both `self` and `other`
    pub fn join(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Get the text this span covers in `source`
    pub fn slice<'src>(&self, source: &'src str) -> &'src str {
        let mut indices = source.char_indices().map(|(i, _)| i);
        let start = indices.nth(self.start.offset).unwrap_or(source.len());
        let end = source
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.end.offset)
            .unwrap_or(source.len());
        &source[start..end.max(start)]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
