use crate::position::{Position, Span};
use serde::Serialize;
use std::fmt;

/// Value carried by a [`Token`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Str(String),
    Number(f64),
}

impl TokenValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(text) => Some(text),
            TokenValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TokenValue::Str(_) => None,
            TokenValue::Number(number) => Some(*number),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Str(text) => f.write_str(text),
            TokenValue::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(text: &str) -> Self {
        TokenValue::Str(text.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(text: String) -> Self {
        TokenValue::Str(text)
    }
}

impl From<f64> for TokenValue {
    fn from(number: f64) -> Self {
        TokenValue::Number(number)
    }
}

/// Smallest lexical unit handed to the grammar layer
///
/// `line` and `column` name the token's first character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: TokenValue,
    pub line: usize,
    pub column: usize,
    #[serde(skip)]
    pub span: Span,
}

impl Token {
    pub fn new(kind: impl Into<String>, value: impl Into<TokenValue>, span: Span) -> Self {
        Token {
            kind: kind.into(),
            value: value.into(),
            line: span.start.line,
            column: span.start.column,
            span,
        }
    }

    pub fn start(&self) -> Position {
        self.span.start
    }

    /// Does this token have the given kind and textual value
    pub fn is(&self, kind: &str, value: &str) -> bool {
        self.kind == kind && self.value.as_str() == Some(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.value)
    }
}
