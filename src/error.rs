use crate::position::Position;
use thiserror::Error;

/// Errors raised while turning characters into tokens
///
/// Lexing errors are never backtracked: no valid token exists at the
/// position they name, so every enclosing segment gives up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Reached end of code at line {at} but expected a {terminator}")]
    Unterminated { terminator: String, at: Position },

    #[error("Unexpected character '{ch}' at line {at}")]
    UnexpectedChar { ch: char, at: Position },

    #[error("Invalid number '{text}' at line {at}")]
    InvalidNumber { text: String, at: Position },
}

impl LexError {
    /// Returns the position where this error occurred
    pub fn position(&self) -> Position {
        match self {
            LexError::Unterminated { at, .. } => *at,
            LexError::UnexpectedChar { at, .. } => *at,
            LexError::InvalidNumber { at, .. } => *at,
        }
    }
}

/// Errors raised while building a [`Grammar`](crate::grammar::Grammar)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Rule '{0}' is already defined")]
    DuplicateRule(String),

    #[error("Rule '{rule}' references undefined rule '{reference}'")]
    UnknownRule { rule: String, reference: String },

    #[error("Rule '{rule}' uses reserved key '{key}'")]
    ReservedKey { rule: String, key: String },
}

/// The single error value produced by a failed parse
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Problem with line {at}: {detail}")]
    Syntax { at: Position, detail: String },

    #[error("Rule '{name}' is not defined")]
    UnknownRule { name: String },

    #[error("Problem with line {at}: key '{key}' collides with a reserved AST field")]
    ReservedKey { key: String, at: Position },

    #[error("Problem with line {at}: grammar nesting exceeds {limit} levels")]
    TooDeep { at: Position, limit: usize },
}

impl ParseError {
    /// Returns the position where this error occurred, if it has one
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Lex(error) => Some(error.position()),
            ParseError::Syntax { at, .. } => Some(*at),
            ParseError::UnknownRule { .. } => None,
            ParseError::ReservedKey { at, .. } => Some(*at),
            ParseError::TooDeep { at, .. } => Some(*at),
        }
    }

    /// Render the error together with the surrounding source lines
    ///
    /// Up to two lines before and after the offending line are shown, and the
    /// offending column is marked with a pointer.
    pub fn render(&self, source: &str) -> String {
        let mut out = self.to_string();
        if let Some(at) = self.position() {
            out.push_str("\n\n");
            out.push_str(&context_lines(source, at).join("\n"));
        }
        out
    }
}

fn context_lines(source: &str, at: Position) -> Vec<String> {
    let mut lines = Vec::new();
    let first = at.line.saturating_sub(2).max(1);
    let last = at.line + 2;

    for (index, content) in source.split('\n').enumerate() {
        let number = index + 1;
        if number < first {
            continue;
        }
        if number > last {
            break;
        }
        let content = content.strip_suffix('\r').unwrap_or(content);
        let prefix = if number == at.line {
            format!("  > {} | ", number)
        } else {
            format!("    {} | ", number)
        };
        lines.push(format!("{}{}", prefix, content));

        if number == at.line {
            // Tabs are copied from the line, everything else becomes a space
            let padding: String = content
                .chars()
                .take(at.column.saturating_sub(1))
                .map(|ch| if ch == '\t' { '\t' } else { ' ' })
                .collect();
            lines.push(format!("{}{}^--- here", " ".repeat(prefix.len()), padding));
        }
    }

    lines
}
