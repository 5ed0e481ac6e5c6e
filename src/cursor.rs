use crate::error::LexError;
use crate::position::Position;
use regex::Regex;

/// Saved cursor state, see [`InputCursor::checkpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorCheckpoint {
    byte: usize,
    position: Position,
}

impl CursorCheckpoint {
    pub fn position(&self) -> Position {
        self.position
    }
}

/// Character-level reader over source text
///
/// The cursor tracks a byte index into the source (for slicing and pattern
/// matching) alongside a character [`Position`] used for diagnostics.
#[derive(Debug, Clone)]
pub struct InputCursor<'src> {
    source: &'src str,
    byte: usize,
    position: Position,
}

impl<'src> InputCursor<'src> {
    pub fn new(source: &'src str) -> Self {
        InputCursor {
            source,
            byte: 0,
            position: Position::START,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// The not yet consumed part of the input
    pub fn rest(&self) -> &'src str {
        &self.source[self.byte..]
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn eof(&self) -> bool {
        self.byte >= self.source.len()
    }

    /// Character `k` places ahead of the cursor, without consuming anything
    pub fn peek(&self, k: usize) -> Option<char> {
        self.rest().chars().nth(k)
    }

    /// Consume one character
    pub fn next(&mut self) -> Option<char> {
        let ch = self.rest().chars().next()?;
        self.byte += ch.len_utf8();
        self.position.offset += 1;
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(ch)
    }

    /// Advance `n` characters, stopping early at the end of input
    pub fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if self.next().is_none() {
                break;
            }
        }
    }

    /// Consume `literal` if the input continues with it
    pub fn is_next_literal(&mut self, literal: &str) -> bool {
        if !literal.is_empty() && self.rest().starts_with(literal) {
            self.skip(literal.chars().count());
            return true;
        }
        false
    }

    /// Accumulate characters while `predicate` holds
    ///
    /// When `escape` is given, the character after it is taken verbatim
    /// regardless of the predicate; an escaped `n` becomes a newline.
    pub fn read_while<F>(&mut self, mut predicate: F, escape: Option<char>) -> String
    where
        F: FnMut(char) -> bool,
    {
        let mut result = String::new();
        while let Some(ch) = self.peek(0) {
            if escape == Some(ch) {
                self.next();
                match self.next() {
                    Some(escaped) => result.push(unescape(escaped)),
                    None => break,
                }
                continue;
            }
            if !predicate(ch) {
                break;
            }
            result.push(ch);
            self.next();
        }
        result
    }

    /// Accumulate characters until `terminator`, which is consumed but not returned
    ///
    /// Reaching the end of input first is an [`LexError::Unterminated`].
    pub fn read_until(
        &mut self,
        terminator: &str,
        escape: Option<char>,
    ) -> Result<String, LexError> {
        let mut result = String::new();
        loop {
            if self.eof() {
                return Err(LexError::Unterminated {
                    terminator: terminator.to_string(),
                    at: self.position,
                });
            }
            if self.is_next_literal(terminator) {
                return Ok(result);
            }
            let chunk = self.read_while(|ch| !terminator.starts_with(ch), escape);
            if chunk.is_empty() {
                // The next character starts the terminator without completing it
                if let Some(ch) = self.next() {
                    result.push(ch);
                }
            } else {
                result.push_str(&chunk);
            }
        }
    }

    /// Consume the match of `pattern` if it matches at the cursor
    pub fn read_pattern(&mut self, pattern: &Regex) -> Option<&'src str> {
        let rest = self.rest();
        let found = pattern.find(rest).filter(|m| m.start() == 0)?;
        let matched = &rest[..found.end()];
        self.skip(matched.chars().count());
        Some(matched)
    }

    pub fn checkpoint(&self) -> CursorCheckpoint {
        CursorCheckpoint {
            byte: self.byte,
            position: self.position,
        }
    }

    pub fn revert(&mut self, checkpoint: CursorCheckpoint) {
        self.byte = checkpoint.byte;
        self.position = checkpoint.position;
    }
}

fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        other => other,
    }
}
