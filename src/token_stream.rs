use crate::cursor::{CursorCheckpoint, InputCursor};
use crate::error::LexError;
use crate::lexer::Lexer;
use crate::position::Position;
use crate::token::Token;

#[derive(Debug, Clone)]
struct Buffered {
    token: Token,
    /// Cursor state before the token (and any skipped input in front of it) was read
    before: CursorCheckpoint,
}

/// Saved stream state, see [`TokenStream::checkpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamCheckpoint {
    cursor: CursorCheckpoint,
    last_end: Position,
}

impl StreamCheckpoint {
    /// Characters consumed before this checkpoint
    pub fn offset(&self) -> usize {
        self.cursor.position().offset
    }
}

/// Lazily produced tokens with one token of lookahead
///
/// Reverting to a checkpoint drops the lookahead token; it is lexed again
/// from the restored cursor position when next needed.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    lexer: &'a Lexer,
    cursor: InputCursor<'a>,
    buffered: Option<Buffered>,
    last_end: Position,
    depth: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(lexer: &'a Lexer, source: &'a str) -> Self {
        TokenStream {
            lexer,
            cursor: InputCursor::new(source),
            buffered: None,
            last_end: Position::START,
            depth: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// The next token, without consuming it
    pub fn peek(&mut self) -> Result<Option<&Token>, LexError> {
        if self.buffered.is_none() {
            let before = self.cursor.checkpoint();
            if let Some(token) = self.lexer.read_token(&mut self.cursor)? {
                self.buffered = Some(Buffered { token, before });
            }
        }
        Ok(self.buffered.as_ref().map(|buffered| &buffered.token))
    }

    /// Consume the next token
    pub fn next(&mut self) -> Result<Option<Token>, LexError> {
        self.peek()?;
        Ok(self.buffered.take().map(|buffered| {
            self.last_end = buffered.token.span.end;
            buffered.token
        }))
    }

    pub fn eof(&mut self) -> Result<bool, LexError> {
        Ok(self.peek()?.is_none())
    }

    /// Where the next token starts, or where the input ends
    pub fn position(&mut self) -> Result<Position, LexError> {
        let start = self.peek()?.map(Token::start);
        Ok(start.unwrap_or_else(|| self.cursor.position()))
    }

    /// End of the most recently consumed token
    pub fn last_end(&self) -> Position {
        self.last_end
    }

    /// Characters consumed so far, not counting the lookahead token
    pub fn offset(&self) -> usize {
        self.checkpoint().offset()
    }

    pub fn checkpoint(&self) -> StreamCheckpoint {
        let cursor = match &self.buffered {
            Some(buffered) => buffered.before,
            None => self.cursor.checkpoint(),
        };
        StreamCheckpoint {
            cursor,
            last_end: self.last_end,
        }
    }

    pub fn revert(&mut self, checkpoint: StreamCheckpoint) {
        self.cursor.revert(checkpoint.cursor);
        self.buffered = None;
        self.last_end = checkpoint.last_end;
    }

    /// Enter one level of grammar nesting, returning the new depth
    pub(crate) fn enter(&mut self) -> usize {
        self.depth += 1;
        self.depth
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
