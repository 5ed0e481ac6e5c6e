//! Tokenizer driven by an ordered list of token layouts

pub mod matcher;
pub mod transform;

pub use matcher::Matcher;
pub use transform::Transform;

use crate::cursor::InputCursor;
use crate::error::LexError;
use crate::position::Span;
use crate::token::Token;
use crate::token_stream::TokenStream;
use std::collections::HashSet;
use tracing::trace;

/// Kind given to characters no layout recognises under [`UnknownChars::Emit`]
pub const UNKNOWN_KIND: &str = "unknown";

/// What to do with a character no layout matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownChars {
    /// Raise [`LexError::UnexpectedChar`]
    #[default]
    Reject,
    /// Emit a single-character token of kind [`UNKNOWN_KIND`]
    Emit,
}

/// A token kind together with the matchers that recognise it
#[derive(Debug, Clone)]
pub struct TokenLayout {
    kind: String,
    matchers: Vec<Matcher>,
    transforms: Vec<Transform>,
}

impl TokenLayout {
    pub fn new(kind: impl Into<String>) -> Self {
        TokenLayout {
            kind: kind.into(),
            matchers: Vec::new(),
            transforms: Vec::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Add a matcher; matchers are tried in the order they were added
    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Add a transform; transforms run in the order they were added
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Read one token of this layout's kind, or leave the cursor untouched
    pub fn read(&self, cursor: &mut InputCursor<'_>) -> Result<Option<Token>, LexError> {
        for matcher in &self.matchers {
            let start = cursor.position();
            if let Some(text) = matcher.read(cursor)? {
                let mut token = Token::new(
                    self.kind.clone(),
                    text,
                    Span::new(start, cursor.position()),
                );
                for transform in &self.transforms {
                    token = transform.apply(token)?;
                }
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}

/// Immutable tokenizer configuration
///
/// A `Lexer` can be shared by any number of [`TokenStream`]s.
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    layouts: Vec<TokenLayout>,
    skip: HashSet<String>,
    unknown: UnknownChars,
}

impl Lexer {
    pub fn builder() -> LexerBuilder {
        LexerBuilder::default()
    }

    pub fn layouts(&self) -> &[TokenLayout] {
        &self.layouts
    }

    pub fn is_skipped(&self, kind: &str) -> bool {
        self.skip.contains(kind)
    }

    /// Create a token stream over `source`
    pub fn tokens<'a>(&'a self, source: &'a str) -> TokenStream<'a> {
        TokenStream::new(self, source)
    }

    /// Tokenize all of `source` eagerly
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut stream = self.tokens(source);
        let mut tokens = Vec::new();
        while let Some(token) = stream.next()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Read the next token that is not of a skipped kind
    ///
    /// Returns `None` at the end of input.
    pub(crate) fn read_token(
        &self,
        cursor: &mut InputCursor<'_>,
    ) -> Result<Option<Token>, LexError> {
        'position: loop {
            if cursor.eof() {
                return Ok(None);
            }

            for layout in &self.layouts {
                if let Some(token) = layout.read(cursor)? {
                    if self.skip.contains(&token.kind) {
                        continue 'position;
                    }
                    trace!(
                        kind = %token.kind,
                        value = %token.value,
                        line = token.line,
                        column = token.column,
                        "token"
                    );
                    return Ok(Some(token));
                }
            }

            let start = cursor.position();
            let Some(ch) = cursor.next() else {
                return Ok(None);
            };
            return match self.unknown {
                UnknownChars::Reject => Err(LexError::UnexpectedChar { ch, at: start }),
                UnknownChars::Emit => Ok(Some(Token::new(
                    UNKNOWN_KIND,
                    ch.to_string(),
                    Span::new(start, cursor.position()),
                ))),
            };
        }
    }
}

/// Builder for [`Lexer`]
#[derive(Debug, Clone, Default)]
pub struct LexerBuilder {
    lexer: Lexer,
}

impl LexerBuilder {
    /// Append a layout; layouts are tried in the order they were added
    pub fn layout(mut self, layout: TokenLayout) -> Self {
        self.lexer.layouts.push(layout);
        self
    }

    /// Consume tokens of `kind` without handing them to the grammar
    pub fn skip(mut self, kind: impl Into<String>) -> Self {
        self.lexer.skip.insert(kind.into());
        self
    }

    pub fn unknown(mut self, policy: UnknownChars) -> Self {
        self.lexer.unknown = policy;
        self
    }

    pub fn build(self) -> Lexer {
        self.lexer
    }
}
