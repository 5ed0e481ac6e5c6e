use crate::error::LexError;
use crate::token::{Token, TokenValue};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Post-processing applied to a freshly read token
#[derive(Clone)]
pub enum Transform {
    /// Parse the token text as a number
    Number,
    /// Change the kind of tokens whose text is one of `words`
    Keywords { kind: String, words: HashSet<String> },
    /// Remove a leading sigil from the token text
    StripSigil(String),
    Custom(Arc<dyn Fn(Token) -> Token + Send + Sync>),
}

impl Transform {
    pub fn keywords<I, S>(kind: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Transform::Keywords {
            kind: kind.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn strip_sigil(sigil: impl Into<String>) -> Self {
        Transform::StripSigil(sigil.into())
    }

    pub fn custom<F>(transform: F) -> Self
    where
        F: Fn(Token) -> Token + Send + Sync + 'static,
    {
        Transform::Custom(Arc::new(transform))
    }

    pub fn apply(&self, mut token: Token) -> Result<Token, LexError> {
        match self {
            Transform::Number => {
                if let TokenValue::Str(text) = &token.value {
                    let number = text.parse::<f64>().map_err(|_| LexError::InvalidNumber {
                        text: text.clone(),
                        at: token.start(),
                    })?;
                    token.value = TokenValue::Number(number);
                }
                Ok(token)
            }
            Transform::Keywords { kind, words } => {
                if token.value.as_str().is_some_and(|text| words.contains(text)) {
                    token.kind = kind.clone();
                }
                Ok(token)
            }
            Transform::StripSigil(sigil) => {
                if let TokenValue::Str(text) = &token.value {
                    if let Some(stripped) = text.strip_prefix(sigil.as_str()) {
                        token.value = TokenValue::Str(stripped.to_string());
                    }
                }
                Ok(token)
            }
            Transform::Custom(transform) => Ok(transform(token)),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Number => f.write_str("Number"),
            Transform::Keywords { kind, words } => f
                .debug_struct("Keywords")
                .field("kind", kind)
                .field("words", words)
                .finish(),
            Transform::StripSigil(sigil) => f.debug_tuple("StripSigil").field(sigil).finish(),
            Transform::Custom(_) => f.debug_tuple("Custom").field(&"<function>").finish(),
        }
    }
}
