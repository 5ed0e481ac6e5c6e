use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::lexer::Lexer;
use crate::result::MatchResult;
use crate::token_stream::TokenStream;
use crate::value::Value;
use tracing::{debug, trace};

/// Runs a grammar's root rule over a token stream
#[derive(Debug, Clone)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    root: String,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar, root: impl Into<String>) -> Self {
        Parser {
            grammar,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Parse with the root rule; a match without data yields [`Value::Null`]
    ///
    /// Input left over after the root rule matched is not an error.
    pub fn parse(&self, stream: &mut TokenStream<'_>) -> Result<Value, ParseError> {
        let rule = self.grammar.rule(&self.root).ok_or_else(|| ParseError::UnknownRule {
            name: self.root.clone(),
        })?;
        trace!(root = %self.root, "parse");

        let result = match rule.run(stream, self.grammar) {
            Ok(result) => result,
            Err(error) => {
                debug!(root = %self.root, %error, "parse failed");
                return Err(error);
            }
        };
        if result.matched() {
            return Ok(result.into_data().unwrap_or_default());
        }

        let error = syntax_error(&result, stream)?;
        debug!(root = %self.root, %error, "parse failed");
        Err(error)
    }

    /// Tokenize `source` with `lexer` and parse it
    pub fn parse_str(&self, lexer: &Lexer, source: &str) -> Result<Value, ParseError> {
        self.parse(&mut lexer.tokens(source))
    }
}

/// Turn a failed result into the error reported for it
///
/// A failure with a message is reported where it happened. Without one, the
/// next token in `stream` is named instead.
pub(crate) fn syntax_error(
    failure: &MatchResult,
    stream: &mut TokenStream<'_>,
) -> Result<ParseError, ParseError> {
    if let Some(info) = failure.failure_info() {
        if let Some(message) = &info.message {
            return Ok(ParseError::Syntax {
                at: info.at,
                detail: message.clone(),
            });
        }
    }

    let at = stream.position()?;
    let detail = match stream.peek()? {
        Some(token) => format!("Unexpected {} {}", token.kind, token.value),
        None => "Unexpected end of input".to_string(),
    };
    Ok(ParseError::Syntax { at, detail })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Matcher, TokenLayout};
    use crate::position::Position;
    use crate::rule::Rule;
    use crate::segment::Segment;

    fn lexer() -> Lexer {
        Lexer::builder()
            .layout(TokenLayout::new("whitespace").matcher(Matcher::pattern(r"\s+").unwrap()))
            .layout(TokenLayout::new("identifier").matcher(Matcher::pattern("[a-z]+").unwrap()))
            .layout(TokenLayout::new("punctuation").matcher(Matcher::one_of(";")))
            .skip("whitespace")
            .build()
    }

    fn grammar() -> Grammar {
        let mut grammar = Grammar::new();
        grammar
            .define(
                Rule::new("statement")
                    .kind("statement")
                    .expect_type("identifier")
                    .key("name")
                    .expect("punctuation", ";"),
            )
            .unwrap()
            .define(Rule::new("empty").expect("punctuation", ";"))
            .unwrap()
            .define(Rule::new("silent").then(Segment::new(|stream, _| {
                Ok(MatchResult::failure_at(stream.position()?))
            })))
            .unwrap();
        grammar
    }

    #[test]
    fn test_parse_success() {
        let grammar = grammar();
        let value = grammar.parser("statement").parse_str(&lexer(), "abc;").unwrap();
        assert_eq!(value.kind(), Some("statement"));
        assert_eq!(value.get("name"), Some(&Value::from("abc")));
    }

    #[test]
    fn test_success_without_data_is_null() {
        let grammar = grammar();
        let value = grammar.parser("empty").parse_str(&lexer(), ";").unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_failure_message() {
        let grammar = grammar();
        let error = grammar.parser("statement").parse_str(&lexer(), "abc\n  def").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Problem with line 2:3: Expected punctuation ; but got identifier def"
        );
        assert_eq!(error.position(), Some(Position::new(6, 2, 3)));
    }

    #[test]
    fn test_failure_without_message_names_token() {
        let grammar = grammar();
        let error = grammar.parser("silent").parse_str(&lexer(), "  abc").unwrap_err();
        assert_eq!(error.to_string(), "Problem with line 1:3: Unexpected identifier abc");

        let error = grammar.parser("silent").parse_str(&lexer(), "").unwrap_err();
        assert_eq!(error.to_string(), "Problem with line 1:1: Unexpected end of input");
    }

    #[test]
    fn test_unknown_root() {
        let grammar = grammar();
        let error = grammar.parser("program").parse_str(&lexer(), "").unwrap_err();
        assert_eq!(
            error,
            ParseError::UnknownRule {
                name: "program".to_string()
            }
        );
    }

    #[test]
    fn test_lex_error_surfaces() {
        let grammar = grammar();
        let error = grammar.parser("statement").parse_str(&lexer(), "abc $").unwrap_err();
        assert!(matches!(error, ParseError::Lex(_)));
    }
}
