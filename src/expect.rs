//! Segments that match single tokens

use crate::result::{MatchResult, VALUE_FIELD};
use crate::segment::Segment;
use crate::token::Token;
use crate::value::{Object, Value};

/// Describes what was found instead of the expected token
fn found(token: Option<&Token>) -> String {
    match token {
        Some(token) => format!("but got {} {}", token.kind, token.value),
        None => "but reached end of input".to_string(),
    }
}

/// Match a token of `kind` whose text is `value`; produces no data
pub fn expect(kind: impl Into<String>, value: impl Into<String>) -> Segment {
    let kind = kind.into();
    let value = value.into();
    let label = format!("{kind} {value}");

    Segment::new(move |stream, _| {
        let at = stream.position()?;
        let token = stream.peek()?;
        if token.is_some_and(|token| token.is(&kind, &value)) {
            stream.next()?;
            return Ok(MatchResult::success());
        }
        let message = format!("Expected {kind} {value} {}", found(token));
        Ok(MatchResult::failure(at, message))
    })
    .label(label)
}

/// Match any token of `kind`; produces the token's value
pub fn expect_type(kind: impl Into<String>) -> Segment {
    let kind = kind.into();
    let label = kind.clone();

    Segment::new(move |stream, _| {
        let at = stream.position()?;
        let token = stream.peek()?;
        if token.is_some_and(|token| token.kind == kind) {
            if let Some(token) = stream.next()? {
                return Ok(MatchResult::with_data(Value::from(token.value)));
            }
        }
        let message = format!("Expected {kind} {}", found(stream.peek()?));
        Ok(MatchResult::failure(at, message))
    })
    .label(label)
}

/// Match any token of `kind`; produces a node tagged with the token kind
///
/// The node holds the token's value under `value` and carries the token span.
pub fn token(kind: impl Into<String>) -> Segment {
    let kind = kind.into();
    let label = kind.clone();

    Segment::new(move |stream, _| {
        let at = stream.position()?;
        let token = stream.peek()?;
        if token.is_some_and(|token| token.kind == kind) {
            if let Some(token) = stream.next()? {
                let mut node = Object::with_kind(token.kind);
                node.span = Some(token.span);
                node.insert(VALUE_FIELD, token.value);
                return Ok(MatchResult::with_data(node));
            }
        }
        let message = format!("Expected {kind} {}", found(stream.peek()?));
        Ok(MatchResult::failure(at, message))
    })
    .label(label)
}

/// Consume a token of `kind` and `value` if one is next; never fails
pub fn maybe(kind: impl Into<String>, value: impl Into<String>) -> Segment {
    let kind = kind.into();
    let value = value.into();
    let label = format!("maybe {kind} {value}");

    Segment::new(move |stream, _| {
        if stream.peek()?.is_some_and(|token| token.is(&kind, &value)) {
            stream.next()?;
        }
        Ok(MatchResult::success())
    })
    .label(label)
}

/// Always match without consuming input
pub fn succeed() -> Segment {
    Segment::new(|_, _| Ok(MatchResult::success())).label("succeed")
}

/// Always fail with `message`
pub fn fail(message: impl Into<String>) -> Segment {
    let message = message.into();
    Segment::new(move |stream, _| Ok(MatchResult::failure(stream.position()?, message.clone())))
        .label("fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::lexer::{Lexer, Matcher, TokenLayout, Transform};
    use crate::position::Position;

    fn lexer() -> Lexer {
        Lexer::builder()
            .layout(TokenLayout::new("whitespace").matcher(Matcher::pattern(r"\s+").unwrap()))
            .layout(
                TokenLayout::new("number")
                    .matcher(Matcher::pattern("[0-9]+").unwrap())
                    .transform(Transform::Number),
            )
            .layout(TokenLayout::new("identifier").matcher(Matcher::pattern("[a-z]+").unwrap()))
            .layout(TokenLayout::new("punctuation").matcher(Matcher::one_of("(),;")))
            .skip("whitespace")
            .build()
    }

    #[test]
    fn test_expect_consumes_matching_token() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens("( a");

        let result = expect("punctuation", "(").run(&mut stream, &grammar).unwrap();
        assert!(result.matched());
        assert!(!result.has_data());
        assert_eq!(stream.peek().unwrap().unwrap().value.to_string(), "a");
    }

    #[test]
    fn test_expect_mismatch_message() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens("\n  a");

        let result = expect("punctuation", "(").run(&mut stream, &grammar).unwrap();
        assert!(!result.matched());
        assert_eq!(
            result.fail_message(),
            Some("Expected punctuation ( but got identifier a")
        );
        assert_eq!(result.failure_info().unwrap().at, Position::new(3, 2, 3));
        assert_eq!(result.progress(), 0);
    }

    #[test]
    fn test_expect_at_end_of_input() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens("");

        let result = expect("punctuation", ";").run(&mut stream, &grammar).unwrap();
        assert_eq!(
            result.fail_message(),
            Some("Expected punctuation ; but reached end of input")
        );
    }

    #[test]
    fn test_expect_type_yields_value() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens("42 x");

        let number = expect_type("number").run(&mut stream, &grammar).unwrap();
        assert_eq!(number.data(), Some(&Value::from(42.0)));

        let mismatch = expect_type("number").run(&mut stream, &grammar).unwrap();
        assert_eq!(mismatch.fail_message(), Some("Expected number but got identifier x"));
    }

    #[test]
    fn test_token_node() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens(" abc");

        let result = token("identifier").run(&mut stream, &grammar).unwrap();
        let data = result.data().unwrap();
        assert_eq!(data.kind(), Some("identifier"));
        assert_eq!(data.get("value"), Some(&Value::from("abc")));
        let span = data.span().unwrap();
        assert_eq!((span.start.offset, span.end.offset), (1, 4));
    }

    #[test]
    fn test_maybe_never_fails() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens("; x");

        assert!(maybe("punctuation", ";").run(&mut stream, &grammar).unwrap().matched());
        assert!(maybe("punctuation", ";").run(&mut stream, &grammar).unwrap().matched());
        assert_eq!(stream.peek().unwrap().unwrap().value.to_string(), "x");
    }

    #[test]
    fn test_succeed_and_fail() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens("x");

        assert!(succeed().run(&mut stream, &grammar).unwrap().matched());
        let failed = fail("nope").run(&mut stream, &grammar).unwrap();
        assert_eq!(failed.fail_message(), Some("nope"));
        assert_eq!(failed.failure_info().unwrap().at, Position::START);
    }
}
