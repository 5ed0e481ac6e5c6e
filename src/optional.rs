use crate::result::MatchResult;
use crate::segment::Segment;

/// Match `segment` if possible; otherwise succeed without consuming input
///
/// A successful inner match is passed through unchanged, including its data,
/// key and flatten mode. Fatal errors from the inner segment still propagate.
pub fn optional(segment: impl Into<Segment>) -> Segment {
    let segment = segment.into();
    let label = format!("optional {}", segment.options().label.as_deref().unwrap_or("segment"));

    Segment::new({
        let segment = segment.clone();
        move |stream, grammar| {
            let result = segment.run(stream, grammar)?;
            if result.matched() {
                Ok(result)
            } else {
                Ok(MatchResult::success())
            }
        }
    })
    .referencing([&segment])
    .label(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::expect::{expect, expect_type};
    use crate::grammar::Grammar;
    use crate::lexer::{Lexer, Matcher, TokenLayout};
    use crate::value::Value;

    fn lexer() -> Lexer {
        Lexer::builder()
            .layout(TokenLayout::new("whitespace").matcher(Matcher::pattern(r"\s+").unwrap()))
            .layout(TokenLayout::new("identifier").matcher(Matcher::pattern("[a-z]+").unwrap()))
            .layout(TokenLayout::new("punctuation").matcher(Matcher::one_of("(),;")))
            .skip("whitespace")
            .build()
    }

    #[test]
    fn test_present() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens("abc ;");

        let result = optional(expect_type("identifier").key("name"))
            .run(&mut stream, &grammar)
            .unwrap();
        assert!(result.matched());
        assert_eq!(result.key(), Some("name"));
        assert_eq!(result.data(), Some(&Value::from("abc")));
    }

    #[test]
    fn test_absent_consumes_nothing() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens(";");

        let result = optional(expect("punctuation", "(")).run(&mut stream, &grammar).unwrap();
        assert!(result.matched());
        assert!(!result.has_data());
        assert_eq!(result.progress(), 0);
        assert_eq!(stream.offset(), 0);
    }

    #[test]
    fn test_fatal_error_propagates() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens(";");

        let error = optional("missing").run(&mut stream, &grammar).unwrap_err();
        assert_eq!(
            error,
            ParseError::UnknownRule {
                name: "missing".to_string()
            }
        );
    }
}
