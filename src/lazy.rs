//! References to rules by name
//!
//! A reference is resolved against the grammar it runs in the first time it
//! runs, which lets rules refer to each other (or themselves) regardless of
//! the order in which they were defined.

use crate::error::ParseError;
use crate::segment::Segment;
use once_cell::sync::OnceCell;

/// Run the grammar rule called `name`
///
/// The rule's position in the grammar is cached after the first lookup.
/// The cache remembers which grammar it belongs to, so the same segment can
/// be shared between grammars.
pub fn lazy(name: impl Into<String>) -> Segment {
    let name = name.into();
    let label = name.clone();
    let resolved: OnceCell<(u64, usize)> = OnceCell::new();

    Segment::new({
        let name = name.clone();
        move |stream, grammar| {
            let index = match resolved.get() {
                Some(&(grammar_id, index)) if grammar_id == grammar.id() => index,
                _ => {
                    let index = grammar.index_of(&name).ok_or_else(|| ParseError::UnknownRule {
                        name: name.clone(),
                    })?;
                    // A different grammar may already own the cache; it then stays with it
                    let _ = resolved.set((grammar.id(), index));
                    index
                }
            };
            let rule = grammar.rule_at(index).ok_or_else(|| ParseError::UnknownRule {
                name: name.clone(),
            })?;
            rule.run(stream, grammar)
        }
    })
    .referencing_name(&name)
    .label(label)
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        lazy(name)
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        lazy(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::lexer::{Lexer, Matcher, TokenLayout};
    use crate::rule::Rule;
    use crate::value::Value;

    fn lexer() -> Lexer {
        Lexer::builder()
            .layout(TokenLayout::new("whitespace").matcher(Matcher::pattern(r"\s+").unwrap()))
            .layout(TokenLayout::new("identifier").matcher(Matcher::pattern("[a-z]+").unwrap()))
            .layout(TokenLayout::new("punctuation").matcher(Matcher::one_of("()")))
            .skip("whitespace")
            .build()
    }

    fn nesting_grammar() -> Grammar {
        let mut grammar = Grammar::new();
        grammar
            .define(
                Rule::new("nested")
                    .one_of([
                        Rule::new("group")
                            .expect("punctuation", "(")
                            .then("nested")
                            .expect("punctuation", ")")
                            .into_segment(),
                        "name".into(),
                    ]),
            )
            .unwrap()
            .define(Rule::new("name").expect_type("identifier"))
            .unwrap();
        grammar
    }

    #[test]
    fn test_recursive_reference() {
        let lexer = lexer();
        let grammar = nesting_grammar();
        let mut stream = lexer.tokens("((( x )))");

        let result = lazy("nested").run(&mut stream, &grammar).unwrap();
        assert_eq!(result.data(), Some(&Value::from("x")));
        assert!(stream.eof().unwrap());
    }

    #[test]
    fn test_unknown_rule() {
        let lexer = lexer();
        let grammar = Grammar::new();
        let mut stream = lexer.tokens("x");

        let error = lazy("nowhere").run(&mut stream, &grammar).unwrap_err();
        assert_eq!(
            error,
            ParseError::UnknownRule {
                name: "nowhere".to_string()
            }
        );
    }

    #[test]
    fn test_shared_between_grammars() {
        let lexer = lexer();
        let reference = lazy("name");

        let mut first = Grammar::new();
        first.define(Rule::new("name").expect_type("identifier").key("first")).unwrap();
        let mut second = Grammar::new();
        second.define(Rule::new("other")).unwrap();
        second.define(Rule::new("name").expect_type("identifier").key("second")).unwrap();

        let mut stream = lexer.tokens("x");
        let result = reference.run(&mut stream, &first).unwrap();
        assert!(result.data().and_then(|data| data.get("first")).is_some());

        let mut stream = lexer.tokens("x");
        let result = reference.run(&mut stream, &second).unwrap();
        assert!(result.data().and_then(|data| data.get("second")).is_some());
    }

    #[test]
    fn test_reference_is_recorded() {
        assert_eq!(lazy("expression").references(), ["expression".to_string()]);
    }
}
