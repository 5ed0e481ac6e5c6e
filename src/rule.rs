use crate::between::between;
use crate::delimited::delimited;
use crate::error::ParseError;
use crate::expect::{expect, expect_type};
use crate::grammar::Grammar;
use crate::lazy::lazy;
use crate::one_of::one_of;
use crate::optional::optional;
use crate::result::{Assembly, Flatten, MatchResult};
use crate::segment::{Segment, SegmentOptions, guarded};
use crate::token_stream::TokenStream;
use crate::until::{until, until_eof};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type Convert = dyn Fn(Value) -> Value + Send + Sync;

/// A named sequence of segments
///
/// Every segment must match, in order, for the rule to match. The data of
/// the segments is combined into one value: keyed data becomes fields of an
/// object, unkeyed objects are merged in, and an unkeyed scalar or list
/// passes straight through. A rule with an AST kind always produces an
/// object tagged with that kind.
///
/// ```
/// use lexicomb::rule::Rule;
///
/// let rule = Rule::new("let")
///     .kind("let")
///     .expect("keyword", "let")
///     .expect_type("identifier")
///     .key("name")
///     .expect("operator", "=")
///     .reference("expression")
///     .key("value")
///     .expect("punctuation", ";");
/// assert_eq!(rule.segments().len(), 5);
/// ```
#[derive(Clone)]
pub struct Rule {
    name: String,
    kind: Option<String>,
    segments: Vec<Segment>,
    flatten: Flatten,
    convert: Option<Arc<Convert>>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            kind: None,
            segments: Vec::new(),
            flatten: Flatten::Inherit,
            convert: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// AST type tag given to this rule's output
    pub fn ast_kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Append a segment; a `&str` appends a reference to that rule
    pub fn then(mut self, segment: impl Into<Segment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn expect(self, kind: impl Into<String>, value: impl Into<String>) -> Self {
        self.then(expect(kind, value))
    }

    pub fn expect_type(self, kind: impl Into<String>) -> Self {
        self.then(expect_type(kind))
    }

    pub fn reference(self, name: impl Into<String>) -> Self {
        self.then(lazy(name))
    }

    pub fn optional(self, segment: impl Into<Segment>) -> Self {
        self.then(optional(segment))
    }

    pub fn one_of<I, S>(self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        self.then(one_of(alternatives))
    }

    pub fn delimited(
        self,
        open: impl Into<Segment>,
        close: impl Into<Segment>,
        separator: impl Into<Segment>,
        element: impl Into<Segment>,
    ) -> Self {
        self.then(delimited(open, close, separator, element))
    }

    pub fn until(self, terminator: impl Into<Segment>, element: impl Into<Segment>) -> Self {
        self.then(until(terminator, element))
    }

    pub fn until_eof(self, element: impl Into<Segment>) -> Self {
        self.then(until_eof(element))
    }

    pub fn between(
        self,
        open: impl Into<Segment>,
        content: impl Into<Segment>,
        close: impl Into<Segment>,
    ) -> Self {
        self.then(between(open, content, close))
    }

    /// Key the most recently added segment
    pub fn key(mut self, key: impl Into<String>) -> Self {
        if let Some(last) = self.segments.pop() {
            self.segments.push(last.key(key));
        }
        self
    }

    /// Set the flatten mode of the most recently added segment
    pub fn flatten(mut self, merge: bool) -> Self {
        if let Some(last) = self.segments.pop() {
            self.segments.push(last.flatten(merge));
        }
        self
    }

    /// Tag this rule's output with an AST kind
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Default flatten mode for segments that do not set their own
    pub fn flatten_children(mut self, merge: bool) -> Self {
        self.flatten = if merge { Flatten::Merge } else { Flatten::Nest };
        self
    }

    /// Post-process the rule's data after it has been assembled
    pub fn map<F>(mut self, convert: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.convert = Some(Arc::new(convert));
        self
    }

    /// Use this rule inline, without registering it in a grammar
    pub fn into_segment(self) -> Segment {
        let label = self.name.clone();
        let segments = self.segments.clone();
        Segment::new(move |stream, grammar| self.run_sequence(stream, grammar))
            .referencing(segments.iter())
            .label(label)
    }

    pub fn run(
        &self,
        stream: &mut TokenStream<'_>,
        grammar: &Grammar,
    ) -> Result<MatchResult, ParseError> {
        let options = SegmentOptions {
            label: Some(self.name.clone().into()),
            ..SegmentOptions::default()
        };
        guarded(stream, grammar, &options, |stream| self.run_sequence(stream, grammar))
    }

    fn run_sequence(
        &self,
        stream: &mut TokenStream<'_>,
        grammar: &Grammar,
    ) -> Result<MatchResult, ParseError> {
        let mut assembly = Assembly::new();
        for segment in &self.segments {
            let result = segment.run(stream, grammar)?;
            if !result.matched() {
                return Ok(result);
            }
            assembly.merge(result, self.flatten, stream.last_end())?;
        }

        let result = match assembly.finish(self.kind.as_deref()) {
            Some(data) => MatchResult::with_data(data),
            None => MatchResult::success(),
        };
        Ok(match &self.convert {
            Some(convert) => result.map_data(|data| convert(data)),
            None => result,
        })
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("segments", &self.segments)
            .field("flatten", &self.flatten)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, Matcher, TokenLayout, Transform};
    use crate::value::Object;

    fn lexer() -> Lexer {
        Lexer::builder()
            .layout(TokenLayout::new("whitespace").matcher(Matcher::pattern(r"\s+").unwrap()))
            .layout(
                TokenLayout::new("number")
                    .matcher(Matcher::pattern("[0-9]+").unwrap())
                    .transform(Transform::Number),
            )
            .layout(
                TokenLayout::new("identifier")
                    .matcher(Matcher::pattern("[a-z]+").unwrap())
                    .transform(Transform::keywords("keyword", ["let"])),
            )
            .layout(TokenLayout::new("operator").matcher(Matcher::literals(["="])))
            .layout(TokenLayout::new("punctuation").matcher(Matcher::one_of("(),;")))
            .skip("whitespace")
            .build()
    }

    fn run(rule: &Rule, grammar: &Grammar, source: &str) -> MatchResult {
        let lexer = lexer();
        let mut stream = lexer.tokens(source);
        rule.run(&mut stream, grammar).unwrap()
    }

    #[test]
    fn test_tagged_rule_with_keys() {
        let grammar = Grammar::new();
        let rule = Rule::new("let")
            .kind("let")
            .expect("keyword", "let")
            .expect_type("identifier")
            .key("name")
            .expect("operator", "=")
            .expect_type("number")
            .key("value")
            .expect("punctuation", ";");

        let result = run(&rule, &grammar, "let z = 3;");
        assert!(result.matched());
        let data = result.data().unwrap();
        assert_eq!(data.kind(), Some("let"));
        assert_eq!(data.get("name"), Some(&Value::from("z")));
        assert_eq!(data.get("value"), Some(&Value::from(3.0)));

        let span = data.span().unwrap();
        assert_eq!((span.start.offset, span.end.offset), (0, 10));
    }

    #[test]
    fn test_failure_stops_sequence() {
        let grammar = Grammar::new();
        let rule = Rule::new("let")
            .expect("keyword", "let")
            .expect_type("identifier")
            .expect("punctuation", ";");

        let result = run(&rule, &grammar, "let z = 3;");
        assert!(!result.matched());
        assert_eq!(result.fail_message(), Some("Expected punctuation ; but got operator ="));
        assert_eq!(result.progress(), 5);
    }

    #[test]
    fn test_untagged_scalar_passes_through() {
        let grammar = Grammar::new();
        let rule = Rule::new("paren")
            .expect("punctuation", "(")
            .expect_type("number")
            .expect("punctuation", ")");

        let result = run(&rule, &grammar, "( 7 )");
        assert_eq!(result.data(), Some(&Value::from(7.0)));
    }

    #[test]
    fn test_rule_without_data() {
        let grammar = Grammar::new();
        let rule = Rule::new("semi").expect("punctuation", ";");
        let result = run(&rule, &grammar, ";");
        assert!(result.matched());
        assert!(!result.has_data());
    }

    #[test]
    fn test_flatten_children() {
        let mut grammar = Grammar::new();
        grammar
            .define(Rule::new("name").expect_type("identifier").key("name"))
            .unwrap();

        let nested = Rule::new("nested").reference("name").key("inner").flatten_children(false);
        let result = run(&nested, &grammar, "x");
        let mut inner = Object::new();
        inner.insert("name", "x");
        assert_eq!(result.data().and_then(|data| data.get("inner")), Some(&Value::from(inner)));

        let merged = Rule::new("merged").reference("name").key("inner").flatten_children(true);
        let result = run(&merged, &grammar, "x");
        assert_eq!(result.data().and_then(|data| data.get("name")), Some(&Value::from("x")));
        assert_eq!(result.data().and_then(|data| data.get("inner")), None);
    }

    #[test]
    fn test_segment_flatten_overrides_rule_policy() {
        let mut grammar = Grammar::new();
        grammar
            .define(Rule::new("name").expect_type("identifier").key("name"))
            .unwrap();

        let rule = Rule::new("outer")
            .reference("name")
            .key("inner")
            .flatten(false)
            .flatten_children(true);
        let result = run(&rule, &grammar, "x");
        assert!(result.data().and_then(|data| data.get("inner")).is_some());
    }

    #[test]
    fn test_map_converts_data() {
        let grammar = Grammar::new();
        let rule = Rule::new("double")
            .expect_type("number")
            .map(|value| Value::from(value.as_number().unwrap_or_default() * 2.0));

        let result = run(&rule, &grammar, "21");
        assert_eq!(result.data(), Some(&Value::from(42.0)));
    }

    #[test]
    fn test_inline_rule() {
        let grammar = Grammar::new();
        let default = Rule::new("default")
            .expect("operator", "=")
            .expect_type("number")
            .key("default")
            .into_segment();
        let rule = Rule::new("argument")
            .kind("argument")
            .expect_type("identifier")
            .key("name")
            .optional(default);

        let with_default = run(&rule, &grammar, "x = 1");
        assert_eq!(
            with_default.data().and_then(|data| data.get("default")),
            Some(&Value::from(1.0))
        );

        let without = run(&rule, &grammar, "y");
        assert_eq!(without.data().and_then(|data| data.get("default")), None);
        assert_eq!(without.data().and_then(|data| data.get("name")), Some(&Value::from("y")));
    }

    #[test]
    fn test_reserved_key_at_runtime() {
        let grammar = Grammar::new();
        let inner = Rule::new("inner").expect_type("identifier").key("span").into_segment();
        let rule = Rule::new("outer").then(inner).key("node").flatten_children(true);

        let lexer = lexer();
        let mut stream = lexer.tokens("x");
        let error = rule.run(&mut stream, &grammar).unwrap_err();
        assert!(matches!(error, ParseError::ReservedKey { ref key, .. } if key == "span"));
    }
}
