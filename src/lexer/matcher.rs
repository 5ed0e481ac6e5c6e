use crate::cursor::InputCursor;
use crate::error::LexError;
use regex::Regex;

/// One way of recognising the text of a token at the cursor
///
/// A matcher either consumes input and returns the token text, or returns
/// `None` and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Text between `open` and `close`; the delimiters are not part of the value
    Delimited {
        open: String,
        close: String,
        escape: Option<char>,
    },
    /// Anchored regular expression
    Pattern(Regex),
    /// Any single character from the set
    OneOf(String),
    /// Any of the literals, longest first
    Literals(Vec<String>),
}

impl Matcher {
    pub fn delimited(
        open: impl Into<String>,
        close: impl Into<String>,
        escape: Option<char>,
    ) -> Self {
        Matcher::Delimited {
            open: open.into(),
            close: close.into(),
            escape,
        }
    }

    /// Compile `pattern` so that it only matches at the cursor
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{})", pattern)).map(Matcher::Pattern)
    }

    pub fn one_of(chars: impl Into<String>) -> Self {
        Matcher::OneOf(chars.into())
    }

    pub fn literals<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut literals: Vec<String> = literals.into_iter().map(Into::into).collect();
        literals.retain(|literal| !literal.is_empty());
        // Stable sort keeps the configured order among equally long literals
        literals.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        Matcher::Literals(literals)
    }

    /// Try to read token text at the cursor
    pub fn read(&self, cursor: &mut InputCursor<'_>) -> Result<Option<String>, LexError> {
        match self {
            Matcher::Delimited {
                open,
                close,
                escape,
            } => {
                if cursor.is_next_literal(open) {
                    // Once the opening delimiter is consumed the literal must close
                    return cursor.read_until(close, *escape).map(Some);
                }
                Ok(None)
            }
            Matcher::Pattern(regex) => {
                let checkpoint = cursor.checkpoint();
                match cursor.read_pattern(regex) {
                    Some(text) if !text.is_empty() => Ok(Some(text.to_string())),
                    _ => {
                        cursor.revert(checkpoint);
                        Ok(None)
                    }
                }
            }
            Matcher::OneOf(chars) => match cursor.peek(0) {
                Some(ch) if chars.contains(ch) => {
                    cursor.next();
                    Ok(Some(ch.to_string()))
                }
                _ => Ok(None),
            },
            Matcher::Literals(literals) => Ok(literals
                .iter()
                .find(|literal| cursor.is_next_literal(literal))
                .cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_with_escape() {
        let matcher = Matcher::delimited("\"", "\"", Some('\\'));
        let mut cursor = InputCursor::new(r#""a\"b" rest"#);

        let text = matcher.read(&mut cursor).unwrap();
        assert_eq!(text.as_deref(), Some("a\"b"));
        assert_eq!(cursor.rest(), " rest");
    }

    #[test]
    fn test_delimited_empty_body_is_a_match() {
        let matcher = Matcher::delimited("'", "'", None);
        let mut cursor = InputCursor::new("''");
        assert_eq!(matcher.read(&mut cursor).unwrap().as_deref(), Some(""));
        assert!(cursor.eof());
    }

    #[test]
    fn test_delimited_unterminated() {
        let matcher = Matcher::delimited("\"", "\"", Some('\\'));
        let mut cursor = InputCursor::new("\"never closed");
        assert!(matches!(
            matcher.read(&mut cursor),
            Err(LexError::Unterminated { .. })
        ));
    }

    #[test]
    fn test_delimited_not_open() {
        let matcher = Matcher::delimited("/*", "*/", None);
        let mut cursor = InputCursor::new("/ 2");
        assert_eq!(matcher.read(&mut cursor).unwrap(), None);
        assert_eq!(cursor.position().offset, 0);
    }

    #[test]
    fn test_pattern_only_at_cursor() {
        let matcher = Matcher::pattern("[0-9]+").unwrap();
        let mut cursor = InputCursor::new("x12");
        assert_eq!(matcher.read(&mut cursor).unwrap(), None);

        cursor.next();
        assert_eq!(matcher.read(&mut cursor).unwrap().as_deref(), Some("12"));
    }

    #[test]
    fn test_pattern_empty_match_is_no_match() {
        let matcher = Matcher::pattern("[0-9]*").unwrap();
        let mut cursor = InputCursor::new("abc");
        assert_eq!(matcher.read(&mut cursor).unwrap(), None);
        assert_eq!(cursor.position().offset, 0);
    }

    #[test]
    fn test_pattern_alternation_is_anchored_as_a_whole() {
        let matcher = Matcher::pattern("a|b").unwrap();
        let mut cursor = InputCursor::new("xb");
        assert_eq!(matcher.read(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_one_of() {
        let matcher = Matcher::one_of("(){};,");
        let mut cursor = InputCursor::new("{x");
        assert_eq!(matcher.read(&mut cursor).unwrap().as_deref(), Some("{"));
        assert_eq!(matcher.read(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_literals_longest_first() {
        let matcher = Matcher::literals(["=", "==", "<", "<="]);
        let mut cursor = InputCursor::new("==<=");
        assert_eq!(matcher.read(&mut cursor).unwrap().as_deref(), Some("=="));
        assert_eq!(matcher.read(&mut cursor).unwrap().as_deref(), Some("<="));
        assert!(cursor.eof());
    }
}
