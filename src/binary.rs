//! Binary expressions by precedence climbing
//!
//! Operators are grouped into tiers, listed from the loosest binding to the
//! tightest. `a - b - c` groups as `(a - b) - c` for a left-associative tier
//! and `a = b = c` as `a = (b = c)` for a right-associative one.

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::position::Span;
use crate::result::MatchResult;
use crate::segment::Segment;
use crate::token::Token;
use crate::token_stream::TokenStream;
use crate::value::{Object, Value};

/// AST kind of the nodes built by [`binary`]
pub const BINARY_KIND: &str = "binary";
pub const OPERATOR_FIELD: &str = "operator";
pub const LEFT_FIELD: &str = "left";
pub const RIGHT_FIELD: &str = "right";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Associativity {
    #[default]
    Left,
    Right,
}

/// Operators sharing one precedence level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    operators: Vec<(String, String)>,
    associativity: Associativity,
}

impl Tier {
    /// Left-associative operators of token kind `kind`
    pub fn left<I, S>(kind: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tier::new(kind, values, Associativity::Left)
    }

    /// Right-associative operators of token kind `kind`
    pub fn right<I, S>(kind: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tier::new(kind, values, Associativity::Right)
    }

    fn new<I, S>(kind: &str, values: I, associativity: Associativity) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tier {
            operators: values
                .into_iter()
                .map(|value| (kind.to_string(), value.into()))
                .collect(),
            associativity,
        }
    }

    /// Add an operator of another token kind to this tier
    pub fn with(mut self, kind: impl Into<String>, value: impl Into<String>) -> Self {
        self.operators.push((kind.into(), value.into()));
        self
    }

    pub fn associativity(&self) -> Associativity {
        self.associativity
    }

    fn contains(&self, token: &Token) -> bool {
        self.operators
            .iter()
            .any(|(kind, value)| token.is(kind, value))
    }
}

/// Parse `operand`s joined by the operators of `tiers`, loosest tier first
///
/// A single operand is passed through unchanged. Every operator application
/// becomes an object of kind [`BINARY_KIND`] with `operator`, `left` and
/// `right` fields, spanning both operands.
pub fn binary(operand: impl Into<Segment>, tiers: Vec<Tier>) -> Segment {
    let operand = operand.into();

    Segment::new({
        let operand = operand.clone();
        move |stream, grammar| climb(stream, grammar, &operand, &tiers, None)
    })
    .referencing([&operand])
    .label("binary")
}

/// Parse an expression whose operators all bind tighter than tier `floor`
fn climb(
    stream: &mut TokenStream<'_>,
    grammar: &Grammar,
    operand: &Segment,
    tiers: &[Tier],
    floor: Option<usize>,
) -> Result<MatchResult, ParseError> {
    let start = stream.position()?;
    let first = operand.run(stream, grammar)?;
    if !first.matched() {
        return Ok(first);
    }
    let mut left = first.into_data().unwrap_or_default();

    loop {
        let Some(token) = stream.peek()? else {
            break;
        };
        let Some(tier) = tiers.iter().position(|tier| tier.contains(token)) else {
            break;
        };
        if floor.is_some_and(|floor| tier <= floor) {
            break;
        }

        let checkpoint = stream.checkpoint();
        let operator = match stream.next()? {
            Some(token) => token.value,
            None => break,
        };
        let next_floor = match tiers[tier].associativity {
            Associativity::Left => Some(tier),
            Associativity::Right => tier.checked_sub(1),
        };

        let right = climb(stream, grammar, operand, tiers, next_floor)?;
        if !right.matched() {
            stream.revert(checkpoint);
            return Ok(right);
        }

        let mut node = Object::with_kind(BINARY_KIND);
        node.span = Some(Span::new(start, stream.last_end()));
        node.insert(OPERATOR_FIELD, operator);
        node.insert(LEFT_FIELD, left);
        node.insert(RIGHT_FIELD, right.into_data().unwrap_or_default());
        left = Value::Object(node);
    }

    Ok(MatchResult::with_data(left))
}
