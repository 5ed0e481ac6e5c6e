//! Repetition up to a terminator or the end of input

use crate::driver::syntax_error;
use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::result::MatchResult;
use crate::segment::Segment;
use crate::token_stream::TokenStream;
use crate::value::Value;

/// Run `element` once, treating a failure as fatal
///
/// An element that matches without consuming anything would repeat forever,
/// so that is fatal too.
fn required_element(
    element: &Segment,
    stream: &mut TokenStream<'_>,
    grammar: &Grammar,
) -> Result<Option<Value>, ParseError> {
    let at = stream.position()?;
    let item = element.run(stream, grammar)?;
    if !item.matched() {
        return Err(syntax_error(&item, stream)?);
    }
    if item.progress() == 0 {
        return Err(ParseError::Syntax {
            at,
            detail: "Repeated rule matched without consuming input".to_string(),
        });
    }
    Ok(item.into_data())
}

/// Repeat `element` until `terminator` matches or the input runs out
///
/// A matching terminator is consumed. Produces the list of element data; an
/// element failure is fatal.
pub fn until(terminator: impl Into<Segment>, element: impl Into<Segment>) -> Segment {
    let terminator = terminator.into();
    let element = element.into();

    Segment::new({
        let terminator = terminator.clone();
        let element = element.clone();
        move |stream, grammar| {
            let mut items = Vec::new();
            loop {
                if terminator.run(stream, grammar)?.matched() || stream.eof()? {
                    break;
                }
                if let Some(data) = required_element(&element, stream, grammar)? {
                    items.push(data);
                }
            }
            Ok(MatchResult::with_data(Value::List(items)))
        }
    })
    .referencing([&terminator, &element])
    .label("until")
}

/// Repeat `element` until the input is exhausted
///
/// Produces the list of element data. An element failure is fatal.
pub fn until_eof(element: impl Into<Segment>) -> Segment {
    let element = element.into();

    Segment::new({
        let element = element.clone();
        move |stream, grammar| {
            let mut items = Vec::new();
            while !stream.eof()? {
                if let Some(data) = required_element(&element, stream, grammar)? {
                    items.push(data);
                }
            }
            Ok(MatchResult::with_data(Value::List(items)))
        }
    })
    .referencing([&element])
    .label("until end of input")
}
