use crate::driver::syntax_error;
use crate::result::MatchResult;
use crate::segment::Segment;
use crate::value::Value;

/// Match `open`, zero or more `element`s separated by `separator`, then `close`
///
/// Produces the list of element data. Once `open` has matched, an element
/// that fails to parse is a fatal error; so is a separator directly before
/// `close`, since a separator must always be followed by an element.
///
/// # Examples
/// - `(a, b, c)` → `["a", "b", "c"]`
/// - `()` → `[]`
/// - `(a,)` → error
pub fn delimited(
    open: impl Into<Segment>,
    close: impl Into<Segment>,
    separator: impl Into<Segment>,
    element: impl Into<Segment>,
) -> Segment {
    let parts = [open.into(), close.into(), separator.into(), element.into()];

    Segment::new({
        let [open, close, separator, element] = parts.clone();
        move |stream, grammar| {
            let opened = open.run(stream, grammar)?;
            if !opened.matched() {
                return Ok(opened);
            }

            let mut items = Vec::new();
            let mut after_separator = false;
            loop {
                if !after_separator && close.run(stream, grammar)?.matched() {
                    break;
                }

                let item = element.run(stream, grammar)?;
                if !item.matched() {
                    return Err(syntax_error(&item, stream)?);
                }
                if let Some(data) = item.into_data() {
                    items.push(data);
                }

                if separator.run(stream, grammar)?.matched() {
                    after_separator = true;
                    continue;
                }
                let closed = close.run(stream, grammar)?;
                if !closed.matched() {
                    return Ok(closed);
                }
                break;
            }
            Ok(MatchResult::with_data(Value::List(items)))
        }
    })
    .referencing(parts.iter())
    .label("delimited")
}
