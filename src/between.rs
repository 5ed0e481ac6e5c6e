use crate::result::MatchResult;
use crate::segment::Segment;

/// Match `content` surrounded by `open` and `close`, producing the content's data
///
/// Any of the three failing is a recoverable failure of the whole segment.
///
/// # Examples
/// - `(1 + 2)` with `(` and `)` around an expression → the expression
pub fn between(
    open: impl Into<Segment>,
    content: impl Into<Segment>,
    close: impl Into<Segment>,
) -> Segment {
    let parts = [open.into(), content.into(), close.into()];

    Segment::new({
        let [open, content, close] = parts.clone();
        move |stream, grammar| {
            let opened = open.run(stream, grammar)?;
            if !opened.matched() {
                return Ok(opened);
            }
            let inner = content.run(stream, grammar)?;
            if !inner.matched() {
                return Ok(inner);
            }
            let closed = close.run(stream, grammar)?;
            if !closed.matched() {
                return Ok(closed);
            }
            Ok(match inner.into_data() {
                Some(data) => MatchResult::with_data(data),
                None => MatchResult::success(),
            })
        }
    })
    .referencing(parts.iter())
    .label("between")
}
