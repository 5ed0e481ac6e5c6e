use crate::result::MatchResult;
use crate::segment::Segment;

/// Ordered choice: the first alternative that matches wins
///
/// If every alternative fails, the failure that consumed the most input
/// before giving up is reported, on the assumption that it came closest to
/// what the author meant. Ties go to the earliest alternative.
pub fn one_of<I, S>(alternatives: I) -> Segment
where
    I: IntoIterator<Item = S>,
    S: Into<Segment>,
{
    let alternatives: Vec<Segment> = alternatives.into_iter().map(Into::into).collect();

    Segment::new({
        let alternatives = alternatives.clone();
        move |stream, grammar| {
            let mut best: Option<MatchResult> = None;
            for alternative in &alternatives {
                let result = alternative.run(stream, grammar)?;
                if result.matched() {
                    return Ok(result);
                }
                let closer = match &best {
                    Some(best) => result.progress() > best.progress(),
                    None => true,
                };
                if closer {
                    best = Some(result);
                }
            }
            match best {
                Some(best) => Ok(best),
                None => {
                    let at = stream.position()?;
                    Ok(MatchResult::failure(at, "No alternatives to choose from"))
                }
            }
        }
    })
    .referencing(alternatives.iter())
    .label("one of")
}

impl Segment {
    /// Try `self`, then `other`
    pub fn or(self, other: impl Into<Segment>) -> Segment {
        one_of([self, other.into()])
    }
}
