use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::position::Span;
use crate::result::{Flatten, MatchResult};
use crate::token_stream::TokenStream;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Signature of the function a [`Segment`] wraps
pub type MatchFn =
    dyn Fn(&mut TokenStream<'_>, &Grammar) -> Result<MatchResult, ParseError> + Send + Sync;

/// Per-segment configuration applied to successful results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentOptions {
    pub key: Option<String>,
    pub flatten: Flatten,
    pub label: Option<Cow<'static, str>>,
}

/// Smallest executable grammar unit
///
/// Running a segment never leaves a partial effect behind: if the wrapped
/// function fails, the token stream is reverted to where it was before the
/// call. Segments are immutable; the configuration methods return a new
/// segment sharing the same match function.
#[derive(Clone)]
pub struct Segment {
    matcher: Arc<MatchFn>,
    options: SegmentOptions,
    references: Arc<[String]>,
}

impl Segment {
    pub fn new<F>(matcher: F) -> Self
    where
        F: Fn(&mut TokenStream<'_>, &Grammar) -> Result<MatchResult, ParseError>
            + Send
            + Sync
            + 'static,
    {
        Segment {
            matcher: Arc::new(matcher),
            options: SegmentOptions::default(),
            references: Arc::from(Vec::new()),
        }
    }

    /// Record the rule names this segment (or any segment inside it) refers to
    pub(crate) fn referencing<'s, I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = &'s Segment>,
    {
        let mut references: Vec<String> = self.references.to_vec();
        for child in children {
            references.extend(child.references.iter().cloned());
        }
        self.references = references.into();
        self
    }

    pub(crate) fn referencing_name(mut self, name: &str) -> Self {
        let mut references: Vec<String> = self.references.to_vec();
        references.push(name.to_string());
        self.references = references.into();
        self
    }

    /// Store this segment's data under `key` in the enclosing rule
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.options.key = Some(key.into());
        self
    }

    /// Merge this segment's fields into the enclosing rule (`true`) or always
    /// nest them under the key (`false`)
    pub fn flatten(mut self, merge: bool) -> Self {
        self.options.flatten = if merge { Flatten::Merge } else { Flatten::Nest };
        self
    }

    /// Name used in trace output
    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// Rule names referenced from within this segment
    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn run(
        &self,
        stream: &mut TokenStream<'_>,
        grammar: &Grammar,
    ) -> Result<MatchResult, ParseError> {
        guarded(stream, grammar, &self.options, |stream| (self.matcher)(stream, grammar))
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("options", &self.options)
            .field("references", &self.references)
            .field("matcher", &"<function>")
            .finish()
    }
}

/// Run `body` under the backtracking contract
///
/// On entry the stream position is saved; a failed or erroring body is
/// reverted. On success the configured key and flatten mode are attached,
/// progress is recorded, and tagged object data receives a span. A failure
/// keeps the furthest offset reached by anything inside it, so its progress
/// survives the reverts of the segments wrapping it.
pub(crate) fn guarded<'a, F>(
    stream: &mut TokenStream<'a>,
    grammar: &Grammar,
    options: &SegmentOptions,
    body: F,
) -> Result<MatchResult, ParseError>
where
    F: FnOnce(&mut TokenStream<'a>) -> Result<MatchResult, ParseError>,
{
    let depth = stream.enter();
    let outcome = run_at_depth(stream, grammar, options, depth, body);
    stream.leave();
    outcome
}

fn run_at_depth<'a, F>(
    stream: &mut TokenStream<'a>,
    grammar: &Grammar,
    options: &SegmentOptions,
    depth: usize,
    body: F,
) -> Result<MatchResult, ParseError>
where
    F: FnOnce(&mut TokenStream<'a>) -> Result<MatchResult, ParseError>,
{
    let limit = grammar.config().max_depth;
    let start = stream.position()?;
    if depth > limit {
        return Err(ParseError::TooDeep { at: start, limit });
    }

    let label = options.label.as_deref().unwrap_or("<segment>");
    trace!(segment = label, depth, line = start.line, column = start.column, "enter");

    let checkpoint = stream.checkpoint();
    let outcome = body(stream);

    match outcome {
        Ok(result) if result.matched() => {
            let progress = stream.offset().saturating_sub(checkpoint.offset());
            let mut result = result.set_progress(progress);
            if let Some(key) = &options.key {
                result = result.set_key(Some(key.clone()));
            }
            if options.flatten != Flatten::Inherit {
                result = result.set_flatten(options.flatten);
            }
            result.attach_span(Span::new(start, stream.last_end().max(start)));
            Ok(result)
        }
        Ok(result) => {
            let reached = result.reached().max(stream.offset());
            let progress = reached.saturating_sub(checkpoint.offset());
            stream.revert(checkpoint);
            trace!(
                segment = label,
                depth,
                progress,
                message = result.fail_message().unwrap_or(""),
                "failed"
            );
            Ok(result.set_reached(reached).set_progress(progress))
        }
        Err(error) => {
            stream.revert(checkpoint);
            Err(error)
        }
    }
}
