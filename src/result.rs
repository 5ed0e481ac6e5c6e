use crate::error::ParseError;
use crate::position::{Position, Span};
use crate::value::{Object, Value, is_reserved};
use std::collections::HashSet;

/// Field that keeps a tagged rule's unkeyed scalar or list data
pub const VALUE_FIELD: &str = "value";

/// How a result is merged into the rule that ran it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flatten {
    /// Use the enclosing rule's policy
    #[default]
    Inherit,
    /// Copy object fields directly into the parent
    Merge,
    /// Store under the result's key
    Nest,
}

/// Why a grammar operation did not match
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub message: Option<String>,
    /// Start of the next unconsumed token when the failure was produced
    pub at: Position,
}

/// Outcome of running any grammar operation
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    matched: bool,
    data: Option<Value>,
    key: Option<String>,
    flatten: Flatten,
    failure: Option<Failure>,
    progress: usize,
    reached: usize,
}

impl MatchResult {
    /// A match without data, e.g. consumed punctuation
    pub fn success() -> Self {
        MatchResult {
            matched: true,
            data: None,
            key: None,
            flatten: Flatten::Inherit,
            failure: None,
            progress: 0,
            reached: 0,
        }
    }

    pub fn with_data(data: impl Into<Value>) -> Self {
        MatchResult {
            data: Some(data.into()),
            ..MatchResult::success()
        }
    }

    pub fn failure(at: Position, message: impl Into<String>) -> Self {
        MatchResult {
            matched: false,
            failure: Some(Failure {
                message: Some(message.into()),
                at,
            }),
            ..MatchResult::success()
        }
    }

    /// A failure that leaves the message to whoever reports it
    pub fn failure_at(at: Position) -> Self {
        MatchResult {
            matched: false,
            failure: Some(Failure { message: None, at }),
            ..MatchResult::success()
        }
    }

    pub fn matched(&self) -> bool {
        self.matched
    }

    /// Data of a successful match
    pub fn data(&self) -> Option<&Value> {
        if self.matched {
            self.data.as_ref()
        } else {
            None
        }
    }

    pub fn into_data(self) -> Option<Value> {
        if self.matched { self.data } else { None }
    }

    pub fn has_data(&self) -> bool {
        self.data().is_some()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// AST type tag of the data, if it is a tagged object
    pub fn kind(&self) -> Option<&str> {
        self.data().and_then(Value::kind)
    }

    pub fn span(&self) -> Option<Span> {
        self.data().and_then(Value::span)
    }

    pub fn flatten(&self) -> Flatten {
        self.flatten
    }

    pub fn failure_info(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn fail_message(&self) -> Option<&str> {
        self.failure.as_ref().and_then(|failure| failure.message.as_deref())
    }

    /// Characters consumed by the segment that produced this result
    ///
    /// For failures this is the distance to the furthest offset any segment
    /// inside it reached before reverting.
    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Furthest stream offset reached before a failure was reverted
    pub fn reached(&self) -> usize {
        self.reached
    }

    pub fn set_key(mut self, key: Option<String>) -> Self {
        self.key = key;
        self
    }

    pub fn set_flatten(mut self, flatten: Flatten) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn set_progress(mut self, progress: usize) -> Self {
        self.progress = progress;
        self
    }

    pub(crate) fn set_reached(mut self, reached: usize) -> Self {
        self.reached = reached;
        self
    }

    /// Attach a span to tagged object data that has none yet
    pub(crate) fn attach_span(&mut self, span: Span) {
        if let Some(Value::Object(object)) = &mut self.data {
            if object.kind.is_some() && object.span.is_none() {
                object.span = Some(span);
            }
        }
    }

    pub(crate) fn map_data<F>(mut self, convert: F) -> Self
    where
        F: FnOnce(Value) -> Value,
    {
        self.data = self.data.map(convert);
        self
    }
}

/// Accumulates child results into one rule's value
///
/// | child data | key     | flatten | effect                                   |
/// |------------|---------|---------|------------------------------------------|
/// | none       | any     | any     | nothing                                  |
/// | object     | any     | merge   | fields copied in, tag/span adopted       |
/// | any        | `k`     | nest    | stored under `k`, lists on repeat writes |
/// | non-object | `k`     | merge   | stored under `k`                         |
/// | object     | none    | nest    | fields copied in, tag/span adopted       |
/// | non-object | none    | any     | becomes the pass-through value           |
#[derive(Debug, Default)]
pub(crate) struct Assembly {
    object: Object,
    repeated: HashSet<String>,
    passthrough: Option<Value>,
}

impl Assembly {
    pub fn new() -> Self {
        Assembly::default()
    }

    /// Merge one successful child; `policy` resolves [`Flatten::Inherit`]
    pub fn merge(
        &mut self,
        child: MatchResult,
        policy: Flatten,
        at: Position,
    ) -> Result<(), ParseError> {
        let flatten = match child.flatten {
            Flatten::Inherit => policy,
            explicit => explicit,
        };
        let key = child.key;
        let Some(data) = child.data else {
            return Ok(());
        };

        match (data, key) {
            (Value::Object(object), _) if flatten == Flatten::Merge => self.absorb(object),
            (data, Some(key)) => self.put(key, data, at)?,
            (Value::Object(object), None) => self.absorb(object),
            (data, None) => self.passthrough = Some(data),
        }
        Ok(())
    }

    fn absorb(&mut self, object: Object) {
        for (key, value) in object.fields {
            self.repeated.remove(&key);
            self.object.fields.insert(key, value);
        }
        if self.object.kind.is_none() {
            self.object.kind = object.kind;
            if self.object.span.is_none() {
                self.object.span = object.span;
            }
        }
    }

    fn put(&mut self, key: String, data: Value, at: Position) -> Result<(), ParseError> {
        if is_reserved(&key) {
            return Err(ParseError::ReservedKey { key, at });
        }
        match self.object.fields.get_mut(&key) {
            None => {
                self.object.fields.insert(key, data);
            }
            Some(Value::List(items)) if self.repeated.contains(&key) => items.push(data),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::List(vec![first, data]);
                self.repeated.insert(key);
            }
        }
        Ok(())
    }

    /// The rule's value, tagged with `kind` when the rule has one
    pub fn finish(self, kind: Option<&str>) -> Option<Value> {
        let Assembly {
            mut object,
            passthrough,
            ..
        } = self;

        if let Some(kind) = kind {
            object.kind = Some(kind.to_string());
            // The segment running this rule assigns the rule's own span
            object.span = None;
            if let Some(value) = passthrough {
                object.fields.entry(VALUE_FIELD.to_string()).or_insert(value);
            }
            return Some(Value::Object(object));
        }

        if !object.is_empty() {
            Some(Value::Object(object))
        } else {
            passthrough
        }
    }
}
