//! Tree produced by a successful parse
//!
//! Object nodes may carry an AST type tag and a source span. When serialized
//! they appear under the reserved field names [`TYPE_FIELD`] and
//! [`SPAN_FIELD`]; grammar keys may not use these names.

use crate::position::Span;
use crate::token::TokenValue;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Serialized name of [`Object::kind`]
pub const TYPE_FIELD: &str = "type";
/// Serialized name of [`Object::span`]
pub const SPAN_FIELD: &str = "span";

pub fn is_reserved(key: &str) -> bool {
    key == TYPE_FIELD || key == SPAN_FIELD
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    String(String),
    List(Vec<Value>),
    Object(Object),
}

/// Mapping level of the tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    pub kind: Option<String>,
    pub span: Option<Span>,
    pub fields: BTreeMap<String, Value>,
}

impl Object {
    pub fn new() -> Self {
        Object::default()
    }

    pub fn with_kind(kind: impl Into<String>) -> Self {
        Object {
            kind: Some(kind.into()),
            ..Object::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// No tag, no span and no fields
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.span.is_none() && self.fields.is_empty()
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Field `key` of an object node
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(key))
    }

    /// AST type tag of an object node
    pub fn kind(&self) -> Option<&str> {
        self.as_object().and_then(|object| object.kind.as_deref())
    }

    pub fn span(&self) -> Option<Span> {
        self.as_object().and_then(|object| object.span)
    }
}

impl From<TokenValue> for Value {
    fn from(value: TokenValue) -> Self {
        match value {
            TokenValue::Str(text) => Value::String(text),
            TokenValue::Number(number) => Value::Number(number),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Number(number) => serializer.serialize_f64(*number),
            Value::String(text) => serializer.serialize_str(text),
            Value::List(items) => items.serialize(serializer),
            Value::Object(object) => object.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let reserved = usize::from(self.kind.is_some()) + usize::from(self.span.is_some());
        let mut map = serializer.serialize_map(Some(self.fields.len() + reserved))?;
        if let Some(kind) = &self.kind {
            map.serialize_entry(TYPE_FIELD, kind)?;
        }
        if let Some(span) = &self.span {
            map.serialize_entry(SPAN_FIELD, span)?;
        }
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
