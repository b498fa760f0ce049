//! Runtime value representation for guarded calls.
//!
//! [`Value`] is the dynamic counterpart to a contract: every argument a
//! guarded callable receives and every result it returns is a `Value`.
//! An argument that was not supplied at all is *not* a `Value`; binding
//! sites represent it as `None`, so an explicit `Nil` or `false` still
//! counts as present.

use std::fmt;

use indexmap::IndexMap;

use crate::block::Block;
use crate::error::CoreError;
use crate::types::ValueType;

/// A runtime value passed to or returned from a guarded callable.
///
/// Maps to the class taxonomy in [`ValueType`]:
/// - Scalars: `Nil`, `Bool`, `Int`, `Float`
/// - Text: `Str`, `Symbol`
/// - Compound: `Array`, `Map`, `Object`
/// - Callable: `Block`
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    Array(Vec<Value>),
    /// Keyed mapping in insertion order.
    Map(IndexMap<String, Value>),
    /// Instance of a user-defined class with its named fields.
    Object {
        class: String,
        fields: IndexMap<String, Value>,
    },
    Block(Block),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn symbol(s: impl Into<String>) -> Value {
        Value::Symbol(s.into())
    }

    pub fn array<I>(items: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K, V, I>(entries: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn object<K, V, I>(class: impl Into<String>, fields: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object {
            class: class.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn block<F>(f: F) -> Value
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Value::Block(Block::new(f))
    }

    /// The most specific class this value is an instance of.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::String,
            Value::Symbol(_) => ValueType::Symbol,
            Value::Array(_) => ValueType::Array,
            Value::Map(_) => ValueType::Hash,
            Value::Object { class, .. } => ValueType::Class(class.clone()),
            Value::Block(_) => ValueType::Proc,
        }
    }

    /// Instance-of check: `true` if this value's class is `ty` or one of
    /// its descendants.
    pub fn is_a(&self, ty: &ValueType) -> bool {
        self.value_type().is_subtype_of(ty)
    }

    /// Everything except `Nil` and `false` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Numeric view of `Int` and `Float` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Looks up a named entry of a `Map` or a field of an `Object`.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.get(key),
            Value::Object { fields, .. } => fields.get(key),
            _ => None,
        }
    }

    /// Returns a human-readable name of the value's class.
    pub fn type_name(&self) -> String {
        self.value_type().to_string()
    }

    /// Converts a JSON document into a value.
    ///
    /// Integral numbers that fit in `i64` become `Int`, all other numbers
    /// become `Float`. Objects become insertion-ordered `Map`s.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts this value into JSON. Symbols are written as strings and
    /// objects as their field maps; blocks have no representation.
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        Ok(match self {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or(CoreError::NonFiniteFloat { value: *f })?,
            Value::Str(s) | Value::Symbol(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<Result<_, _>>()?,
            ),
            Value::Map(entries) | Value::Object { fields: entries, .. } => {
                let mut out = serde_json::Map::with_capacity(entries.len());
                for (k, v) in entries {
                    out.insert(k.clone(), v.to_json()?);
                }
                serde_json::Value::Object(out)
            }
            Value::Block(_) => {
                return Err(CoreError::NotRepresentable {
                    type_name: self.type_name(),
                })
            }
        })
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &IndexMap<String, Value>) -> fmt::Result {
    for (i, (k, v)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}: {}", k, v)?;
    }
    Ok(())
}

/// Inspect-style rendering used in violation messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, ":{}", s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                write_entries(f, entries)?;
                f.write_str("}")
            }
            Value::Object { class, fields } if fields.is_empty() => write!(f, "#<{}>", class),
            Value::Object { class, fields } => {
                write!(f, "#<{} ", class)?;
                write_entries(f, fields)?;
                f.write_str(">")
            }
            Value::Block(_) => f.write_str("#<Proc>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
