//! Contract kinds and the recursive matcher.
//!
//! A [`Contract`] describes what a single argument or result must look like.
//! Contracts are immutable once built and cheap to clone: the trait-object
//! variants share their payload through `Arc`.

pub mod builtin;
pub mod matcher;

use std::fmt;
use std::sync::Arc;

use callguard_core::{Value, ValueType};
use indexmap::IndexMap;

pub use matcher::{matches, matches_value};

/// A custom validator object.
///
/// Implementors that do not override [`Validator::valid`] never match.
pub trait Validator: Send + Sync {
    fn valid(&self, _value: &Value) -> bool {
        false
    }

    /// Short description used when rendering the contract.
    fn describe(&self) -> String;
}

/// A unary test function, optionally named for diagnostics.
#[derive(Clone)]
pub struct Predicate {
    name: Option<String>,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate {
            name: None,
            check: Arc::new(f),
        }
    }

    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate {
            name: Some(name.into()),
            check: Arc::new(f),
        }
    }

    /// Wraps a function returning a [`Value`]; the predicate holds when the
    /// returned value is truthy.
    pub fn truthy<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Predicate::new(move |v| f(v).is_truthy())
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

/// A declarative specification a value must satisfy.
#[derive(Clone)]
pub enum Contract {
    /// Instance of the class (or one of its subclasses).
    Class(ValueType),
    /// Delegates to a validator object.
    Validator(Arc<dyn Validator>),
    /// Holds when the predicate returns `true`.
    Predicate(Predicate),
    /// Sequence of exactly this length, element `i` matching contract `i`.
    ArrayOf(Vec<Contract>),
    /// Mapping containing at least these keys, each matching its contract.
    /// Extra keys in the value are ignored.
    RecordOf(IndexMap<String, Contract>),
    /// Any supplied value, including `nil`; fails only when absent.
    Exists,
    /// Equal to a fixed value.
    Literal(Value),
}

impl Contract {
    pub fn class(ty: ValueType) -> Contract {
        Contract::Class(ty)
    }

    pub fn validator<V: Validator + 'static>(v: V) -> Contract {
        Contract::Validator(Arc::new(v))
    }

    pub fn predicate<F>(f: F) -> Contract
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Contract::Predicate(Predicate::new(f))
    }

    pub fn array_of(items: impl IntoIterator<Item = Contract>) -> Contract {
        Contract::ArrayOf(items.into_iter().collect())
    }

    pub fn record_of<K: Into<String>>(fields: impl IntoIterator<Item = (K, Contract)>) -> Contract {
        Contract::RecordOf(fields.into_iter().map(|(k, c)| (k.into(), c)).collect())
    }

    pub fn literal(value: impl Into<Value>) -> Contract {
        Contract::Literal(value.into())
    }

    /// Name of the contract kind, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Contract::Class(_) => "class",
            Contract::Validator(_) => "validator",
            Contract::Predicate(_) => "predicate",
            Contract::ArrayOf(_) => "array_of",
            Contract::RecordOf(_) => "record_of",
            Contract::Exists => "exists",
            Contract::Literal(_) => "literal",
        }
    }
}

impl From<ValueType> for Contract {
    fn from(ty: ValueType) -> Self {
        Contract::Class(ty)
    }
}

impl From<Predicate> for Contract {
    fn from(p: Predicate) -> Self {
        Contract::Predicate(p)
    }
}

pub(crate) fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contract::Class(ty) => write!(f, "{}", ty),
            Contract::Validator(v) => f.write_str(&v.describe()),
            Contract::Predicate(p) => f.write_str(p.name.as_deref().unwrap_or("#<Proc>")),
            Contract::ArrayOf(items) => {
                f.write_str("[")?;
                write_joined(f, items, ", ")?;
                f.write_str("]")
            }
            Contract::RecordOf(fields) => {
                f.write_str("{")?;
                write_joined(f, fields.iter().map(|(k, c)| format!("{}: {}", k, c)), ", ")?;
                f.write_str("}")
            }
            Contract::Exists => f.write_str("Exists"),
            Contract::Literal(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Contract({}: {})", self.kind_name(), self)
    }
}
