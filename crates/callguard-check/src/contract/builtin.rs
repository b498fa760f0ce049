//! Builtin validators.
//!
//! These are the stock contracts a declaration can name without writing a
//! validator of its own: numeric checks, the universal/empty contracts,
//! and combinators over other contracts. Each is an ordinary
//! [`Validator`]; the lowercase constructor functions wrap them in a
//! [`Contract`].

use std::fmt;

use callguard_core::{Value, ValueType};

use super::{matches_value, write_joined, Contract, Validator};

/// Any number (`Int` or `Float`).
pub struct Num;

/// A number greater than zero.
pub struct Pos;

/// A number less than zero.
pub struct Neg;

/// Matches every value.
pub struct Any;

/// Matches no value.
pub struct Nothing;

/// `true` or `false`.
pub struct Bool;

/// At least one of the contracts matches.
pub struct Or(pub Vec<Contract>);

/// Every contract matches.
pub struct And(pub Vec<Contract>);

/// Exactly one of the contracts matches.
pub struct Xor(pub Vec<Contract>);

/// None of the contracts match.
pub struct Not(pub Vec<Contract>);

/// A sequence of any length whose elements all match.
pub struct ListOf(pub Contract);

/// `nil` or a value matching the contract.
pub struct Maybe(pub Contract);

/// An instance of exactly this class, subclasses excluded.
pub struct Exactly(pub ValueType);

/// A map or object that has every one of these entries.
pub struct RespondTo(pub Vec<String>);

impl Validator for Num {
    fn valid(&self, value: &Value) -> bool {
        value.as_f64().is_some()
    }

    fn describe(&self) -> String {
        "Num".into()
    }
}

impl Validator for Pos {
    fn valid(&self, value: &Value) -> bool {
        value.as_f64().is_some_and(|x| x > 0.0)
    }

    fn describe(&self) -> String {
        "Pos".into()
    }
}

impl Validator for Neg {
    fn valid(&self, value: &Value) -> bool {
        value.as_f64().is_some_and(|x| x < 0.0)
    }

    fn describe(&self) -> String {
        "Neg".into()
    }
}

impl Validator for Any {
    fn valid(&self, _value: &Value) -> bool {
        true
    }

    fn describe(&self) -> String {
        "Any".into()
    }
}

impl Validator for Nothing {
    fn describe(&self) -> String {
        "None".into()
    }
}

impl Validator for Bool {
    fn valid(&self, value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }

    fn describe(&self) -> String {
        "Bool".into()
    }
}

fn joined(items: &[Contract], sep: &str) -> String {
    struct Joined<'a>(&'a [Contract], &'a str);

    impl fmt::Display for Joined<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_joined(f, self.0, self.1)
        }
    }

    Joined(items, sep).to_string()
}

impl Validator for Or {
    fn valid(&self, value: &Value) -> bool {
        self.0.iter().any(|c| matches_value(c, value))
    }

    fn describe(&self) -> String {
        joined(&self.0, " or ")
    }
}

impl Validator for And {
    fn valid(&self, value: &Value) -> bool {
        self.0.iter().all(|c| matches_value(c, value))
    }

    fn describe(&self) -> String {
        joined(&self.0, " and ")
    }
}

impl Validator for Xor {
    fn valid(&self, value: &Value) -> bool {
        self.0.iter().filter(|c| matches_value(c, value)).count() == 1
    }

    fn describe(&self) -> String {
        joined(&self.0, " xor ")
    }
}

impl Validator for Not {
    fn valid(&self, value: &Value) -> bool {
        !self.0.iter().any(|c| matches_value(c, value))
    }

    fn describe(&self) -> String {
        format!("not {}", joined(&self.0, ", "))
    }
}

impl Validator for ListOf {
    fn valid(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().all(|v| matches_value(&self.0, v)),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("a list of {}", self.0)
    }
}

impl Validator for Maybe {
    fn valid(&self, value: &Value) -> bool {
        value.is_nil() || matches_value(&self.0, value)
    }

    fn describe(&self) -> String {
        format!("{} or nil", self.0)
    }
}

impl Validator for Exactly {
    fn valid(&self, value: &Value) -> bool {
        value.value_type() == self.0
    }

    fn describe(&self) -> String {
        format!("exactly {}", self.0)
    }
}

impl Validator for RespondTo {
    fn valid(&self, value: &Value) -> bool {
        matches!(value, Value::Map(_) | Value::Object { .. })
            && self.0.iter().all(|name| value.lookup(name).is_some())
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.0.iter().map(|n| format!(":{}", n)).collect();
        format!("a value that responds to [{}]", names.join(", "))
    }
}

pub fn num() -> Contract {
    Contract::validator(Num)
}

pub fn pos() -> Contract {
    Contract::validator(Pos)
}

pub fn neg() -> Contract {
    Contract::validator(Neg)
}

pub fn any() -> Contract {
    Contract::validator(Any)
}

pub fn nothing() -> Contract {
    Contract::validator(Nothing)
}

pub fn boolean() -> Contract {
    Contract::validator(Bool)
}

pub fn or(contracts: impl IntoIterator<Item = Contract>) -> Contract {
    Contract::validator(Or(contracts.into_iter().collect()))
}

pub fn and(contracts: impl IntoIterator<Item = Contract>) -> Contract {
    Contract::validator(And(contracts.into_iter().collect()))
}

pub fn xor(contracts: impl IntoIterator<Item = Contract>) -> Contract {
    Contract::validator(Xor(contracts.into_iter().collect()))
}

pub fn not(contracts: impl IntoIterator<Item = Contract>) -> Contract {
    Contract::validator(Not(contracts.into_iter().collect()))
}

pub fn list_of(contract: Contract) -> Contract {
    Contract::validator(ListOf(contract))
}

pub fn maybe(contract: Contract) -> Contract {
    Contract::validator(Maybe(contract))
}

pub fn exactly(ty: ValueType) -> Contract {
    Contract::validator(Exactly(ty))
}

pub fn respond_to<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Contract {
    Contract::validator(RespondTo(names.into_iter().map(Into::into).collect()))
}

/// Looks up a non-parameterised builtin by the name a declaration uses.
pub fn by_name(name: &str) -> Option<Contract> {
    match name {
        "Num" => Some(num()),
        "Pos" => Some(pos()),
        "Neg" => Some(neg()),
        "Any" => Some(any()),
        "None" => Some(nothing()),
        "Bool" => Some(boolean()),
        _ => None,
    }
}
