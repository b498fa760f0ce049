//! Class taxonomy for runtime values.
//!
//! [`ValueType`] is what a class-membership contract names. The built-in
//! categories form a shallow hierarchy rooted at `Object`:
//!
//! - `Object` is the ancestor of every type
//! - `Numeric` is the parent of `Integer` and `Float`
//! - everything else (including user classes) sits directly under `Object`

use std::fmt;

/// A class that a value can be an instance of.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Object,
    Nil,
    Bool,
    Numeric,
    Integer,
    Float,
    String,
    Symbol,
    Array,
    Hash,
    Proc,
    /// A user-defined class, identified by name.
    Class(String),
}

impl ValueType {
    /// Parses a class name, accepting the common aliases a declaration
    /// might use. Unknown names become user classes.
    pub fn from_name(name: &str) -> ValueType {
        match name {
            "Object" | "BasicObject" => ValueType::Object,
            "NilClass" | "Nil" => ValueType::Nil,
            "Boolean" | "Bool" | "TrueClass" | "FalseClass" => ValueType::Bool,
            "Numeric" => ValueType::Numeric,
            "Integer" | "Fixnum" | "Bignum" => ValueType::Integer,
            "Float" => ValueType::Float,
            "String" => ValueType::String,
            "Symbol" => ValueType::Symbol,
            "Array" => ValueType::Array,
            "Hash" | "Map" => ValueType::Hash,
            "Proc" | "Block" => ValueType::Proc,
            other => ValueType::Class(other.to_string()),
        }
    }

    /// The immediate superclass, or `None` for `Object`.
    pub fn parent(&self) -> Option<ValueType> {
        match self {
            ValueType::Object => None,
            ValueType::Integer | ValueType::Float => Some(ValueType::Numeric),
            _ => Some(ValueType::Object),
        }
    }

    /// Returns `true` if `self` is `other` or one of its descendants.
    pub fn is_subtype_of(&self, other: &ValueType) -> bool {
        let mut current = Some(self.clone());
        while let Some(ty) = current {
            if &ty == other {
                return true;
            }
            current = ty.parent();
        }
        false
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Object => "Object",
            ValueType::Nil => "NilClass",
            ValueType::Bool => "Boolean",
            ValueType::Numeric => "Numeric",
            ValueType::Integer => "Integer",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::Symbol => "Symbol",
            ValueType::Array => "Array",
            ValueType::Hash => "Hash",
            ValueType::Proc => "Proc",
            ValueType::Class(name) => name.as_str(),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(ValueType::from_name("Fixnum"), ValueType::Integer);
        assert_eq!(ValueType::from_name("Hash"), ValueType::Hash);
        assert_eq!(ValueType::from_name("Map"), ValueType::Hash);
        assert_eq!(
            ValueType::from_name("Person"),
            ValueType::Class("Person".into())
        );
    }

    #[test]
    fn display_round_trips_through_from_name() {
        for ty in [
            ValueType::Object,
            ValueType::Nil,
            ValueType::Bool,
            ValueType::Numeric,
            ValueType::Integer,
            ValueType::Float,
            ValueType::String,
            ValueType::Symbol,
            ValueType::Array,
            ValueType::Hash,
            ValueType::Proc,
            ValueType::Class("Person".into()),
        ] {
            assert_eq!(ValueType::from_name(&ty.to_string()), ty);
        }
    }

    #[test]
    fn numeric_hierarchy() {
        assert!(ValueType::Integer.is_subtype_of(&ValueType::Numeric));
        assert!(ValueType::Float.is_subtype_of(&ValueType::Numeric));
        assert!(ValueType::Integer.is_subtype_of(&ValueType::Object));
        assert!(!ValueType::Numeric.is_subtype_of(&ValueType::Integer));
        assert!(!ValueType::String.is_subtype_of(&ValueType::Numeric));
    }

    #[test]
    fn user_classes_descend_from_object_only() {
        let person = ValueType::Class("Person".into());
        assert!(person.is_subtype_of(&ValueType::Object));
        assert!(person.is_subtype_of(&person));
        assert!(!person.is_subtype_of(&ValueType::Class("Animal".into())));
    }
}
