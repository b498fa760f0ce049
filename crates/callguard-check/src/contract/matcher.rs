//! Matching a value against a contract.
//!
//! Matching is total and side-effect free: a contract applied to a value
//! of the wrong shape is a non-match, never an error.

use callguard_core::Value;

use super::Contract;

/// Checks a possibly-absent value against a contract.
///
/// `None` means the argument was not supplied. Only [`Contract::Exists`]
/// distinguishes presence; every other kind fails on an absent value.
pub fn matches(contract: &Contract, value: Option<&Value>) -> bool {
    match value {
        Some(v) => matches_value(contract, v),
        None => false,
    }
}

/// Checks a supplied value against a contract.
pub fn matches_value(contract: &Contract, value: &Value) -> bool {
    match contract {
        Contract::Class(ty) => value.is_a(ty),
        Contract::Validator(v) => v.valid(value),
        Contract::Predicate(p) => p.test(value),
        Contract::ArrayOf(items) => match value {
            Value::Array(values) => {
                values.len() == items.len()
                    && items.iter().zip(values).all(|(c, v)| matches_value(c, v))
            }
            _ => false,
        },
        Contract::RecordOf(fields) => match value {
            Value::Map(entries) => fields
                .iter()
                .all(|(key, c)| entries.get(key).is_some_and(|v| matches_value(c, v))),
            _ => false,
        },
        Contract::Exists => true,
        Contract::Literal(expected) => value == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callguard_core::ValueType;
    use proptest::prelude::*;

    fn int() -> Contract {
        Contract::class(ValueType::Integer)
    }

    fn string() -> Contract {
        Contract::class(ValueType::String)
    }

    fn person() -> Contract {
        Contract::record_of([("name", string()), ("age", int())])
    }

    // -----------------------------------------------------------------------
    // Class membership
    // -----------------------------------------------------------------------

    #[test]
    fn test_class_matches_instances_and_subclasses() {
        assert!(matches_value(&int(), &Value::Int(2)));
        assert!(!matches_value(&int(), &Value::str("2")));
        assert!(matches_value(&Contract::class(ValueType::Numeric), &Value::Float(2.0)));
        assert!(matches_value(&Contract::class(ValueType::Object), &Value::Nil));
    }

    // -----------------------------------------------------------------------
    // Arrays
    // -----------------------------------------------------------------------

    #[test]
    fn test_array_of_matching_elements() {
        let c = Contract::array_of([int(), int(), int()]);
        assert!(matches_value(&c, &Value::array([1, 2, 3])));
    }

    #[test]
    fn test_array_of_too_few_items() {
        let c = Contract::array_of([int(), int(), int()]);
        assert!(!matches_value(&c, &Value::array([1, 2])));
    }

    #[test]
    fn test_array_of_too_many_items() {
        let c = Contract::array_of([int(), int()]);
        assert!(!matches_value(&c, &Value::array([1, 2, 3])));
    }

    #[test]
    fn test_array_of_one_element_wrong() {
        let c = Contract::array_of([int(), int(), int()]);
        let v = Value::array([Value::Int(1), Value::Int(2), Value::str("three")]);
        assert!(!matches_value(&c, &v));
    }

    #[test]
    fn test_array_of_rejects_non_sequences() {
        let c = Contract::array_of([int()]);
        assert!(!matches_value(&c, &Value::Int(1)));
        assert!(!matches_value(&c, &Value::map([("0", 1)])));
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    #[test]
    fn test_record_of_exact_keys() {
        let v = Value::map([("name", Value::str("calvin")), ("age", Value::Int(10))]);
        assert!(matches_value(&person(), &v));
    }

    #[test]
    fn test_record_of_ignores_extra_keys() {
        let v = Value::map([
            ("name", Value::str("calvin")),
            ("age", Value::Int(10)),
            ("foo", Value::str("bar")),
        ]);
        assert!(matches_value(&person(), &v));
    }

    #[test]
    fn test_record_of_missing_key() {
        let v = Value::map([("name", "calvin")]);
        assert!(!matches_value(&person(), &v));
    }

    #[test]
    fn test_record_of_wrong_type_on_key() {
        let v = Value::map([("name", 50), ("age", 10)]);
        assert!(!matches_value(&person(), &v));
    }

    #[test]
    fn test_record_of_rejects_non_mappings() {
        assert!(!matches_value(&person(), &Value::array([1])));
        let obj = Value::object("Person", [("name", Value::str("c")), ("age", Value::Int(1))]);
        assert!(!matches_value(&person(), &obj));
    }

    // -----------------------------------------------------------------------
    // Nesting, presence, literals
    // -----------------------------------------------------------------------

    #[test]
    fn test_nested_structures() {
        let c = Contract::record_of([(
            "matrix",
            Contract::array_of([
                Contract::array_of([int(), int()]),
                Contract::array_of([int(), int()]),
            ]),
        )]);
        let good = Value::map([(
            "matrix",
            Value::array([Value::array([1, 2]), Value::array([3, 4])]),
        )]);
        let bad = Value::map([(
            "matrix",
            Value::array([Value::array([1, 2]), Value::array([3])]),
        )]);
        assert!(matches_value(&c, &good));
        assert!(!matches_value(&c, &bad));
    }

    #[test]
    fn test_exists_checks_presence_not_truthiness() {
        assert!(matches(&Contract::Exists, Some(&Value::Nil)));
        assert!(matches(&Contract::Exists, Some(&Value::Bool(false))));
        assert!(matches(&Contract::Exists, Some(&Value::block(|_| Value::Int(4)))));
        assert!(!matches(&Contract::Exists, None));
    }

    #[test]
    fn test_absent_value_fails_every_other_kind() {
        assert!(!matches(&int(), None));
        assert!(!matches(&Contract::class(ValueType::Object), None));
        assert!(!matches(&Contract::predicate(|_| true), None));
        assert!(!matches(&Contract::literal(Value::Nil), None));
    }

    #[test]
    fn test_literal_uses_equality() {
        assert!(matches_value(&Contract::literal("on"), &Value::str("on")));
        assert!(!matches_value(&Contract::literal("on"), &Value::symbol("on")));
        assert!(!matches_value(&Contract::literal(1), &Value::Float(1.0)));
    }

    #[test]
    fn test_predicate_is_called_with_value() {
        let even = Contract::predicate(|v| matches!(v, Value::Int(i) if i % 2 == 0));
        assert!(matches_value(&even, &Value::Int(4)));
        assert!(!matches_value(&even, &Value::Int(3)));
        assert!(!matches_value(&even, &Value::str("4")));
    }

    proptest! {
        #[test]
        fn matching_is_deterministic(xs in proptest::collection::vec(any::<i64>(), 0..5), s in ".*") {
            let c = Contract::array_of(xs.iter().map(|_| int()));
            let mut v: Vec<Value> = xs.iter().map(|x| Value::Int(*x)).collect();
            let first = matches_value(&c, &Value::Array(v.clone()));
            prop_assert!(first);
            prop_assert_eq!(first, matches_value(&c, &Value::Array(v.clone())));

            v.push(Value::Str(s));
            let longer = Value::Array(v);
            let a = matches_value(&c, &longer);
            prop_assert!(!a);
            prop_assert_eq!(a, matches_value(&c, &longer));
        }
    }
}
