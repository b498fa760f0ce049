//! Serialisable contract declarations.
//!
//! [`ContractDecl`] and [`SpecDecl`] describe every contract kind that does
//! not need a closure, so specs can be written as JSON:
//!
//! ```json
//! {
//!   "target": {"owner": "Object", "name": "person"},
//!   "args": [{"contract": {"record_of": {"name": {"class": "String"}}}}],
//!   "returns": {"builtin": "Any"}
//! }
//! ```
//!
//! Conversion goes through [`ContractSpecBuilder`], so a malformed
//! declaration fails with the same [`DeclarationError`] as one built in
//! code.

use callguard_core::{MethodRef, Value, ValueType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::contract::{builtin, Contract};
use crate::error::DeclarationError;
use crate::spec::{ContractSpec, ContractSpecBuilder, ParamKind};

/// A contract in declaration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractDecl {
    /// Class name, e.g. `"Integer"` or a user class.
    Class(String),
    ArrayOf(Vec<ContractDecl>),
    RecordOf(IndexMap<String, ContractDecl>),
    Exists,
    Literal(serde_json::Value),
    /// A plain builtin validator by name (`Num`, `Pos`, `Neg`, `Any`,
    /// `None`, `Bool`).
    Builtin(String),
    Or(Vec<ContractDecl>),
    And(Vec<ContractDecl>),
    Xor(Vec<ContractDecl>),
    Not(Vec<ContractDecl>),
    Maybe(Box<ContractDecl>),
    ListOf(Box<ContractDecl>),
    Exactly(String),
    RespondTo(Vec<String>),
}

fn all(decls: &[ContractDecl]) -> Result<Vec<Contract>, DeclarationError> {
    decls.iter().map(ContractDecl::to_contract).collect()
}

impl ContractDecl {
    pub fn to_contract(&self) -> Result<Contract, DeclarationError> {
        Ok(match self {
            ContractDecl::Class(name) => Contract::class(ValueType::from_name(name)),
            ContractDecl::ArrayOf(items) => Contract::ArrayOf(all(items)?),
            ContractDecl::RecordOf(fields) => Contract::RecordOf(
                fields
                    .iter()
                    .map(|(k, d)| Ok((k.clone(), d.to_contract()?)))
                    .collect::<Result<_, DeclarationError>>()?,
            ),
            ContractDecl::Exists => Contract::Exists,
            ContractDecl::Literal(json) => Contract::Literal(Value::from_json(json)),
            ContractDecl::Builtin(name) => builtin::by_name(name)
                .ok_or_else(|| DeclarationError::UnknownBuiltin { name: name.clone() })?,
            ContractDecl::Or(items) => builtin::or(all(items)?),
            ContractDecl::And(items) => builtin::and(all(items)?),
            ContractDecl::Xor(items) => builtin::xor(all(items)?),
            ContractDecl::Not(items) => builtin::not(all(items)?),
            ContractDecl::Maybe(inner) => builtin::maybe(inner.to_contract()?),
            ContractDecl::ListOf(inner) => builtin::list_of(inner.to_contract()?),
            ContractDecl::Exactly(name) => builtin::exactly(ValueType::from_name(name)),
            ContractDecl::RespondTo(names) => builtin::respond_to(names.iter().cloned()),
        })
    }
}

/// One parameter in declaration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub contract: ContractDecl,
    #[serde(default)]
    pub kind: ParamKind,
}

/// A whole spec in declaration form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecDecl {
    #[serde(default)]
    pub target: Option<MethodRef>,
    #[serde(default)]
    pub args: Vec<ParamDecl>,
    #[serde(default)]
    pub returns: Option<ContractDecl>,
    /// Parameter count of the declared callable, when known.
    #[serde(default)]
    pub arity: Option<usize>,
}

impl SpecDecl {
    pub fn to_spec(&self) -> Result<ContractSpec, DeclarationError> {
        let mut builder = ContractSpecBuilder::default();
        for param in &self.args {
            builder = builder.param(param.kind, param.contract.to_contract()?);
        }
        if let Some(returns) = &self.returns {
            builder = builder.returns(returns.to_contract()?);
        }
        if let Some(arity) = self.arity {
            builder = builder.arity(arity);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::matches_value;
    use serde_json::json;

    fn decl(json: serde_json::Value) -> ContractDecl {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn parses_every_shape() {
        let c = decl(json!({"record_of": {
            "name": {"class": "String"},
            "tags": {"list_of": {"class": "Symbol"}},
            "age": {"or": [{"builtin": "Pos"}, {"literal": null}]},
            "pair": {"array_of": [{"builtin": "Num"}, "exists"]}
        }}))
        .to_contract()
        .unwrap();

        let good = Value::map([
            ("name", Value::str("calvin")),
            ("tags", Value::array([Value::symbol("a")])),
            ("age", Value::Nil),
            ("pair", Value::array([Value::Int(1), Value::Nil])),
        ]);
        assert!(matches_value(&c, &good));
        let rendered = c.to_string();
        for part in [
            "name: String",
            "tags: a list of Symbol",
            "age: Pos or nil",
            "pair: [Num, Exists]",
        ] {
            assert!(rendered.contains(part), "{} missing from {}", part, rendered);
        }

        let missing_tags = Value::map([("name", "calvin")]);
        assert!(!matches_value(&c, &missing_tags));
    }

    #[test]
    fn unknown_builtin_is_a_declaration_error() {
        let err = decl(json!({"maybe": {"builtin": "Even"}}))
            .to_contract()
            .unwrap_err();
        assert_eq!(err, DeclarationError::UnknownBuiltin { name: "Even".into() });
    }

    #[test]
    fn spec_decl_builds_through_builder() {
        let spec: SpecDecl = serde_json::from_value(json!({
            "target": {"owner": "Object", "name": "sum"},
            "args": [{"contract": {"builtin": "Num"}, "kind": "variadic"}],
            "returns": {"builtin": "Num"}
        }))
        .unwrap();
        assert_eq!(spec.target, Some(MethodRef::instance("Object", "sum")));
        let spec = spec.to_spec().unwrap();
        assert_eq!(spec.to_string(), "Num... => Num");
    }

    #[test]
    fn spec_decl_surfaces_declaration_errors() {
        let spec: SpecDecl = serde_json::from_value(json!({
            "args": [
                {"contract": {"builtin": "Num"}, "kind": "variadic"},
                {"contract": {"builtin": "Num"}}
            ]
        }))
        .unwrap();
        assert_eq!(
            spec.to_spec().unwrap_err(),
            DeclarationError::VariadicNotLast { index: 0 }
        );

        let arity: SpecDecl = serde_json::from_value(json!({
            "returns": {"builtin": "Num"},
            "arity": 1
        }))
        .unwrap();
        assert_eq!(
            arity.to_spec().unwrap_err(),
            DeclarationError::ArityMismatch { params: 1, contracts: 0 }
        );
    }
}
