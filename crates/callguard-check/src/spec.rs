//! Contract specs: the argument and result contracts of one callable.
//!
//! A [`ContractSpec`] is built once, at registration time, through
//! [`ContractSpecBuilder`]. The builder enforces the declaration rules so
//! that a spec that exists is always well formed:
//!
//! - at most one variadic entry, and it must be the last positional one
//!   (only keywords or block entries may follow it)
//! - a keywords entry must be a record contract and may only be followed
//!   by a block entry
//! - a block entry must be the last entry
//! - when the callable's arity is given, it must equal the entry count
//!
//! [`ContractSpec::bind`] pairs call-time arguments with entries.

use std::borrow::Cow;
use std::fmt;

use callguard_core::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::contract::{matches, write_joined, Contract};
use crate::error::DeclarationError;

/// How a parameter entry binds call-time arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// One positional argument.
    #[default]
    Positional,
    /// Zero or more trailing positional arguments, each checked alone.
    Variadic,
    /// A trailing keyed mapping; an empty map when none is passed.
    Keywords,
    /// A trailing block argument.
    Block,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamKind::Positional => "positional",
            ParamKind::Variadic => "variadic",
            ParamKind::Keywords => "keywords",
            ParamKind::Block => "block",
        })
    }
}

/// One declared parameter contract.
#[derive(Debug, Clone)]
pub struct ParamContract {
    pub contract: Contract,
    pub kind: ParamKind,
}

impl fmt::Display for ParamContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamKind::Positional | ParamKind::Keywords => write!(f, "{}", self.contract),
            ParamKind::Variadic => write!(f, "{}...", self.contract),
            ParamKind::Block => write!(f, "&{}", self.contract),
        }
    }
}

/// The full set of contracts for one callable.
#[derive(Debug, Clone)]
pub struct ContractSpec {
    params: Vec<ParamContract>,
    result: Option<Contract>,
}

/// One call-time argument paired with the contract it must satisfy.
#[derive(Debug)]
pub struct Binding<'a> {
    /// Argument position in the call.
    pub position: usize,
    /// `None` for a surplus argument that no entry accepts.
    pub contract: Option<&'a Contract>,
    /// `None` when the argument was not supplied.
    pub value: Option<Cow<'a, Value>>,
}

impl Binding<'_> {
    pub fn value(&self) -> Option<&Value> {
        self.value.as_deref()
    }

    pub fn matches(&self) -> bool {
        self.contract.is_some_and(|c| matches(c, self.value()))
    }
}

impl ContractSpec {
    pub fn builder() -> ContractSpecBuilder {
        ContractSpecBuilder::default()
    }

    pub fn params(&self) -> &[ParamContract] {
        &self.params
    }

    pub fn result(&self) -> Option<&Contract> {
        self.result.as_ref()
    }

    fn trailing(&self, kind: ParamKind) -> Option<&Contract> {
        self.params
            .iter()
            .rev()
            .take(2)
            .find(|p| p.kind == kind)
            .map(|p| &p.contract)
    }

    /// Binds call-time arguments to entries, in declared order: positional
    /// entries, variadic items, keywords, block, then any surplus.
    pub fn bind<'a>(&'a self, args: &'a [Value]) -> Vec<Binding<'a>> {
        let mut rest = args;
        let mut bindings = Vec::with_capacity(self.params.len().max(args.len()));

        let block = self.trailing(ParamKind::Block).map(|contract| {
            let current: &'a [Value] = rest;
            match current.split_last() {
                Some((last, init)) if matches!(last, Value::Block(_)) => {
                    rest = init;
                    (init.len(), contract, Some(Cow::Borrowed(last)))
                }
                _ => (args.len(), contract, None),
            }
        });

        let positional: Vec<&Contract> = self
            .params
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
            .map(|p| &p.contract)
            .collect();

        let keywords = self.trailing(ParamKind::Keywords).map(|contract| {
            let current: &'a [Value] = rest;
            match current.split_last() {
                Some((last, init))
                    if matches!(last, Value::Map(_)) && current.len() > positional.len() =>
                {
                    rest = init;
                    (init.len(), contract, Cow::Borrowed(last))
                }
                _ => (current.len(), contract, Cow::Owned(Value::Map(IndexMap::new()))),
            }
        });

        for (i, contract) in positional.iter().enumerate() {
            bindings.push(Binding {
                position: i,
                contract: Some(*contract),
                value: rest.get(i).map(Cow::Borrowed),
            });
        }

        let variadic = self
            .params
            .iter()
            .find(|p| p.kind == ParamKind::Variadic)
            .map(|p| &p.contract);
        for (offset, value) in rest.iter().enumerate().skip(positional.len()) {
            bindings.push(Binding {
                position: offset,
                contract: variadic,
                value: Some(Cow::Borrowed(value)),
            });
        }

        if let Some((position, contract, value)) = keywords {
            bindings.push(Binding {
                position,
                contract: Some(contract),
                value: Some(value),
            });
        }
        if let Some((position, contract, value)) = block {
            bindings.push(Binding {
                position,
                contract: Some(contract),
                value,
            });
        }

        // Surplus arguments without a variadic entry sort after everything
        // that was declared.
        bindings.sort_by_key(|b| b.contract.is_none());
        bindings
    }
}

impl fmt::Display for ContractSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() && self.result.is_some() {
            f.write_str("()")?;
        } else {
            write_joined(f, &self.params, ", ")?;
        }
        if let Some(result) = &self.result {
            write!(f, " => {}", result)?;
        }
        Ok(())
    }
}

/// Collects parameter contracts and validates them in [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct ContractSpecBuilder {
    params: Vec<ParamContract>,
    result: Option<Contract>,
    arity: Option<usize>,
}

impl ContractSpecBuilder {
    pub fn param(mut self, kind: ParamKind, contract: Contract) -> Self {
        self.params.push(ParamContract { contract, kind });
        self
    }

    pub fn arg(self, contract: Contract) -> Self {
        self.param(ParamKind::Positional, contract)
    }

    pub fn variadic(self, contract: Contract) -> Self {
        self.param(ParamKind::Variadic, contract)
    }

    pub fn keywords(self, contract: Contract) -> Self {
        self.param(ParamKind::Keywords, contract)
    }

    pub fn block(self, contract: Contract) -> Self {
        self.param(ParamKind::Block, contract)
    }

    pub fn returns(mut self, contract: Contract) -> Self {
        self.result = Some(contract);
        self
    }

    /// Number of parameters the guarded callable declares.
    pub fn arity(mut self, params: usize) -> Self {
        self.arity = Some(params);
        self
    }

    pub fn build(self) -> Result<ContractSpec, DeclarationError> {
        let variadic: Vec<usize> = self
            .params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.kind == ParamKind::Variadic)
            .map(|(i, _)| i)
            .collect();
        if let [first, second, ..] = variadic.as_slice() {
            return Err(DeclarationError::MultipleVariadic {
                first: *first,
                second: *second,
            });
        }

        let last = self.params.len().saturating_sub(1);
        for (index, p) in self.params.iter().enumerate() {
            match p.kind {
                ParamKind::Positional => {}
                ParamKind::Variadic => {
                    let positional_after = self.params[index + 1..]
                        .iter()
                        .any(|next| next.kind == ParamKind::Positional);
                    if positional_after {
                        return Err(DeclarationError::VariadicNotLast { index });
                    }
                }
                ParamKind::Keywords => {
                    if !matches!(p.contract, Contract::RecordOf(_)) {
                        return Err(DeclarationError::KeywordsNotRecord {
                            index,
                            found: p.contract.kind_name().to_string(),
                        });
                    }
                    let followed_by_block_only = self.params[index + 1..]
                        .iter()
                        .all(|next| next.kind == ParamKind::Block);
                    if index + 2 < self.params.len() || !followed_by_block_only {
                        return Err(DeclarationError::MisplacedTrailing {
                            kind: ParamKind::Keywords,
                            index,
                        });
                    }
                }
                ParamKind::Block if index != last => {
                    return Err(DeclarationError::MisplacedTrailing {
                        kind: ParamKind::Block,
                        index,
                    });
                }
                ParamKind::Block => {}
            }
        }

        if let Some(params) = self.arity {
            if params != self.params.len() {
                return Err(DeclarationError::ArityMismatch {
                    params,
                    contracts: self.params.len(),
                });
            }
        }

        Ok(ContractSpec {
            params: self.params,
            result: self.result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::builtin::num;
    use callguard_core::ValueType;

    fn int() -> Contract {
        Contract::class(ValueType::Integer)
    }

    fn person() -> Contract {
        Contract::record_of([("name", Contract::class(ValueType::String))])
    }

    fn outcome(spec: &ContractSpec, args: &[Value]) -> Vec<(usize, bool)> {
        spec.bind(args)
            .iter()
            .map(|b| (b.position, b.matches()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Declaration rules
    // -----------------------------------------------------------------------

    #[test]
    fn test_two_variadic_entries_rejected() {
        let err = ContractSpec::builder()
            .variadic(int())
            .variadic(int())
            .build()
            .unwrap_err();
        assert_eq!(err, DeclarationError::MultipleVariadic { first: 0, second: 1 });
    }

    #[test]
    fn test_variadic_must_be_last() {
        let err = ContractSpec::builder()
            .variadic(int())
            .arg(int())
            .build()
            .unwrap_err();
        assert_eq!(err, DeclarationError::VariadicNotLast { index: 0 });
    }

    #[test]
    fn test_variadic_may_precede_block() {
        let spec = ContractSpec::builder()
            .variadic(num())
            .block(Contract::Exists)
            .build()
            .unwrap();
        let args = [Value::Int(1), Value::Int(2), Value::block(|_| Value::Nil)];
        assert_eq!(outcome(&spec, &args), vec![(0, true), (1, true), (2, true)]);
        assert_eq!(
            outcome(&spec, &[Value::Int(1), Value::str("bad")]),
            vec![(0, true), (1, false), (2, false)]
        );
    }

    #[test]
    fn test_keywords_must_be_record() {
        let err = ContractSpec::builder().keywords(int()).build().unwrap_err();
        assert!(matches!(err, DeclarationError::KeywordsNotRecord { index: 0, .. }));
    }

    #[test]
    fn test_keywords_may_precede_block_only() {
        assert!(ContractSpec::builder()
            .arg(int())
            .keywords(person())
            .block(Contract::Exists)
            .build()
            .is_ok());
        let err = ContractSpec::builder()
            .keywords(person())
            .arg(int())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DeclarationError::MisplacedTrailing { kind: ParamKind::Keywords, index: 0 }
        );
    }

    #[test]
    fn test_block_must_be_last() {
        let err = ContractSpec::builder()
            .block(Contract::Exists)
            .arg(int())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DeclarationError::MisplacedTrailing { kind: ParamKind::Block, index: 0 }
        );
    }

    #[test]
    fn test_arity_mismatch_is_a_declaration_error() {
        let err = ContractSpec::builder()
            .returns(num())
            .arity(1)
            .build()
            .unwrap_err();
        assert_eq!(err, DeclarationError::ArityMismatch { params: 1, contracts: 0 });
    }

    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    #[test]
    fn test_missing_positional_is_absent() {
        let spec = ContractSpec::builder().arg(int()).arg(int()).build().unwrap();
        let bindings = spec.bind(&[Value::Int(1)]);
        assert_eq!(bindings.len(), 2);
        assert!(bindings[0].matches());
        assert!(bindings[1].value().is_none());
        assert!(!bindings[1].matches());
    }

    #[test]
    fn test_variadic_items_checked_individually() {
        let spec = ContractSpec::builder().variadic(num()).build().unwrap();
        assert_eq!(
            outcome(&spec, &[Value::Int(1), Value::Int(2), Value::Int(3)]),
            vec![(0, true), (1, true), (2, true)]
        );
        assert_eq!(
            outcome(&spec, &[Value::Int(1), Value::Int(2), Value::str("bad")]),
            vec![(0, true), (1, true), (2, false)]
        );
        assert!(spec.bind(&[]).is_empty());
    }

    #[test]
    fn test_variadic_after_positional() {
        let spec = ContractSpec::builder()
            .arg(Contract::class(ValueType::String))
            .variadic(int())
            .build()
            .unwrap();
        assert_eq!(
            outcome(&spec, &[Value::str("x"), Value::Int(1), Value::Int(2)]),
            vec![(0, true), (1, true), (2, true)]
        );
    }

    #[test]
    fn test_surplus_arguments_fail_without_variadic() {
        let spec = ContractSpec::builder().arg(int()).build().unwrap();
        let bindings = spec.bind(&[Value::Int(1), Value::Int(2)]);
        assert_eq!(bindings.len(), 2);
        assert!(bindings[0].matches());
        assert_eq!(bindings[1].position, 1);
        assert!(bindings[1].contract.is_none());
        assert!(!bindings[1].matches());
    }

    #[test]
    fn test_keywords_bind_trailing_map() {
        let spec = ContractSpec::builder()
            .arg(int())
            .keywords(person())
            .build()
            .unwrap();
        let args = [Value::Int(1), Value::map([("name", "calvin")])];
        assert_eq!(outcome(&spec, &args), vec![(0, true), (1, true)]);
    }

    #[test]
    fn test_keywords_default_to_empty_map() {
        let spec = ContractSpec::builder()
            .arg(int())
            .keywords(person())
            .build()
            .unwrap();
        let bindings = spec.bind(&[Value::Int(1)]);
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[1].value(), Some(&Value::Map(IndexMap::new())));
        assert!(!bindings[1].matches());

        let optional = ContractSpec::builder()
            .keywords(Contract::record_of(Vec::<(String, Contract)>::new()))
            .build()
            .unwrap();
        assert_eq!(outcome(&optional, &[]), vec![(0, true)]);
    }

    #[test]
    fn test_block_binds_trailing_block_only() {
        let spec = ContractSpec::builder().block(Contract::Exists).build().unwrap();
        assert_eq!(outcome(&spec, &[Value::block(|_| Value::Nil)]), vec![(0, true)]);
        assert_eq!(outcome(&spec, &[]), vec![(0, false)]);

        // A non-block trailing argument is surplus; the block stays absent.
        let bindings = spec.bind(&[Value::Int(4)]);
        assert_eq!(bindings.len(), 2);
        assert!(!bindings[0].matches());
        assert!(bindings[1].contract.is_none());
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    #[test]
    fn test_display() {
        let spec = ContractSpec::builder()
            .arg(num())
            .variadic(int())
            .returns(num())
            .build()
            .unwrap();
        insta::assert_snapshot!(spec.to_string(), @"Num, Integer... => Num");

        let block = ContractSpec::builder()
            .keywords(person())
            .block(Contract::Exists)
            .build()
            .unwrap();
        insta::assert_snapshot!(block.to_string(), @"{name: String}, &Exists");

        let nullary = ContractSpec::builder().returns(num()).build().unwrap();
        assert_eq!(nullary.to_string(), "() => Num");
    }
}
