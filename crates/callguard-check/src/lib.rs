//! Runtime contract enforcement for guarded calls.
//!
//! A callable declares, apart from its body, what each argument and its
//! return value must look like. Every call is checked against that
//! declaration before and after the body runs.
//!
//! # Architecture
//!
//! - [`Contract`] is a tagged union of contract kinds (class membership,
//!   validator objects, predicates, array and record shapes, presence,
//!   literals); [`matches`] evaluates one against a value.
//! - [`ContractSpec`] holds the per-parameter contracts and the result
//!   contract of one callable, validated when built.
//! - [`Interceptor`] wraps a callable with its spec and runs the checking
//!   protocol on every call.
//! - [`hooks`] holds the two process-wide outcome handlers whose answers
//!   decide whether a call proceeds.
//! - [`ContractRegistry`] records which spec belongs to which callable.
//!
//! # Usage
//!
//! ```ignore
//! let spec = ContractSpec::builder().arg(builtin::num()).returns(builtin::num()).build()?;
//! let double = Interceptor::new(MethodRef::instance("Object", "double"), spec, |args| {
//!     match args {
//!         [Value::Int(x)] => Value::Int(x * 2),
//!         _ => Value::Nil,
//!     }
//! });
//! assert_eq!(double.call(&[Value::Int(2)])?, Some(Value::Int(4)));
//! assert!(double.call(&[Value::str("bad")]).is_err());
//! ```

pub mod config;
pub mod contract;
pub mod decl;
pub mod error;
pub mod hooks;
pub mod interceptor;
pub mod registry;
pub mod spec;
pub mod violation;

pub use config::GuardConfig;
pub use contract::{builtin, matches, matches_value, Contract, Predicate, Validator};
pub use decl::{ContractDecl, ParamDecl, SpecDecl};
pub use error::DeclarationError;
pub use hooks::{Hook, HookGuard, MatchEvent, Phase};
pub use interceptor::{wrap, CallResult, Interceptor};
pub use registry::ContractRegistry;
pub use spec::{Binding, ContractSpec, ContractSpecBuilder, ParamContract, ParamKind};
pub use violation::ContractViolation;
