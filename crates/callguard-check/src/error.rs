//! Declaration-time errors.
//!
//! A malformed contract declaration is a bug in the declaring code, so
//! every [`DeclarationError`] surfaces while a spec is built or
//! registered, never while a guarded call runs.

use callguard_core::MethodRef;

use crate::spec::ParamKind;

/// Errors produced while building or registering a contract spec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("more than one variadic contract declared (entries {first} and {second})")]
    MultipleVariadic { first: usize, second: usize },

    #[error("variadic contract at entry {index} must be the final positional contract")]
    VariadicNotLast { index: usize },

    #[error("keywords contract at entry {index} must be a record contract, got {found}")]
    KeywordsNotRecord { index: usize, found: String },

    /// A keywords or block entry was followed by entries it must come after.
    #[error("{kind} contract at entry {index} is not in trailing position")]
    MisplacedTrailing { kind: ParamKind, index: usize },

    /// The callable declares a different number of parameters than there
    /// are argument contracts.
    #[error("{params} parameters declared but {contracts} argument contracts given")]
    ArityMismatch { params: usize, contracts: usize },

    #[error("contract already registered for {target}")]
    DuplicateRegistration { target: MethodRef },

    #[error("no contract registered for {target}")]
    UnknownTarget { target: MethodRef },

    #[error("unknown builtin contract '{name}'")]
    UnknownBuiltin { name: String },
}
