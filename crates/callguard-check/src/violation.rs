//! Contract violations raised by the default failure hook.

use callguard_core::{MethodRef, Value};

use crate::contract::Contract;
use crate::hooks::{MatchEvent, Phase};

fn expected_text(expected: &Option<Contract>) -> String {
    match expected {
        Some(c) => c.to_string(),
        None => "no further arguments".to_string(),
    }
}

fn actual_text(actual: &Option<Value>) -> String {
    match actual {
        Some(v) => v.to_string(),
        None => "<not supplied>".to_string(),
    }
}

/// Number of argument slots the call binds, absent trailing entries
/// included.
fn slot_count(event: &MatchEvent<'_>) -> usize {
    event
        .spec
        .bind(event.arguments)
        .iter()
        .map(|b| b.position + 1)
        .max()
        .unwrap_or(0)
}

/// A value that failed its declared contract.
///
/// Carries the failing position, the contract it was checked against and
/// the offending value, plus the rendered spec of the guarded callable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContractViolation {
    #[error(
        "Contract violation for argument {} of {count}:\n    Expected: {},\n    Actual: {}\n    Value guarded in: {target}\n    With Contract: {spec}",
        .index + 1,
        expected_text(.expected),
        actual_text(.actual)
    )]
    Argument {
        target: MethodRef,
        /// Zero-based argument position.
        index: usize,
        /// Number of argument slots in the call.
        count: usize,
        /// `None` for a surplus argument.
        expected: Option<Contract>,
        /// `None` when the argument was not supplied.
        actual: Option<Value>,
        spec: String,
    },

    #[error(
        "Contract violation for return value:\n    Expected: {},\n    Actual: {actual}\n    Value guarded in: {target}\n    With Contract: {spec}",
        expected_text(.expected)
    )]
    Result {
        target: MethodRef,
        expected: Option<Contract>,
        actual: Value,
        spec: String,
    },
}

impl ContractViolation {
    /// Builds the violation described by a failed match event.
    pub fn from_event(event: &MatchEvent<'_>) -> ContractViolation {
        let target = event.target.clone();
        let expected = event.contract.cloned();
        let spec = event.spec.to_string();
        match event.phase {
            Phase::Arguments => ContractViolation::Argument {
                target,
                index: event.failing_index.unwrap_or_default(),
                count: slot_count(event),
                expected,
                actual: event.value.cloned(),
                spec,
            },
            Phase::Result => ContractViolation::Result {
                target,
                expected,
                actual: event.value.cloned().unwrap_or(Value::Nil),
                spec,
            },
        }
    }

    pub fn target(&self) -> &MethodRef {
        match self {
            ContractViolation::Argument { target, .. } | ContractViolation::Result { target, .. } => {
                target
            }
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            ContractViolation::Argument { .. } => Phase::Arguments,
            ContractViolation::Result { .. } => Phase::Result,
        }
    }

    /// Failing argument position; `None` for result violations.
    pub fn index(&self) -> Option<usize> {
        match self {
            ContractViolation::Argument { index, .. } => Some(*index),
            ContractViolation::Result { .. } => None,
        }
    }
}
