//! Call interception: checks arguments and results around a callable.
//!
//! An [`Interceptor`] pairs a callable with its [`ContractSpec`]. Each call
//! walks the same state machine:
//!
//! ```text
//! Idle -> ArgumentsChecking -> {ArgumentsFailed, ArgumentsOk}
//!      -> Executing -> ResultChecking -> {ResultFailed, ResultOk}
//! ```
//!
//! Each checking phase reports to the global hooks (see [`crate::hooks`]).
//! A failed phase asks the failure hook; when it tolerates the violation
//! the success hook is asked next, with the same unmatched event. Either
//! hook can stop the call, which then returns `Ok(None)`.
//!
//! The interceptor keeps no state between calls, so one instance can be
//! shared across threads and called concurrently.

use std::sync::Arc;

use callguard_core::{MethodRef, Value};

use crate::config::GuardConfig;
use crate::contract::{matches_value, Contract};
use crate::hooks::{self, HookSet, MatchEvent, Phase};
use crate::spec::ContractSpec;
use crate::violation::ContractViolation;

/// The callable behind a guard.
pub type Body = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Outcome of a guarded call. `Ok(None)` means a hook stopped the call.
pub type CallResult = Result<Option<Value>, ContractViolation>;

/// A callable wrapped with its contracts.
#[derive(Clone)]
pub struct Interceptor {
    target: MethodRef,
    spec: Arc<ContractSpec>,
    body: Body,
    config: GuardConfig,
}

impl Interceptor {
    pub fn new<F>(target: MethodRef, spec: impl Into<Arc<ContractSpec>>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Interceptor {
            target,
            spec: spec.into(),
            body: Arc::new(body),
            config: GuardConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn target(&self) -> &MethodRef {
        &self.target
    }

    pub fn spec(&self) -> &ContractSpec {
        &self.spec
    }

    pub fn config(&self) -> GuardConfig {
        self.config
    }

    /// Runs one guarded invocation.
    pub fn call(&self, args: &[Value]) -> CallResult {
        if !self.config.enabled {
            return Ok(Some((self.body)(args)));
        }

        let hooks = hooks::snapshot();
        if !self.check_arguments(&hooks, args)? {
            return Ok(None);
        }

        let result = (self.body)(args);

        match self.spec.result() {
            Some(contract) if self.config.check_results => {
                if self.check_result(&hooks, args, contract, &result)? {
                    Ok(Some(result))
                } else {
                    Ok(None)
                }
            }
            _ => Ok(Some(result)),
        }
    }

    /// Converts the guard into a plain closure with the same call shape.
    pub fn into_fn(self) -> impl Fn(&[Value]) -> CallResult + Send + Sync {
        move |args: &[Value]| self.call(args)
    }

    fn event<'a>(&'a self, args: &'a [Value], phase: Phase) -> MatchEvent<'a> {
        MatchEvent {
            target: &self.target,
            spec: &self.spec,
            arguments: args,
            phase,
            matched: true,
            failing_index: None,
            contract: None,
            value: None,
        }
    }

    fn check_arguments(&self, hooks: &HookSet, args: &[Value]) -> Result<bool, ContractViolation> {
        let bindings = self.spec.bind(args);
        let mut event = self.event(args, Phase::Arguments);

        if let Some(failed) = bindings.iter().find(|b| !b.matches()) {
            tracing::debug!(
                method = %self.target,
                index = failed.position,
                "argument does not satisfy its contract"
            );
            event = MatchEvent {
                matched: false,
                failing_index: Some(failed.position),
                contract: failed.contract,
                value: failed.value(),
                ..event
            };
            if !(hooks.failure)(&event)? {
                tracing::debug!(method = %self.target, "call aborted by failure hook");
                return Ok(false);
            }
            tracing::debug!(method = %self.target, "argument violation tolerated by failure hook");
        }

        let proceed = (hooks.success)(&event)?;
        if proceed {
            tracing::trace!(method = %self.target, "arguments accepted");
        } else {
            tracing::debug!(method = %self.target, "call suppressed by success hook");
        }
        Ok(proceed)
    }

    fn check_result(
        &self,
        hooks: &HookSet,
        args: &[Value],
        contract: &Contract,
        result: &Value,
    ) -> Result<bool, ContractViolation> {
        let event = MatchEvent {
            matched: matches_value(contract, result),
            contract: Some(contract),
            value: Some(result),
            ..self.event(args, Phase::Result)
        };

        if !event.matched {
            tracing::debug!(method = %self.target, "return value does not satisfy its contract");
            if !(hooks.failure)(&event)? {
                tracing::debug!(method = %self.target, "result discarded by failure hook");
                return Ok(false);
            }
            tracing::debug!(method = %self.target, "result violation tolerated by failure hook");
        }

        let proceed = (hooks.success)(&event)?;
        if !proceed {
            tracing::debug!(method = %self.target, "result suppressed by success hook");
        }
        Ok(proceed)
    }
}

/// Wraps `body` so every call is checked against `spec`.
pub fn wrap<F>(
    target: MethodRef,
    spec: impl Into<Arc<ContractSpec>>,
    body: F,
) -> impl Fn(&[Value]) -> CallResult + Send + Sync
where
    F: Fn(&[Value]) -> Value + Send + Sync + 'static,
{
    Interceptor::new(target, spec, body).into_fn()
}
