//! Process-wide success and failure hooks.
//!
//! Every guarded call reports the outcome of each checking phase to one of
//! two global hooks. A hook's return value gates the call:
//!
//! - failure hook: `Ok(true)` tolerates the violation and the call goes on,
//!   `Ok(false)` aborts it silently, `Err(_)` aborts it with that error
//!   (the default raises a [`ContractViolation`])
//! - success hook: `Ok(true)` lets the call go on (the default),
//!   `Ok(false)` suppresses it even though every contract held
//!
//! Replacing a hook is not synchronised with calls in flight. A call reads
//! both hooks once, when it starts, and uses that pair throughout; swap
//! hooks during setup or teardown, not under live traffic.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use callguard_core::{MethodRef, Value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::spec::ContractSpec;
use crate::violation::ContractViolation;

/// Which values a match event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Arguments,
    Result,
}

/// What a hook is told about one checking phase of one call.
#[derive(Debug, Clone, Copy)]
pub struct MatchEvent<'a> {
    pub target: &'a MethodRef,
    pub spec: &'a ContractSpec,
    pub arguments: &'a [Value],
    pub phase: Phase,
    /// Whether every contract in this phase held. Stays `false` on the
    /// success event that follows a tolerated violation.
    pub matched: bool,
    /// First failing argument position (argument phase only).
    pub failing_index: Option<usize>,
    /// The contract that failed, if any.
    pub contract: Option<&'a Contract>,
    /// The offending value; `None` if it was not supplied. For the result
    /// phase this is the return value.
    pub value: Option<&'a Value>,
}

/// A replaceable outcome handler.
pub type Hook = Arc<dyn Fn(&MatchEvent<'_>) -> Result<bool, ContractViolation> + Send + Sync>;

/// Wraps a closure as a [`Hook`].
pub fn hook<F>(f: F) -> Hook
where
    F: Fn(&MatchEvent<'_>) -> Result<bool, ContractViolation> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Raises the violation described by the event.
pub fn default_failure_callback() -> Hook {
    hook(|event| Err(ContractViolation::from_event(event)))
}

/// Always lets the call proceed.
pub fn default_success_callback() -> Hook {
    hook(|_| Ok(true))
}

/// The pair of hooks one call uses.
#[derive(Clone)]
pub struct HookSet {
    pub success: Hook,
    pub failure: Hook,
}

impl Default for HookSet {
    fn default() -> Self {
        HookSet {
            success: default_success_callback(),
            failure: default_failure_callback(),
        }
    }
}

static HOOKS: Lazy<RwLock<HookSet>> = Lazy::new(|| RwLock::new(HookSet::default()));

// A hook that panicked mid-swap cannot leave the pair half-written, so a
// poisoned lock still holds a usable value.
fn read() -> RwLockReadGuard<'static, HookSet> {
    HOOKS.read().unwrap_or_else(|e| e.into_inner())
}

fn write() -> RwLockWriteGuard<'static, HookSet> {
    HOOKS.write().unwrap_or_else(|e| e.into_inner())
}

/// Both current hooks, read together.
pub fn snapshot() -> HookSet {
    read().clone()
}

pub fn failure_callback() -> Hook {
    read().failure.clone()
}

pub fn success_callback() -> Hook {
    read().success.clone()
}

/// Installs a failure hook and returns the one it replaced.
pub fn set_failure_callback(hook: Hook) -> Hook {
    std::mem::replace(&mut write().failure, hook)
}

/// Installs a success hook and returns the one it replaced.
pub fn set_success_callback(hook: Hook) -> Hook {
    std::mem::replace(&mut write().success, hook)
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Success,
    Failure,
}

/// Restores the hook it displaced when dropped.
#[must_use = "the previous hook is restored as soon as the guard is dropped"]
pub struct HookGuard {
    slot: Slot,
    previous: Option<Hook>,
}

impl HookGuard {
    /// Restores the previous hook now.
    pub fn restore(mut self) {
        self.put_back();
    }

    fn put_back(&mut self) {
        if let Some(previous) = self.previous.take() {
            match self.slot {
                Slot::Success => set_success_callback(previous),
                Slot::Failure => set_failure_callback(previous),
            };
        }
    }
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        self.put_back();
    }
}

/// Installs a failure hook until the returned guard is dropped.
pub fn override_failure_callback(hook: Hook) -> HookGuard {
    HookGuard {
        slot: Slot::Failure,
        previous: Some(set_failure_callback(hook)),
    }
}

/// Installs a success hook until the returned guard is dropped.
pub fn override_success_callback(hook: Hook) -> HookGuard {
    HookGuard {
        slot: Slot::Success,
        previous: Some(set_success_callback(hook)),
    }
}

/// Serialises tests that replace the global hooks.
#[cfg(test)]
pub(crate) fn test_serial() -> std::sync::MutexGuard<'static, ()> {
    static SERIAL: std::sync::Mutex<()> = std::sync::Mutex::new(());
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}
