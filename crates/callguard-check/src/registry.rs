//! Registration of contract specs per callable.

use std::collections::HashMap;
use std::sync::Arc;

use callguard_core::{MethodRef, Value};

use crate::config::GuardConfig;
use crate::error::DeclarationError;
use crate::interceptor::Interceptor;
use crate::spec::ContractSpec;

/// Maps callables to the spec declared for them.
///
/// Guards handed out by [`guard`](Self::guard) run with the registry's
/// [`GuardConfig`], read from the environment unless replaced.
#[derive(Debug)]
pub struct ContractRegistry {
    specs: HashMap<MethodRef, Arc<ContractSpec>>,
    config: GuardConfig,
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::with_config(GuardConfig::from_env())
    }
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GuardConfig) -> Self {
        ContractRegistry {
            specs: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> GuardConfig {
        self.config
    }

    /// Records the spec for `target`. Each callable is declared once.
    pub fn register(
        &mut self,
        target: MethodRef,
        spec: ContractSpec,
    ) -> Result<Arc<ContractSpec>, DeclarationError> {
        if self.specs.contains_key(&target) {
            return Err(DeclarationError::DuplicateRegistration { target });
        }
        tracing::debug!(method = %target, contract = %spec, "registered contract");
        let spec = Arc::new(spec);
        self.specs.insert(target, spec.clone());
        Ok(spec)
    }

    pub fn spec(&self, target: &MethodRef) -> Option<&Arc<ContractSpec>> {
        self.specs.get(target)
    }

    /// Wraps `body` with the spec registered for `target`.
    pub fn guard<F>(&self, target: MethodRef, body: F) -> Result<Interceptor, DeclarationError>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        let spec = self
            .specs
            .get(&target)
            .cloned()
            .ok_or_else(|| DeclarationError::UnknownTarget {
                target: target.clone(),
            })?;
        Ok(Interceptor::new(target, spec, body).with_config(self.config))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
