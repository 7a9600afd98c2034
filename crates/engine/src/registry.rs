// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service registration table
//!
//! An explicit mapping from `(service, method)` to an ordered list of
//! invocable overloads, populated during startup. The dispatcher only
//! ever reads it.

use crate::context::CallContext;
use crate::error::BuildError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use teller_core::store::Entity;
use teller_core::RawError;
use thiserror::Error;

/// Raw arguments of an inbound call, keyed by parameter name
pub type RawArgs = Map<String, Value>;

/// Boxed method implementation
pub type Handler = Box<dyn Fn(&mut CallContext, Args) -> Result<Value, RawError> + Send + Sync>;

/// Whether a method runs inside the implicit per-call transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionMode {
    /// Open the main scope on call entry (the default)
    #[default]
    Implicit,
    /// No main scope; the method may still open explicit scopes
    Disabled,
}

/// Declares one parameter of a method overload
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    required: bool,
    default: Option<Value>,
    entity_kind: Option<String>,
    sensitive: bool,
}

impl ParamSpec {
    /// A required value parameter
    pub fn required(name: impl Into<String>) -> ParamSpec {
        ParamSpec {
            name: name.into(),
            required: true,
            default: None,
            entity_kind: None,
            sensitive: false,
        }
    }

    /// An optional parameter with a default used when no argument binds
    pub fn optional(name: impl Into<String>, default: Value) -> ParamSpec {
        ParamSpec {
            name: name.into(),
            required: false,
            default: Some(default),
            entity_kind: None,
            sensitive: false,
        }
    }

    /// A required parameter resolved by identity to a persistence-backed
    /// entity of `kind` before the method is invoked
    pub fn entity(name: impl Into<String>, kind: impl Into<String>) -> ParamSpec {
        ParamSpec {
            name: name.into(),
            required: true,
            default: None,
            entity_kind: Some(kind.into()),
            sensitive: false,
        }
    }

    /// Suppress argument-value logging for calls binding this parameter
    pub fn sensitive(mut self) -> ParamSpec {
        self.sensitive = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn entity_kind(&self) -> Option<&str> {
        self.entity_kind.as_deref()
    }

    pub(crate) fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Errors reading bound arguments.
///
/// Binding guarantees required parameters are present, so hitting one of
/// these indicates a defect in the method body; it classifies as an
/// unhandled fault.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("argument \"{0}\" is not bound")]
    Missing(String),
    #[error("argument \"{name}\" is not a {expected}")]
    WrongType { name: String, expected: &'static str },
}

/// Arguments bound to a selected overload: values plus entities resolved
/// by identity
#[derive(Debug)]
pub struct Args {
    values: Map<String, Value>,
    entities: HashMap<String, Entity>,
}

impl Args {
    pub(crate) fn new(values: Map<String, Value>, entities: HashMap<String, Entity>) -> Args {
        Args { values, entities }
    }

    /// Raw bound value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Entity resolved for an entity-typed parameter
    pub fn entity(&self, name: &str) -> Result<&Entity, ArgsError> {
        self.entities
            .get(name)
            .ok_or_else(|| ArgsError::Missing(name.to_string()))
    }

    pub fn str(&self, name: &str) -> Result<&str, ArgsError> {
        self.value(name)?.as_str().ok_or(ArgsError::WrongType {
            name: name.to_string(),
            expected: "string",
        })
    }

    pub fn i64(&self, name: &str) -> Result<i64, ArgsError> {
        self.value(name)?.as_i64().ok_or(ArgsError::WrongType {
            name: name.to_string(),
            expected: "integer",
        })
    }

    pub fn f64(&self, name: &str) -> Result<f64, ArgsError> {
        self.value(name)?.as_f64().ok_or(ArgsError::WrongType {
            name: name.to_string(),
            expected: "number",
        })
    }

    pub fn bool(&self, name: &str) -> Result<bool, ArgsError> {
        self.value(name)?.as_bool().ok_or(ArgsError::WrongType {
            name: name.to_string(),
            expected: "boolean",
        })
    }

    fn value(&self, name: &str) -> Result<&Value, ArgsError> {
        self.values
            .get(name)
            .ok_or_else(|| ArgsError::Missing(name.to_string()))
    }
}

/// One invocable overload of a service method
pub struct MethodBinding {
    params: Vec<ParamSpec>,
    mode: TransactionMode,
    handler: Handler,
}

impl MethodBinding {
    pub fn new(
        params: Vec<ParamSpec>,
        handler: impl Fn(&mut CallContext, Args) -> Result<Value, RawError> + Send + Sync + 'static,
    ) -> MethodBinding {
        MethodBinding {
            params,
            mode: TransactionMode::Implicit,
            handler: Box::new(handler),
        }
    }

    /// Opt out of the implicit per-call transaction
    pub fn without_transaction(mut self) -> MethodBinding {
        self.mode = TransactionMode::Disabled;
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn mode(&self) -> TransactionMode {
        self.mode
    }

    /// Any sensitive parameter marks the whole binding sensitive
    pub fn is_sensitive(&self) -> bool {
        self.params.iter().any(ParamSpec::is_sensitive)
    }

    pub(crate) fn invoke(&self, ctx: &mut CallContext, args: Args) -> Result<Value, RawError> {
        (self.handler)(ctx, args)
    }

    /// Sorted parameter names; two overloads with equal signatures are
    /// indistinguishable to the binder
    fn signature(&self) -> Vec<String> {
        let mut names: Vec<String> = self.params.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }
}

/// Explicit registration table: service -> method -> ordered overloads
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<String, HashMap<String, Vec<MethodBinding>>>,
}

impl ServiceRegistry {
    pub fn new() -> ServiceRegistry {
        ServiceRegistry::default()
    }

    /// Register an overload.
    ///
    /// Declaration order is registration order and breaks
    /// overload-selection ties. Fails fast on duplicate signatures and
    /// on entity parameters in transaction-disabled methods.
    pub fn register(
        &mut self,
        service: &str,
        method: &str,
        binding: MethodBinding,
    ) -> Result<(), BuildError> {
        if binding.mode() == TransactionMode::Disabled {
            if let Some(param) = binding.params().iter().find(|p| p.entity_kind().is_some()) {
                return Err(BuildError::EntityParamWithoutTransaction {
                    service: service.to_string(),
                    method: method.to_string(),
                    param: param.name().to_string(),
                });
            }
        }
        let overloads = self
            .services
            .entry(service.to_string())
            .or_default()
            .entry(method.to_string())
            .or_default();
        let signature = binding.signature();
        if overloads.iter().any(|b| b.signature() == signature) {
            return Err(BuildError::AmbiguousOverload {
                service: service.to_string(),
                method: method.to_string(),
                signature,
            });
        }
        overloads.push(binding);
        Ok(())
    }

    pub(crate) fn overloads(&self, service: &str, method: &str) -> Option<&[MethodBinding]> {
        self.services.get(service)?.get(method).map(Vec::as_slice)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
