// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call dispatcher: resolve, invoke, finalize, classify

use crate::config::EngineConfig;
use crate::context::CallContext;
use crate::coordinator::TransactionCoordinator;
use crate::registry::{Args, ArgsError, MethodBinding, RawArgs, ServiceRegistry, TransactionMode};
use serde_json::Map;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use teller_core::classify::Classifier;
use teller_core::localize::{render, Localizer, StaticCatalog};
use teller_core::status::{Fault, ResponseStatus};
use teller_core::store::Store;
use teller_core::{builtin, RawError};

/// An inbound call descriptor
#[derive(Debug, Clone)]
pub struct Call {
    pub service: String,
    pub method: String,
    pub args: RawArgs,
    /// Suppress argument logging regardless of parameter flags
    pub sensitive: bool,
}

impl Call {
    pub fn new(service: impl Into<String>, method: impl Into<String>, args: RawArgs) -> Call {
        Call {
            service: service.into(),
            method: method.into(),
            args,
            sensitive: false,
        }
    }

    /// Mark the call sensitive
    pub fn sensitive(mut self) -> Call {
        self.sensitive = true;
        self
    }
}

/// The structured result of one dispatched call
#[derive(Debug, Clone)]
pub struct Response {
    /// Unique id assigned to the call
    pub call_id: String,
    /// Success or fault
    pub status: ResponseStatus,
    /// Information/warning statuses attached by the method; surfaced
    /// out-of-band (headers) next to a successful body
    pub notices: Vec<ResponseStatus>,
    /// Localized fault message, when one resolves
    pub message: Option<String>,
    /// HTTP rendering of the status for transport collaborators
    pub http_status: u16,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn code(&self) -> teller_core::ResultCode {
        self.status.code()
    }
}

/// Assembles a dispatcher during startup
pub struct DispatcherBuilder {
    services: ServiceRegistry,
    classifier: Classifier,
    store: Arc<dyn Store>,
    localizer: Arc<dyn Localizer>,
    config: EngineConfig,
}

impl DispatcherBuilder {
    pub fn new(store: Arc<dyn Store>) -> DispatcherBuilder {
        DispatcherBuilder {
            services: ServiceRegistry::new(),
            classifier: Classifier::new(),
            store,
            localizer: Arc::new(StaticCatalog::new()),
            config: EngineConfig::default(),
        }
    }

    /// Install the registration table
    pub fn services(mut self, services: ServiceRegistry) -> DispatcherBuilder {
        self.services = services;
        self
    }

    /// Replace the classifier chain
    pub fn classifier(mut self, classifier: Classifier) -> DispatcherBuilder {
        self.classifier = classifier;
        self
    }

    /// Install a message catalog
    pub fn localizer(mut self, localizer: Arc<dyn Localizer>) -> DispatcherBuilder {
        self.localizer = localizer;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> DispatcherBuilder {
        self.config = config;
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            services: self.services,
            classifier: self.classifier,
            store: self.store,
            localizer: self.localizer,
            config: self.config,
        }
    }
}

/// Drives the resolve, invoke, commit/rollback, classify pipeline.
///
/// Holds only state that is read-only after startup; `dispatch` takes
/// `&self` and is safe to call from many threads at once. All
/// call-local state lives in a [`CallContext`] created per call.
pub struct Dispatcher {
    services: ServiceRegistry,
    classifier: Classifier,
    store: Arc<dyn Store>,
    localizer: Arc<dyn Localizer>,
    config: EngineConfig,
}

impl Dispatcher {
    pub fn builder(store: Arc<dyn Store>) -> DispatcherBuilder {
        DispatcherBuilder::new(store)
    }

    /// Execute one inbound call end to end.
    ///
    /// Never fails: every outcome, including engine-internal faults,
    /// becomes a response status.
    pub fn dispatch(&self, call: Call) -> Response {
        let call_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "call",
            id = %call_id,
            service = %call.service,
            method = %call.method
        );
        let _guard = span.enter();

        self.log_arguments(&call);

        let start = Instant::now();
        let response = self.dispatch_inner(&call_id, call);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &response.status {
            ResponseStatus::Fault(fault) if fault.is_handled() => {
                tracing::warn!(code = fault.code().value(), elapsed_ms, "handled fault");
            }
            ResponseStatus::Fault(fault) => {
                tracing::error!(code = fault.code().value(), elapsed_ms, "unhandled fault");
            }
            _ => {
                tracing::info!(
                    code = response.code().value(),
                    notices = response.notices.len(),
                    elapsed_ms,
                    "completed"
                );
            }
        }

        response
    }

    fn dispatch_inner(&self, call_id: &str, call: Call) -> Response {
        let Some(overloads) = self.services.overloads(&call.service, &call.method) else {
            let target = format!("{}.{}", call.service, call.method);
            return self.fault_response(call_id, builtin::not_implemented(&target).into_fault());
        };
        let Some(binding) = select_overload(overloads, &call.args) else {
            // no overload can bind the supplied arguments
            let target = format!("{}.{}", call.service, call.method);
            return self.fault_response(call_id, builtin::not_implemented(&target).into_fault());
        };

        let mut tx =
            TransactionCoordinator::new(Arc::clone(&self.store), self.config.max_carried_objects);
        let opened = match binding.mode() {
            TransactionMode::Implicit => tx.begin_main(),
            TransactionMode::Disabled => tx.skip_main(),
        };
        if let Err(err) = opened {
            return self.faulted(call_id, Box::new(err));
        }

        let mut ctx = CallContext::new(call_id.to_string(), tx);
        let invoked = bind_args(binding, &call.args, &mut ctx)
            .and_then(|args| binding.invoke(&mut ctx, args));

        match invoked {
            Ok(body) => match ctx.coordinator().finish_success() {
                Ok(()) => {
                    let notices = ctx.take_notices();
                    Response {
                        call_id: call_id.to_string(),
                        status: ResponseStatus::Success { body },
                        notices,
                        message: None,
                        http_status: 200,
                    }
                }
                Err(err) => self.faulted(call_id, Box::new(err)),
            },
            Err(err) => {
                if let Err(close_err) = ctx.coordinator().finish_fault() {
                    tracing::warn!(error = %close_err, "rollback failed");
                }
                self.faulted(call_id, err)
            }
        }
    }

    fn faulted(&self, call_id: &str, raw: RawError) -> Response {
        self.fault_response(call_id, self.classifier.classify(raw))
    }

    fn fault_response(&self, call_id: &str, fault: Fault) -> Response {
        let http_status = fault.http_status();
        let status = ResponseStatus::Fault(fault);
        let message = render(self.localizer.as_ref(), &status);
        Response {
            call_id: call_id.to_string(),
            status,
            notices: Vec::new(),
            message,
            http_status,
        }
    }

    fn log_arguments(&self, call: &Call) {
        if !self.config.log_arguments {
            return;
        }
        let sensitive = call.sensitive || self.target_sensitive(call);
        if sensitive {
            let names: Vec<&str> = call.args.keys().map(String::as_str).collect();
            tracing::debug!(args = ?names, "arguments (values suppressed)");
        } else {
            tracing::debug!(args = ?call.args, "arguments");
        }
    }

    /// Any sensitive overload suppresses values for the whole target,
    /// before selection has happened
    fn target_sensitive(&self, call: &Call) -> bool {
        self.services
            .overloads(&call.service, &call.method)
            .is_some_and(|overloads| overloads.iter().any(MethodBinding::is_sensitive))
    }
}

/// Select the overload binding the most supplied arguments.
///
/// An overload is eligible when every required parameter has an argument
/// and every unmatched parameter has a default. Ties break to the first
/// declared. Structural ambiguity is rejected at registration time, so
/// selection is deterministic here.
fn select_overload<'a>(overloads: &'a [MethodBinding], args: &RawArgs) -> Option<&'a MethodBinding> {
    let mut best: Option<(&MethodBinding, usize)> = None;
    for binding in overloads {
        let Some(consumed) = consumed_args(binding, args) else {
            continue;
        };
        match best {
            Some((_, best_consumed)) if consumed <= best_consumed => {}
            _ => best = Some((binding, consumed)),
        }
    }
    best.map(|(binding, _)| binding)
}

/// How many supplied arguments this overload would consume, or `None`
/// when it is not eligible
fn consumed_args(binding: &MethodBinding, args: &RawArgs) -> Option<usize> {
    let mut consumed = 0;
    for param in binding.params() {
        if args.contains_key(param.name()) {
            consumed += 1;
        } else if param.is_required() {
            return None;
        }
        // unmatched optional parameters fall back to their default
    }
    Some(consumed)
}

/// Bind the selected overload's parameters: copy values, apply defaults,
/// resolve entity parameters by identity through the open scope
fn bind_args(
    binding: &MethodBinding,
    raw: &RawArgs,
    ctx: &mut CallContext,
) -> Result<Args, RawError> {
    let mut values = Map::new();
    let mut entities = HashMap::new();
    for param in binding.params() {
        let value = match (raw.get(param.name()), param.default_value()) {
            (Some(value), _) => value.clone(),
            (None, Some(default)) => default.clone(),
            (None, None) => {
                // selection guarantees required parameters are supplied
                return Err(Box::new(ArgsError::Missing(param.name().to_string())));
            }
        };
        if let Some(kind) = param.entity_kind() {
            let Some(key) = value.as_str() else {
                return Err(Box::new(ArgsError::WrongType {
                    name: param.name().to_string(),
                    expected: "entity key string",
                }));
            };
            let entity = ctx.session().map_err(RawError::from)?.load(kind, key)?;
            entities.insert(param.name().to_string(), entity);
        }
        values.insert(param.name().to_string(), value);
    }
    Ok(Args::new(values, entities))
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
