// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault classification: raw fault to fault status

use crate::builtin;
use crate::fault::{RawError, ServiceError};
use crate::status::Fault;
use crate::store::StoreError;
use std::error::Error;

/// A pluggable classification rule.
///
/// Handlers are consulted in registration order; the first whose
/// `handles` accepts the fault produces the classification. A handler
/// that fails (`to_fault` returning `None`) is skipped and iteration
/// continues. Handlers must not panic.
pub trait FaultHandler: Send + Sync {
    /// Whether this handler recognizes the raw fault
    fn handles(&self, raw: &(dyn Error + 'static)) -> bool;

    /// Produce the classification; `None` means the handler failed
    fn to_fault(&self, raw: &(dyn Error + 'static)) -> Option<Fault>;
}

/// Ordered chain of fault handlers with the unhandled-fault fallback.
///
/// Assembled once at startup, read-only afterwards; safe for
/// unsynchronized concurrent reads.
pub struct Classifier {
    handlers: Vec<Box<dyn FaultHandler>>,
}

impl Classifier {
    /// Chain with the built-in store handler installed
    pub fn new() -> Classifier {
        Classifier {
            handlers: vec![Box::new(StoreFaultHandler)],
        }
    }

    /// Chain with no handlers at all
    pub fn empty() -> Classifier {
        Classifier {
            handlers: Vec::new(),
        }
    }

    /// Append a handler; registration order is consultation order
    pub fn with_handler(mut self, handler: Box<dyn FaultHandler>) -> Classifier {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Translate a raw fault into its fault status.
    ///
    /// Never fails. Faults no handler recognizes classify as their own
    /// fault when business code raised a [`ServiceError`] directly, and
    /// as the unhandled fatal code otherwise; in the fatal case the
    /// original fault reaches the logs but never the response.
    pub fn classify(&self, raw: RawError) -> Fault {
        for handler in &self.handlers {
            if handler.handles(raw.as_ref()) {
                if let Some(fault) = handler.to_fault(raw.as_ref()) {
                    return fault;
                }
            }
        }
        match raw.downcast::<ServiceError>() {
            Ok(service) => service.into_fault(),
            Err(raw) => {
                tracing::error!(error = %raw, "unhandled fault");
                Fault::unhandled()
            }
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps store lookup failures onto the built-in object-not-found fault
pub struct StoreFaultHandler;

impl FaultHandler for StoreFaultHandler {
    fn handles(&self, raw: &(dyn Error + 'static)) -> bool {
        matches!(
            raw.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound { .. })
        )
    }

    fn to_fault(&self, raw: &(dyn Error + 'static)) -> Option<Fault> {
        match raw.downcast_ref::<StoreError>()? {
            StoreError::NotFound { kind, key } => {
                Some(builtin::object_not_found(kind, key).into_fault())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
