// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-call context handed to every method invocation

use crate::coordinator::{CoordinatorError, TransactionCoordinator};
use teller_core::status::{Information, ResponseStatus, Warning};
use teller_core::store::{Entity, EntityRef, Session};
use teller_core::RawError;

/// Call-local state: the transaction coordinator plus accumulated
/// notices.
///
/// Created fresh by the dispatcher per call and discarded at call end;
/// nothing in it is shared across calls.
pub struct CallContext {
    call_id: String,
    tx: TransactionCoordinator,
    notices: Vec<ResponseStatus>,
}

impl CallContext {
    pub(crate) fn new(call_id: String, tx: TransactionCoordinator) -> CallContext {
        CallContext {
            call_id,
            tx,
            notices: Vec::new(),
        }
    }

    /// Unique id of this call, tagging all its log events
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// The innermost open scope's persistence session
    pub fn session(&mut self) -> Result<&mut dyn Session, CoordinatorError> {
        self.tx.session()
    }

    /// Make staged writes visible to subsequent reads in the current scope
    pub fn flush(&mut self) -> Result<(), CoordinatorError> {
        self.tx.session()?.flush().map_err(CoordinatorError::from)
    }

    /// Run `body` inside a nested transaction scope.
    ///
    /// Each carried entity's identity is captured here and re-loaded
    /// inside the nested scope's own session; the re-loaded instances
    /// are what `body` receives, in the same order. The nested scope
    /// commits when `body` returns `Ok` and rolls back when it returns
    /// `Err`, independent of the outer scope's eventual outcome.
    pub fn nested<T>(
        &mut self,
        carried: &[&Entity],
        body: impl FnOnce(&mut CallContext, Vec<Entity>) -> Result<T, RawError>,
    ) -> Result<T, RawError> {
        let refs: Vec<EntityRef> = carried.iter().map(|entity| entity.entity_ref()).collect();
        let reloaded = self.tx.enter_nested(&refs).map_err(RawError::from)?;
        match body(self, reloaded) {
            Ok(value) => {
                self.tx.leave_nested(true).map_err(RawError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(close_err) = self.tx.leave_nested(false) {
                    tracing::warn!(call = %self.call_id, error = %close_err, "nested rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Attach an informational notice to the eventual successful response
    pub fn push_info(&mut self, info: Information) {
        self.notices.push(ResponseStatus::Information(info));
    }

    /// Attach a warning notice to the eventual successful response
    pub fn push_warning(&mut self, warning: Warning) {
        self.notices.push(ResponseStatus::Warning(warning));
    }

    pub(crate) fn coordinator(&mut self) -> &mut TransactionCoordinator {
        &mut self.tx
    }

    pub(crate) fn take_notices(&mut self) -> Vec<ResponseStatus> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
