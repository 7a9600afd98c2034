// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction coordinator: the scope stack for one inbound call

use std::sync::Arc;
use teller_core::scope::{TxEvent, TxState};
use teller_core::store::{Entity, EntityRef, Session, Store, StoreError};
use thiserror::Error;

/// Faults raised by the coordinator itself.
///
/// These are caller programming errors or store failures; the classifier
/// reports them as unhandled faults unless a handler says otherwise.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("no open transaction scope")]
    NoOpenScope,
    #[error("{count} carried objects exceeds the limit of {limit}")]
    TooManyCarriedObjects { count: usize, limit: usize },
    #[error(transparent)]
    Transition(#[from] teller_core::scope::TxError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Manages the transaction state and session stack for one call.
///
/// Scopes are strictly sequential: each nested scope's lifetime is fully
/// contained in its parent's, and each holds its own session. Whatever
/// the call's outcome, every session is released when the coordinator is
/// finalized (or dropped).
pub struct TransactionCoordinator {
    store: Arc<dyn Store>,
    stack: Vec<Box<dyn Session>>,
    state: TxState,
    max_carried: usize,
}

impl TransactionCoordinator {
    pub fn new(store: Arc<dyn Store>, max_carried: usize) -> TransactionCoordinator {
        TransactionCoordinator {
            store,
            stack: Vec::new(),
            state: TxState::Idle,
            max_carried,
        }
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    /// Open the implicit main scope on call entry
    pub fn begin_main(&mut self) -> Result<(), CoordinatorError> {
        self.state = self.state.apply(TxEvent::Begin)?;
        match self.store.open() {
            Ok(session) => {
                self.stack.push(session);
                Ok(())
            }
            Err(err) => {
                self.state = self.state.apply(TxEvent::Rollback)?;
                Err(err.into())
            }
        }
    }

    /// Enter the call without a main scope
    pub fn skip_main(&mut self) -> Result<(), CoordinatorError> {
        self.state = self.state.apply(TxEvent::Skip)?;
        Ok(())
    }

    /// The innermost open scope's session
    pub fn session(&mut self) -> Result<&mut dyn Session, CoordinatorError> {
        match self.stack.last_mut() {
            Some(session) => Ok(session.as_mut()),
            None => Err(CoordinatorError::NoOpenScope),
        }
    }

    /// Open a nested scope, re-materializing each carried identity in
    /// the new scope's own session.
    pub(crate) fn enter_nested(
        &mut self,
        carried: &[EntityRef],
    ) -> Result<Vec<Entity>, CoordinatorError> {
        if carried.len() > self.max_carried {
            return Err(CoordinatorError::TooManyCarriedObjects {
                count: carried.len(),
                limit: self.max_carried,
            });
        }
        self.state = self.state.apply(TxEvent::EnterNested)?;
        let mut session = match self.store.open() {
            Ok(session) => session,
            Err(err) => {
                self.state = self.state.apply(TxEvent::LeaveNested)?;
                return Err(err.into());
            }
        };
        let mut reloaded = Vec::with_capacity(carried.len());
        for reference in carried {
            match session.load(&reference.kind, &reference.key) {
                Ok(entity) => reloaded.push(entity),
                Err(err) => {
                    if let Err(close_err) = session.rollback() {
                        tracing::warn!(error = %close_err, "rollback after failed carry");
                    }
                    self.state = self.state.apply(TxEvent::LeaveNested)?;
                    return Err(err.into());
                }
            }
        }
        self.stack.push(session);
        Ok(reloaded)
    }

    /// Close the innermost nested scope: commit on normal completion,
    /// roll back on fault. The state transition happens even when the
    /// session operation fails; the scope is closed either way.
    pub(crate) fn leave_nested(&mut self, commit: bool) -> Result<(), CoordinatorError> {
        let session = self.stack.pop().ok_or(CoordinatorError::NoOpenScope)?;
        let result = if commit {
            session.commit()
        } else {
            session.rollback()
        };
        self.state = self.state.apply(TxEvent::LeaveNested)?;
        result.map_err(Into::into)
    }

    /// Finalize a call that completed without a fault
    pub fn finish_success(&mut self) -> Result<(), CoordinatorError> {
        if self.state == TxState::NoTransaction {
            self.state = self.state.apply(TxEvent::Finish)?;
            return Ok(());
        }
        let session = self.stack.pop().ok_or(CoordinatorError::NoOpenScope)?;
        match session.commit() {
            Ok(()) => {
                self.state = self.state.apply(TxEvent::Commit)?;
                Ok(())
            }
            Err(err) => {
                // the engine discarded the scope's work on commit failure
                self.state = self.state.apply(TxEvent::Rollback)?;
                Err(err.into())
            }
        }
    }

    /// Unwind every open scope innermost-first after a fault
    pub fn finish_fault(&mut self) -> Result<(), CoordinatorError> {
        while let Some(session) = self.stack.pop() {
            if let Err(err) = session.rollback() {
                tracing::warn!(error = %err, "rollback failed");
            }
            let event = if self.state.depth() > 1 || !self.state.is_main() {
                TxEvent::LeaveNested
            } else {
                TxEvent::Rollback
            };
            self.state = self.state.apply(event)?;
        }
        if self.state == TxState::NoTransaction {
            self.state = self.state.apply(TxEvent::Finish)?;
        }
        Ok(())
    }
}

impl Drop for TransactionCoordinator {
    fn drop(&mut self) {
        // sessions must not outlive the call, whatever the outcome
        while let Some(session) = self.stack.pop() {
            if let Err(err) = session.rollback() {
                tracing::warn!(error = %err, "rollback on drop failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
