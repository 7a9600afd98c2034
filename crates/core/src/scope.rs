// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure per-call transaction state machine
//!
//! The coordinator in the engine crate drives this machine alongside the
//! real persistence sessions; the machine itself holds no resources.

use thiserror::Error;

/// An event applied in a state that does not admit it
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid transaction transition: {event:?} in {state:?}")]
pub struct TxError {
    pub state: TxState,
    pub event: TxEvent,
}

/// Lifecycle of the transactional boundary for one inbound call.
///
/// `Open` tracks the scope-stack depth. `main` records whether the
/// bottom scope is the implicit per-call scope or one opened explicitly
/// from a transaction-disabled call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Call entry, before the coordinator decides on a main scope
    Idle,
    /// The method opted out of the implicit transaction
    NoTransaction,
    /// At least one scope is open
    Open { depth: usize, main: bool },
    /// Main scope committed (terminal)
    Committed,
    /// Main scope rolled back (terminal)
    RolledBack,
    /// Transaction-disabled call finished (terminal)
    Closed,
}

/// Events driving the transaction machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxEvent {
    /// Open the implicit main scope on call entry
    Begin,
    /// Enter the call without a main scope
    Skip,
    /// Open a nested (or explicit) scope
    EnterNested,
    /// Close the innermost nested scope
    LeaveNested,
    /// Commit the main scope
    Commit,
    /// Roll back the main scope
    Rollback,
    /// Finish a call that never had a main scope
    Finish,
}

impl TxState {
    /// Apply an event, yielding the next state.
    ///
    /// A scope may not be committed or rolled back while an inner scope
    /// is still open; such transitions are errors, as is any event on a
    /// terminal state.
    pub fn apply(self, event: TxEvent) -> Result<TxState, TxError> {
        use TxEvent::*;
        use TxState::*;
        match (self, event) {
            (Idle, Begin) => Ok(Open {
                depth: 1,
                main: true,
            }),
            (Idle, Skip) => Ok(NoTransaction),
            (NoTransaction, EnterNested) => Ok(Open {
                depth: 1,
                main: false,
            }),
            (NoTransaction, Finish) => Ok(Closed),
            (Open { depth, main }, EnterNested) => Ok(Open {
                depth: depth + 1,
                main,
            }),
            (Open { depth, main }, LeaveNested) if depth > 1 => Ok(Open {
                depth: depth - 1,
                main,
            }),
            (
                Open {
                    depth: 1,
                    main: false,
                },
                LeaveNested,
            ) => Ok(NoTransaction),
            (
                Open {
                    depth: 1,
                    main: true,
                },
                Commit,
            ) => Ok(Committed),
            (
                Open {
                    depth: 1,
                    main: true,
                },
                Rollback,
            ) => Ok(RolledBack),
            (state, event) => Err(TxError { state, event }),
        }
    }

    /// Whether any scope is currently open
    pub fn is_open(&self) -> bool {
        matches!(self, TxState::Open { .. })
    }

    /// Depth of the open scope stack
    pub fn depth(&self) -> usize {
        match self {
            TxState::Open { depth, .. } => *depth,
            _ => 0,
        }
    }

    /// Whether the bottom of the open stack is the implicit main scope
    pub fn is_main(&self) -> bool {
        matches!(self, TxState::Open { main: true, .. })
    }

    /// Terminal states admit no further events
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TxState::Committed | TxState::RolledBack | TxState::Closed
        )
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
