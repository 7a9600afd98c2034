// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store and session traits

use super::{Entity, ScopeId};
use serde_json::Value;
use thiserror::Error;

/// Errors from the persistence engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No row with the requested identity is visible to the session
    #[error("{kind}/{key} not found")]
    NotFound { kind: String, key: String },
    /// The identity already exists
    #[error("{kind}/{key} already exists")]
    DuplicateKey { kind: String, key: String },
    /// An entity bound to one scope was handed to another scope's session
    #[error("{kind}/{key} is bound to {entity_scope}, session is {session_scope}")]
    ForeignScope {
        kind: String,
        key: String,
        entity_scope: ScopeId,
        session_scope: ScopeId,
    },
    /// Failure in the underlying engine
    #[error("backend error: {0}")]
    Backend(String),
}

/// One persistence session bound to one transaction scope.
///
/// Staged writes become visible to reads on flush; the flush triggers
/// are scope commit, any read (`load`/`query`) on the same session, and
/// an explicit [`flush`](Session::flush). A session must never be
/// touched from two scopes at once, and entities it returns are bound to
/// its scope: other sessions reject them with
/// [`StoreError::ForeignScope`].
pub trait Session: Send + std::fmt::Debug {
    /// Scope this session is bound to
    fn scope(&self) -> ScopeId;

    /// Load one entity by identity, flushing staged writes first
    fn load(&mut self, kind: &str, key: &str) -> Result<Entity, StoreError>;

    /// Stage a new entity; fails if the identity already exists
    fn insert(&mut self, kind: &str, key: &str, data: Value) -> Result<Entity, StoreError>;

    /// Stage an update to an entity bound to this session's scope
    fn save(&mut self, entity: &Entity) -> Result<(), StoreError>;

    /// Stage removal of an entity bound to this session's scope
    fn remove(&mut self, entity: &Entity) -> Result<(), StoreError>;

    /// All entities of a kind, flushing staged writes first
    fn query(&mut self, kind: &str) -> Result<Vec<Entity>, StoreError>;

    /// Make staged writes visible to subsequent reads in this scope
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Commit the scope's work durably, consuming the session
    fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discard the scope's uncommitted work, consuming the session
    fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Factory for scope-bound sessions
pub trait Store: Send + Sync {
    fn open(&self) -> Result<Box<dyn Session>, StoreError>;
}
