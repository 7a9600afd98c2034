// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence-backed objects as plain data with explicit identity

use serde_json::Value;

/// Identifies the session (scope) that materialized an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u64);

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// Type + primary-key identity of a persistence-backed object.
///
/// This is the capture used to carry an object across transaction
/// scopes; the instance itself never crosses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub kind: String,
    pub key: String,
}

impl EntityRef {
    pub fn new(kind: impl Into<String>, key: impl Into<String>) -> EntityRef {
        EntityRef {
            kind: kind.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.key)
    }
}

/// A persistence-backed object: plain data plus identity, bound to the
/// scope whose session materialized it.
///
/// The binding is what lets sessions reject writes of objects that were
/// loaded under a different scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: String,
    key: String,
    scope: ScopeId,
    /// Mutable payload; staged back with [`Session::save`](super::Session::save)
    pub data: Value,
}

impl Entity {
    /// Bind an entity to a scope.
    ///
    /// Store implementations call this when materializing rows; business
    /// code only ever receives already-bound entities.
    pub fn bind(
        kind: impl Into<String>,
        key: impl Into<String>,
        scope: ScopeId,
        data: Value,
    ) -> Entity {
        Entity {
            kind: kind.into(),
            key: key.into(),
            scope,
            data,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Identity capture for carrying this object into a nested scope
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(&self.kind, &self.key)
    }
}
