// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrappers for consistent observability

use serde_json::Value;
use std::time::Instant;
use teller_core::store::{Entity, ScopeId, Session, Store, StoreError};

/// Wrapper that adds tracing to any Store
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Store> Store for TracedStore<S> {
    fn open(&self) -> Result<Box<dyn Session>, StoreError> {
        match self.inner.open() {
            Ok(session) => {
                tracing::debug!(scope = %session.scope(), "session opened");
                Ok(Box::new(TracedSession { inner: session }))
            }
            Err(e) => {
                tracing::error!(error = %e, "session open failed");
                Err(e)
            }
        }
    }
}

/// Wraps a session so every operation logs its outcome under the
/// session's scope
#[derive(Debug)]
struct TracedSession {
    inner: Box<dyn Session>,
}

impl Session for TracedSession {
    fn scope(&self) -> ScopeId {
        self.inner.scope()
    }

    fn load(&mut self, kind: &str, key: &str) -> Result<Entity, StoreError> {
        let span = tracing::debug_span!("session.load", scope = %self.inner.scope(), kind, key);
        let _guard = span.enter();

        let result = self.inner.load(kind, key);
        match &result {
            Ok(_) => tracing::debug!("loaded"),
            Err(e) => tracing::debug!(error = %e, "load failed"),
        }
        result
    }

    fn insert(&mut self, kind: &str, key: &str, data: Value) -> Result<Entity, StoreError> {
        let span = tracing::debug_span!("session.insert", scope = %self.inner.scope(), kind, key);
        let _guard = span.enter();

        let result = self.inner.insert(kind, key, data);
        match &result {
            Ok(_) => tracing::debug!("staged"),
            Err(e) => tracing::debug!(error = %e, "insert failed"),
        }
        result
    }

    fn save(&mut self, entity: &Entity) -> Result<(), StoreError> {
        let span = tracing::debug_span!(
            "session.save",
            scope = %self.inner.scope(),
            kind = entity.kind(),
            key = entity.key()
        );
        let _guard = span.enter();

        let result = self.inner.save(entity);
        if let Err(e) = &result {
            tracing::error!(error = %e, "save failed");
        }
        result
    }

    fn remove(&mut self, entity: &Entity) -> Result<(), StoreError> {
        let span = tracing::debug_span!(
            "session.remove",
            scope = %self.inner.scope(),
            kind = entity.kind(),
            key = entity.key()
        );
        let _guard = span.enter();

        let result = self.inner.remove(entity);
        if let Err(e) = &result {
            tracing::error!(error = %e, "remove failed");
        }
        result
    }

    fn query(&mut self, kind: &str) -> Result<Vec<Entity>, StoreError> {
        let span = tracing::debug_span!("session.query", scope = %self.inner.scope(), kind);
        let _guard = span.enter();

        let result = self.inner.query(kind);
        match &result {
            Ok(rows) => tracing::debug!(rows = rows.len(), "queried"),
            Err(e) => tracing::debug!(error = %e, "query failed"),
        }
        result
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        tracing::debug!(scope = %self.inner.scope(), "flush");
        self.inner.flush()
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let scope = self.inner.scope();
        let span = tracing::info_span!("session.commit", scope = %scope);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.commit();
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "committed"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "commit failed"
            ),
        }
        result
    }

    fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let scope = self.inner.scope();
        let result = self.inner.rollback();
        match &result {
            Ok(()) => tracing::info!(scope = %scope, "rolled back"),
            Err(e) => tracing::error!(scope = %scope, error = %e, "rollback failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
