// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory reference store
//!
//! Each session stages writes privately and applies them to the shared
//! base on commit; rollback discards them. This is the store the test
//! suites run against and a template for real store adapters.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use teller_core::store::{Entity, ScopeId, Session, Store, StoreError};

type Row = (String, String);

/// Shared in-memory persistence engine.
///
/// Clones share the same base map; every open session gets a fresh
/// scope id from an atomic counter.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: RwLock<HashMap<Row, Value>>,
    next_scope: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Seed a committed row outside any scope (bootstrap/test helper)
    pub fn seed(&self, kind: &str, key: &str, data: Value) {
        let mut rows = self.inner.rows.write().unwrap_or_else(|e| e.into_inner());
        rows.insert((kind.to_string(), key.to_string()), data);
    }

    /// Read a committed row directly, bypassing any session
    pub fn committed(&self, kind: &str, key: &str) -> Option<Value> {
        let rows = self.inner.rows.read().unwrap_or_else(|e| e.into_inner());
        rows.get(&(kind.to_string(), key.to_string())).cloned()
    }
}

impl Store for MemoryStore {
    fn open(&self) -> Result<Box<dyn Session>, StoreError> {
        let scope = ScopeId(self.inner.next_scope.fetch_add(1, Ordering::SeqCst) + 1);
        Ok(Box::new(MemorySession {
            scope,
            inner: Arc::clone(&self.inner),
            staged: Vec::new(),
            overlay: HashMap::new(),
        }))
    }
}

#[derive(Debug)]
enum Write {
    Upsert {
        kind: String,
        key: String,
        data: Value,
    },
    Remove {
        kind: String,
        key: String,
    },
}

/// One scope's session: staged writes plus a flushed overlay over the
/// shared base. `None` in the overlay marks a removal.
#[derive(Debug)]
struct MemorySession {
    scope: ScopeId,
    inner: Arc<Inner>,
    staged: Vec<Write>,
    overlay: HashMap<Row, Option<Value>>,
}

impl MemorySession {
    fn visible(&self, kind: &str, key: &str) -> Option<Value> {
        let row = (kind.to_string(), key.to_string());
        if let Some(entry) = self.overlay.get(&row) {
            return entry.clone();
        }
        let rows = self.inner.rows.read().unwrap_or_else(|e| e.into_inner());
        rows.get(&row).cloned()
    }

    fn apply_staged(&mut self) {
        for write in self.staged.drain(..) {
            match write {
                Write::Upsert { kind, key, data } => {
                    self.overlay.insert((kind, key), Some(data));
                }
                Write::Remove { kind, key } => {
                    self.overlay.insert((kind, key), None);
                }
            }
        }
    }

    fn check_scope(&self, entity: &Entity) -> Result<(), StoreError> {
        if entity.scope() != self.scope {
            return Err(StoreError::ForeignScope {
                kind: entity.kind().to_string(),
                key: entity.key().to_string(),
                entity_scope: entity.scope(),
                session_scope: self.scope,
            });
        }
        Ok(())
    }
}

impl Session for MemorySession {
    fn scope(&self) -> ScopeId {
        self.scope
    }

    fn load(&mut self, kind: &str, key: &str) -> Result<Entity, StoreError> {
        self.flush()?;
        match self.visible(kind, key) {
            Some(data) => Ok(Entity::bind(kind, key, self.scope, data)),
            None => Err(StoreError::NotFound {
                kind: kind.to_string(),
                key: key.to_string(),
            }),
        }
    }

    fn insert(&mut self, kind: &str, key: &str, data: Value) -> Result<Entity, StoreError> {
        self.flush()?;
        if self.visible(kind, key).is_some() {
            return Err(StoreError::DuplicateKey {
                kind: kind.to_string(),
                key: key.to_string(),
            });
        }
        self.staged.push(Write::Upsert {
            kind: kind.to_string(),
            key: key.to_string(),
            data: data.clone(),
        });
        Ok(Entity::bind(kind, key, self.scope, data))
    }

    fn save(&mut self, entity: &Entity) -> Result<(), StoreError> {
        self.check_scope(entity)?;
        self.staged.push(Write::Upsert {
            kind: entity.kind().to_string(),
            key: entity.key().to_string(),
            data: entity.data.clone(),
        });
        Ok(())
    }

    fn remove(&mut self, entity: &Entity) -> Result<(), StoreError> {
        self.check_scope(entity)?;
        self.staged.push(Write::Remove {
            kind: entity.kind().to_string(),
            key: entity.key().to_string(),
        });
        Ok(())
    }

    fn query(&mut self, kind: &str) -> Result<Vec<Entity>, StoreError> {
        self.flush()?;
        let mut out: Vec<Entity> = Vec::new();
        {
            let rows = self.inner.rows.read().unwrap_or_else(|e| e.into_inner());
            for ((row_kind, key), data) in rows.iter() {
                let shadowed = self
                    .overlay
                    .contains_key(&(row_kind.clone(), key.clone()));
                if row_kind == kind && !shadowed {
                    out.push(Entity::bind(
                        row_kind.clone(),
                        key.clone(),
                        self.scope,
                        data.clone(),
                    ));
                }
            }
        }
        for ((row_kind, key), entry) in self.overlay.iter() {
            if row_kind == kind {
                if let Some(data) = entry {
                    out.push(Entity::bind(
                        row_kind.clone(),
                        key.clone(),
                        self.scope,
                        data.clone(),
                    ));
                }
            }
        }
        out.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(out)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.apply_staged();
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.apply_staged();
        let inner = Arc::clone(&self.inner);
        let mut rows = inner.rows.write().unwrap_or_else(|e| e.into_inner());
        for (row, entry) in self.overlay.drain() {
            match entry {
                Some(data) => {
                    rows.insert(row, data);
                }
                None => {
                    rows.remove(&row);
                }
            }
        }
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        // staged and flushed-but-uncommitted writes die with the session
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
