//! Process-local store

use crate::error::StoreError;
use crate::kind::EntityKind;
use crate::store::{owned_by, EntityStore};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use strata_domain::CompanyId;

/// In-memory store
///
/// All collections live behind one lock, so a [`commit`](EntityStore::commit)
/// is observed entirely or not at all.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<EntityKind, Vec<Value>>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection
    #[must_use]
    pub fn len(&self, kind: EntityKind) -> usize {
        self.collections.read().get(&kind).map_or(0, Vec::len)
    }

    /// Whether every collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.read().values().all(Vec::is_empty)
    }
}

impl EntityStore for MemoryStore {
    fn read_all(
        &self,
        kind: EntityKind,
        company: Option<CompanyId>,
    ) -> Result<Vec<Value>, StoreError> {
        let guard = self.collections.read();
        let Some(records) = guard.get(&kind) else {
            return Ok(Vec::new());
        };
        Ok(match company {
            Some(company) => records
                .iter()
                .filter(|r| owned_by(kind, r, &company))
                .cloned()
                .collect(),
            None => records.clone(),
        })
    }

    fn write_all(&self, kind: EntityKind, records: Vec<Value>) -> Result<(), StoreError> {
        tracing::trace!(%kind, count = records.len(), "replacing collection");
        self.collections.write().insert(kind, records);
        Ok(())
    }

    fn commit(&self, writes: Vec<(EntityKind, Vec<Value>)>) -> Result<(), StoreError> {
        let mut guard = self.collections.write();
        for (kind, records) in writes {
            tracing::trace!(%kind, count = records.len(), "replacing collection in batch");
            guard.insert(kind, records);
        }
        Ok(())
    }
}
