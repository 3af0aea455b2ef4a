//! Store abstraction
//!
//! Collaborators supply an [`EntityStore`]; everything above it works on
//! typed snapshots obtained through [`EntityStoreExt`].

use crate::entity::Entity;
use crate::error::StoreError;
use crate::kind::EntityKind;
use serde_json::Value;
use strata_domain::CompanyId;

/// Keyed record collections
///
/// Every read returns a full, consistent snapshot of one collection and
/// every write replaces one collection wholesale. Record order is preserved.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait EntityStore: Send + Sync {
    /// List all records of a collection, optionally only those owned by `company`
    ///
    /// # Errors
    /// Backend or decoding failure
    fn read_all(&self, kind: EntityKind, company: Option<CompanyId>)
        -> Result<Vec<Value>, StoreError>;

    /// Replace a collection
    ///
    /// # Errors
    /// Backend or encoding failure
    fn write_all(&self, kind: EntityKind, records: Vec<Value>) -> Result<(), StoreError>;

    /// Replace several collections as one unit
    ///
    /// The default writes sequentially and stops at the first failure.
    /// [`MemoryStore`](crate::MemoryStore) applies every write under one lock.
    /// [`JsonFileStore`](crate::JsonFileStore) stages every file before
    /// renaming any, but a failed rename can leave earlier collections
    /// replaced; recomputing stored values repairs the objectives.
    ///
    /// # Errors
    /// Backend or encoding failure
    fn commit(&self, writes: Vec<(EntityKind, Vec<Value>)>) -> Result<(), StoreError> {
        for (kind, records) in writes {
            self.write_all(kind, records)?;
        }
        Ok(())
    }
}

/// Collection replacements to commit together
#[derive(Debug, Default)]
pub struct Batch {
    writes: Vec<(EntityKind, Vec<Value>)>,
}

impl Batch {
    /// Create empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection of `E` with `records`
    ///
    /// A later `put` of the same type supersedes an earlier one.
    ///
    /// # Errors
    /// Returns [`StoreError::Serialization`] if a record cannot be encoded
    pub fn put<E: Entity>(mut self, records: &[E]) -> Result<Self, StoreError> {
        let encoded = encode(records)?;
        self.writes.retain(|(kind, _)| *kind != E::KIND);
        self.writes.push((E::KIND, encoded));
        Ok(self)
    }

    /// Whether nothing would be written
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    #[inline]
    fn into_writes(self) -> Vec<(EntityKind, Vec<Value>)> {
        self.writes
    }
}

/// Typed access over any [`EntityStore`]
pub trait EntityStoreExt: EntityStore {
    /// Load every `E`, optionally restricted to one company
    ///
    /// # Errors
    /// Backend failure, or a record that does not decode as `E`
    fn load<E: Entity>(&self, company: Option<&CompanyId>) -> Result<Vec<E>, StoreError> {
        self.read_all(E::KIND, company.cloned())?
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).map_err(|e| StoreError::serialization(E::KIND, e))
            })
            .collect()
    }

    /// Replace the collection of `E`
    ///
    /// # Errors
    /// Backend or encoding failure
    fn save<E: Entity>(&self, records: &[E]) -> Result<(), StoreError> {
        self.write_all(E::KIND, encode(records)?)
    }

    /// Commit a batch atomically
    ///
    /// # Errors
    /// Backend failure
    fn apply(&self, batch: Batch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.commit(batch.into_writes())
    }
}

impl<S: EntityStore + ?Sized> EntityStoreExt for S {}

fn encode<E: Entity>(records: &[E]) -> Result<Vec<Value>, StoreError> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).map_err(|e| StoreError::serialization(E::KIND, e)))
        .collect()
}

/// Whether a raw record belongs to `company`
pub(crate) fn owned_by(kind: EntityKind, record: &Value, company: &CompanyId) -> bool {
    record.get(kind.company_field()).and_then(Value::as_str) == Some(company.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use serde_json::json;
    use strata_domain::{Goal, GoalId, Objective, ObjectiveId, PerspectiveId};

    #[test]
    fn load_decodes_records() {
        let mut store = MockEntityStore::new();
        store
            .expect_read_all()
            .withf(|kind, company| *kind == EntityKind::Goals && company.is_none())
            .times(1)
            .returning(|_, _| {
                Ok(vec![json!({
                    "id": "g1",
                    "description": "Be the regional leader",
                    "perspectiveId": "fin",
                    "companyId": "c1"
                })])
            });

        let goals: Vec<Goal> = store.load(None).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, GoalId::new("g1"));
        assert_eq!(goals[0].perspective_id, PerspectiveId::new("fin"));
    }

    #[test]
    fn load_reports_malformed_collection() {
        let mut store = MockEntityStore::new();
        store
            .expect_read_all()
            .returning(|_, _| Ok(vec![json!({"id": "o1", "progress": 250})]));

        let err = store.load::<Objective>(None).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Serialization {
                kind: EntityKind::Objectives,
                ..
            }
        ));
    }

    #[test]
    fn save_encodes_to_collection() {
        let mut store = MockEntityStore::new();
        store
            .expect_write_all()
            .with(eq(EntityKind::Objectives), mockall::predicate::always())
            .times(1)
            .returning(|_, records| {
                assert_eq!(records[0]["id"], "o1");
                assert_eq!(records[0]["achievedPercentage"], 0);
                Ok(())
            });

        let objective = Objective::new(
            ObjectiveId::new("o1"),
            "objective",
            GoalId::new("g1"),
            strata_domain::CompanyId::new("c1"),
        );
        store.save(&[objective]).unwrap();
    }

    #[test]
    fn empty_batch_is_not_committed() {
        let store = MockEntityStore::new();
        // No expectations: any call would panic
        store.apply(Batch::new()).unwrap();
    }

    #[test]
    fn batch_keeps_latest_put_per_kind() {
        let goal = Goal::new(
            GoalId::new("g1"),
            "goal",
            PerspectiveId::new("p"),
            strata_domain::CompanyId::new("c"),
        );
        let batch = Batch::new()
            .put(&[goal.clone()])
            .unwrap()
            .put(&[goal.clone(), goal])
            .unwrap();
        let writes = batch.into_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, EntityKind::Goals);
        assert_eq!(writes[0].1.len(), 2);
    }

    #[test]
    fn ownership_uses_company_field() {
        let c1 = CompanyId::new("c1");
        assert!(owned_by(EntityKind::Goals, &json!({"companyId": "c1"}), &c1));
        assert!(!owned_by(EntityKind::Goals, &json!({"companyId": "c2"}), &c1));
        assert!(!owned_by(EntityKind::Goals, &json!({"id": "c1"}), &c1));
        assert!(owned_by(EntityKind::Companies, &json!({"id": "c1"}), &c1));
    }
}
