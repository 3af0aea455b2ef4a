//! JSON file store
//!
//! One file per collection, holding a JSON array of records:
//! `<dir>/<prefix><key>.json`. A missing file is an empty collection.
//! Writes land in a sibling temp file which is then renamed over the
//! original, so a crash never leaves a half-written collection.

use crate::error::StoreError;
use crate::kind::EntityKind;
use crate::store::{owned_by, EntityStore};
use parking_lot::Mutex;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use strata_domain::CompanyId;

/// Default file name prefix
pub const DEFAULT_PREFIX: &str = "strategic-planning.";

/// Directory-backed store
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    prefix: String,
    /// Serializes writers within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store directory
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the directory cannot be created
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::with_prefix(dir, DEFAULT_PREFIX)
    }

    /// Open with a custom file name prefix
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the directory cannot be created
    pub fn with_prefix(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        tracing::debug!(dir = %dir.display(), "opened json file store");
        Ok(Self {
            dir,
            prefix: prefix.into(),
            write_lock: Mutex::new(()),
        })
    }

    /// Store directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a collection
    #[must_use]
    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.prefix, kind.key()))
    }

    fn temp_path_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!(".{}{}.json.tmp", self.prefix, kind.key()))
    }

    fn stage(&self, kind: EntityKind, records: &[Value]) -> Result<PathBuf, StoreError> {
        let bytes =
            serde_json::to_vec_pretty(records).map_err(|e| StoreError::serialization(kind, e))?;
        let tmp = self.temp_path_for(kind);
        fs::write(&tmp, bytes).map_err(|e| StoreError::io(&tmp, e))?;
        Ok(tmp)
    }

    fn publish(&self, kind: EntityKind, tmp: &Path) -> Result<(), StoreError> {
        let path = self.path_for(kind);
        fs::rename(tmp, &path).map_err(|e| StoreError::io(&path, e))
    }
}

impl EntityStore for JsonFileStore {
    fn read_all(
        &self,
        kind: EntityKind,
        company: Option<CompanyId>,
    ) -> Result<Vec<Value>, StoreError> {
        let path = self.path_for(kind);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        let records: Vec<Value> =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::serialization(kind, e))?;

        Ok(match company {
            Some(company) => records
                .into_iter()
                .filter(|r| owned_by(kind, r, &company))
                .collect(),
            None => records,
        })
    }

    fn write_all(&self, kind: EntityKind, records: Vec<Value>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let tmp = self.stage(kind, &records)?;
        self.publish(kind, &tmp)?;
        tracing::debug!(%kind, count = records.len(), "wrote collection");
        Ok(())
    }

    fn commit(&self, writes: Vec<(EntityKind, Vec<Value>)>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();

        // Stage everything first so an encoding or disk failure leaves every
        // published collection untouched
        let mut staged = Vec::with_capacity(writes.len());
        for (kind, records) in &writes {
            match self.stage(*kind, records) {
                Ok(tmp) => staged.push((*kind, tmp)),
                Err(e) => {
                    for (_, tmp) in &staged {
                        let _ = fs::remove_file(tmp);
                    }
                    return Err(e);
                }
            }
        }

        // Renames are not atomic as a group. A failure part way leaves the
        // earlier collections published and drops the rest.
        for (i, (kind, tmp)) in staged.iter().enumerate() {
            if let Err(e) = self.publish(*kind, tmp) {
                for (_, unpublished) in &staged[i..] {
                    let _ = fs::remove_file(unpublished);
                }
                tracing::warn!(%kind, published = i, error = %e, "batch partially committed");
                return Err(e);
            }
        }
        tracing::debug!(collections = staged.len(), "committed batch");
        Ok(())
    }
}
