//! Strata Store
//!
//! Keyed record collections, one per entity type, scoped by company.
//!
//! The store is deliberately dumb: it reads and replaces whole collections
//! of JSON records. Typed access and company filtering sit on top.
//!
//! - [`EntityStore`]: `read_all` / `write_all` / atomic `commit`
//! - [`EntityStoreExt`]: typed `load` / `save` / `apply` for any [`Entity`]
//! - [`MemoryStore`]: process-local backend
//! - [`JsonFileStore`]: one JSON array file per collection

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod entity;
mod error;
mod file;
mod kind;
mod memory;
mod store;

pub use entity::Entity;
pub use error::StoreError;
pub use file::{JsonFileStore, DEFAULT_PREFIX};
pub use kind::EntityKind;
pub use memory::MemoryStore;
pub use store::{Batch, EntityStore, EntityStoreExt};

#[cfg(any(test, feature = "mock"))]
pub use store::MockEntityStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
