//! Strata Core - planning service
//!
//! The single mutation entry point over an [`EntityStore`](strata_store::EntityStore):
//! - Applies check-ins and plan edits, then recomputes the owning objectives
//! - Commits plan and objective collections together
//! - Caches goal completions and drops them when an objective changes
//! - Builds the strategic map read model
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_core::{NewCheckIn, PlanningService};
//! use strata_domain::{ActionPlanId, Percent};
//! use strata_store::MemoryStore;
//!
//! let service = PlanningService::new(MemoryStore::new());
//! let plan = service.record_check_in(&ActionPlanId::new("p1"), NewCheckIn::new(Percent::new(60)?))?;
//! println!("plan now at {}", plan.progress);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod map;
pub mod service;

// Re-exports for convenience
pub use cache::{CacheStats, GoalCompletionCache};
pub use commands::{
    ActionPlanPatch, GoalPatch, NewActionPlan, NewCheckIn, NewGoal, NewObjective, ObjectivePatch,
};
pub use config::{CacheConfig, ConfigError, StoreConfig, StrataConfig};
pub use error::PlanningError;
pub use ids::{Clock, IdGenerator, SystemClock, UlidGenerator};
pub use map::{GoalSummary, ObjectiveDetail, PerspectiveSummary, StrategicMap};
pub use service::PlanningService;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the planning service
    pub use crate::{
        ActionPlanPatch, NewActionPlan, NewCheckIn, NewGoal, NewObjective, ObjectivePatch,
        PlanningError, PlanningService, StrataConfig,
    };
    pub use strata_domain::{ActionPlanId, CompanyId, GoalId, ObjectiveId, Percent, PerspectiveId};
    pub use strata_store::{EntityStore, EntityStoreExt, JsonFileStore, MemoryStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
