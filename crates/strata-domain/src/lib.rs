//! Strata Domain
//!
//! Strategic-planning records and the rules that derive progress from them.
//!
//! # Core Concepts
//!
//! - [`Percent`]: Integer completion value in `[0, 100]`
//! - [`ActionPlan`] / [`CheckIn`]: Work items and their append-only progress reports
//! - [`Objective`]: Manual progress plus an engine-owned achieved percentage
//! - [`Goal`] / [`Perspective`]: Groupings whose completion is always computed on read
//! - [`aggregation`]: Pure calculators rolling progress up the hierarchy
//! - [`propagation`]: Which recomputations a mutation requires, and applying them
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_domain::{aggregation, apply_check_in, propagation};
//!
//! let plan = apply_check_in(plan, check_in);
//! // ...replace the plan inside `plans`, then bring its objective up to date
//! propagation::refresh_objective(&mut objectives, &objective_id, &plans);
//! let completion = aggregation::goal_completion(&goal_id, &objectives);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod aggregation;
mod check_in;
pub mod entity;
mod id;
mod percent;
pub mod propagation;

// Re-exports
pub use check_in::apply_check_in;
pub use entity::{
    ActionPlan, CheckIn, Company, Department, Goal, Mission, Objective, Perspective, Position,
    SwotItem, SwotKind, User, Value, Vision,
};
pub use id::{
    ActionPlanId, CheckInId, CompanyId, DepartmentId, GoalId, MissionId, ObjectiveId,
    PerspectiveId, PositionId, SwotItemId, UserId, ValueId, VisionId,
};
pub use percent::{Percent, PercentError};
pub use propagation::{Change, Effect, Mutation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
