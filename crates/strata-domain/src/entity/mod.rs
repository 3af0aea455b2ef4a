//! Entity records
//!
//! Field names serialize in camelCase so existing datasets load unchanged.
//!
//! - [`planning`]: goals, objectives, action plans and check-ins
//! - [`strategy`]: vision, mission, values, perspectives and SWOT items
//! - [`organization`]: companies, users, departments and positions

pub mod organization;
pub mod planning;
pub mod strategy;

pub use organization::{Company, Department, Position, User};
pub use planning::{ActionPlan, CheckIn, Goal, Objective};
pub use strategy::{Mission, Perspective, SwotItem, SwotKind, Value, Vision};
