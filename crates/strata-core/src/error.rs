//! Error types for the planning service
//!
//! Aggregation itself never fails; these cover:
//! - Commands naming records that do not exist
//! - Progress values outside `[0, 100]`
//! - Store failures

use strata_domain::{ActionPlanId, GoalId, ObjectiveId, PercentError, PerspectiveId};
use strata_store::StoreError;

/// Main planning error type
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    /// No action plan with this id
    #[error("action plan not found: {0}")]
    ActionPlanNotFound(ActionPlanId),

    /// No objective with this id
    #[error("objective not found: {0}")]
    ObjectiveNotFound(ObjectiveId),

    /// No goal with this id
    #[error("goal not found: {0}")]
    GoalNotFound(GoalId),

    /// No perspective with this id
    #[error("perspective not found: {0}")]
    PerspectiveNotFound(PerspectiveId),

    /// Progress value rejected
    #[error("invalid progress: {0}")]
    InvalidProgress(#[from] PercentError),

    /// Store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl PlanningError {
    /// Check if the error names a missing record
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ActionPlanNotFound(_)
                | Self::ObjectiveNotFound(_)
                | Self::GoalNotFound(_)
                | Self::PerspectiveNotFound(_)
        )
    }
}
