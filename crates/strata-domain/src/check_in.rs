//! Check-in ingestion

use crate::entity::{ActionPlan, CheckIn};

/// Record a check-in against a plan
///
/// The check-in is appended after any existing ones and re-linked to the
/// plan it was applied to. Plan progress becomes the larger of its current
/// value and the check-in's value, so a late or pessimistic check-in never
/// lowers it.
///
/// The owning objective is now stale; callers must refresh it (see
/// [`propagation::refresh_objective`](crate::propagation::refresh_objective))
/// before anything else reads the pair.
#[must_use]
pub fn apply_check_in(mut plan: ActionPlan, mut check_in: CheckIn) -> ActionPlan {
    check_in.action_plan_id = plan.id.clone();
    plan.progress = plan.progress.max(check_in.progress);
    plan.push_check_in(check_in);
    plan
}
