//! Progress aggregation
//!
//! Pure calculators over already-loaded collections:
//! - Objective achieved percentage from its action plans
//! - Goal completion from its objectives
//! - Perspective completion from its goals
//!
//! All of them are total. A dangling or unknown identifier simply matches
//! nothing and yields 0.

use crate::entity::{ActionPlan, Goal, Objective};
use crate::id::{GoalId, ObjectiveId, PerspectiveId};
use crate::percent::Percent;

/// Achieved percentage of an objective
///
/// Rounded mean of the `progress` of every plan linked to `objective_id`,
/// or 0 when none are linked.
#[must_use]
pub fn objective_achieved(objective_id: &ObjectiveId, plans: &[ActionPlan]) -> Percent {
    Percent::mean(
        plans
            .iter()
            .filter(|plan| &plan.objective_id == objective_id)
            .map(|plan| plan.progress),
    )
}

/// Completion of a goal
///
/// Every linked objective weighs `100 / n` and contributes its
/// [`effective_completion`](Objective::effective_completion). The weighted
/// sum is exactly the unweighted mean, so it is computed as one to keep
/// rounding independent of summation order.
#[must_use]
pub fn goal_completion(goal_id: &GoalId, objectives: &[Objective]) -> Percent {
    Percent::mean(
        objectives
            .iter()
            .filter(|obj| &obj.goal_id == goal_id)
            .map(Objective::effective_completion),
    )
}

/// Completion of a perspective
///
/// Rounded unweighted mean of its goals' completions.
#[must_use]
pub fn perspective_completion(
    perspective_id: &PerspectiveId,
    goals: &[Goal],
    objectives: &[Objective],
) -> Percent {
    Percent::mean(
        goals
            .iter()
            .filter(|goal| &goal.perspective_id == perspective_id)
            .map(|goal| goal_completion(&goal.id, objectives)),
    )
}
