//! Hierarchy consistency rules
//!
//! Maps each kind of mutation to the derived values it makes stale, and
//! applies objective recomputation to a loaded collection.
//!
//! | Mutation                          | Effect                                   |
//! |-----------------------------------|------------------------------------------|
//! | plan created / progress / deleted | recompute the plan's objective           |
//! | plan moved between objectives     | recompute both objectives                |
//! | objective created / edited / gone | invalidate cached completion of its goal |
//! | goal or perspective edited        | nothing                                  |
//!
//! A recomputation that changes an objective's achieved value is itself an
//! objective mutation, so its goal must be invalidated as well.

use crate::aggregation;
use crate::entity::{ActionPlan, Objective};
use crate::id::{GoalId, ObjectiveId};
use crate::percent::Percent;

/// Mutation to the planning hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// New action plan under an objective
    ActionPlanCreated { objective: ObjectiveId },
    /// Action plan progress changed, directly or through a check-in
    ActionPlanProgressChanged { objective: ObjectiveId },
    /// Action plan re-linked to another objective
    ActionPlanMoved { from: ObjectiveId, to: ObjectiveId },
    /// Action plan removed
    ActionPlanDeleted { objective: ObjectiveId },
    /// New objective under a goal
    ObjectiveCreated { goal: GoalId },
    /// Manual progress or descriptive fields of an objective edited
    ObjectiveEdited { goal: GoalId },
    /// Objective re-linked to another goal
    ObjectiveMoved { from: GoalId, to: GoalId },
    /// Objective removed
    ObjectiveDeleted { goal: GoalId },
    /// Goal record edited, created or removed
    GoalEdited,
    /// Perspective record edited, created or removed
    PerspectiveEdited,
}

/// Work a mutation requires before control returns to the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Recompute and persist the objective's achieved percentage
    RecomputeObjective(ObjectiveId),
    /// Drop any cached completion for the goal
    InvalidateGoal(GoalId),
}

impl Mutation {
    /// Effects required by this mutation
    #[must_use]
    pub fn effects(&self) -> Vec<Effect> {
        match self {
            Self::ActionPlanCreated { objective }
            | Self::ActionPlanProgressChanged { objective }
            | Self::ActionPlanDeleted { objective } => {
                vec![Effect::RecomputeObjective(objective.clone())]
            }
            Self::ActionPlanMoved { from, to } if from == to => {
                vec![Effect::RecomputeObjective(to.clone())]
            }
            Self::ActionPlanMoved { from, to } => vec![
                Effect::RecomputeObjective(from.clone()),
                Effect::RecomputeObjective(to.clone()),
            ],
            Self::ObjectiveCreated { goal }
            | Self::ObjectiveEdited { goal }
            | Self::ObjectiveDeleted { goal } => vec![Effect::InvalidateGoal(goal.clone())],
            Self::ObjectiveMoved { from, to } if from == to => {
                vec![Effect::InvalidateGoal(to.clone())]
            }
            Self::ObjectiveMoved { from, to } => vec![
                Effect::InvalidateGoal(from.clone()),
                Effect::InvalidateGoal(to.clone()),
            ],
            Self::GoalEdited | Self::PerspectiveEdited => Vec::new(),
        }
    }
}

/// Outcome of recomputing one objective
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub objective: ObjectiveId,
    pub goal: GoalId,
    pub before: Percent,
    pub after: Percent,
}

impl Change {
    /// Whether the stored value moved
    #[inline]
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }
}

/// Recompute one objective's achieved percentage in place
///
/// Returns `None` when no objective with that id is loaded; a plan that
/// still points at a deleted objective has nothing to update.
pub fn refresh_objective(
    objectives: &mut [Objective],
    objective_id: &ObjectiveId,
    plans: &[ActionPlan],
) -> Option<Change> {
    let objective = objectives.iter_mut().find(|o| &o.id == objective_id)?;
    let before = objective.achieved_percentage();
    let after = aggregation::objective_achieved(objective_id, plans);
    objective.set_achieved_percentage(after);

    Some(Change {
        objective: objective.id.clone(),
        goal: objective.goal_id.clone(),
        before,
        after,
    })
}

/// Recompute every objective, returning the ones whose value moved
pub fn refresh_all(objectives: &mut [Objective], plans: &[ActionPlan]) -> Vec<Change> {
    refresh_where(objectives, plans, |_| true)
}

/// Recompute the objectives matching `select`, returning the ones whose value moved
pub fn refresh_where<F>(objectives: &mut [Objective], plans: &[ActionPlan], select: F) -> Vec<Change>
where
    F: Fn(&Objective) -> bool,
{
    let mut changes = Vec::new();
    for objective in objectives.iter_mut().filter(|o| select(o)) {
        let before = objective.achieved_percentage();
        let after = aggregation::objective_achieved(&objective.id, plans);
        if before != after {
            objective.set_achieved_percentage(after);
            changes.push(Change {
                objective: objective.id.clone(),
                goal: objective.goal_id.clone(),
                before,
                after,
            });
        }
    }
    changes
}

/// Plans whose objective is not among `objectives`
#[must_use]
pub fn dangling_plans<'a>(plans: &'a [ActionPlan], objectives: &[Objective]) -> Vec<&'a ActionPlan> {
    plans
        .iter()
        .filter(|plan| !objectives.iter().any(|o| o.id == plan.objective_id))
        .collect()
}
