//! Read models
//!
//! Built on demand by [`PlanningService`](crate::PlanningService); nothing
//! here is persisted.

use serde::Serialize;
use strata_domain::{ActionPlan, CompanyId, Goal, Objective, Percent, Perspective};

/// Goal with its computed completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    goal: Goal,
    completion: Percent,
}

impl GoalSummary {
    /// Create new summary
    #[inline]
    #[must_use]
    pub fn new(goal: Goal, completion: Percent) -> Self {
        Self { goal, completion }
    }

    #[inline]
    #[must_use]
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    #[inline]
    #[must_use]
    pub fn completion(&self) -> Percent {
        self.completion
    }
}

/// Perspective with its goals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerspectiveSummary {
    perspective: Perspective,
    goals: Vec<GoalSummary>,
    completion: Percent,
}

impl PerspectiveSummary {
    /// Create new summary; completion is the rounded mean of the goals'
    #[must_use]
    pub fn new(perspective: Perspective, goals: Vec<GoalSummary>) -> Self {
        let completion = Percent::mean(goals.iter().map(GoalSummary::completion));
        Self {
            perspective,
            goals,
            completion,
        }
    }

    #[inline]
    #[must_use]
    pub fn perspective(&self) -> &Perspective {
        &self.perspective
    }

    #[inline]
    #[must_use]
    pub fn goals(&self) -> &[GoalSummary] {
        &self.goals
    }

    #[inline]
    #[must_use]
    pub fn completion(&self) -> Percent {
        self.completion
    }
}

/// Strategic map of one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicMap {
    company_id: CompanyId,
    perspectives: Vec<PerspectiveSummary>,
}

impl StrategicMap {
    /// Create new map
    #[inline]
    #[must_use]
    pub fn new(company_id: CompanyId, perspectives: Vec<PerspectiveSummary>) -> Self {
        Self {
            company_id,
            perspectives,
        }
    }

    #[inline]
    #[must_use]
    pub fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    #[inline]
    #[must_use]
    pub fn perspectives(&self) -> &[PerspectiveSummary] {
        &self.perspectives
    }

    /// Check if the company has no perspectives
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.perspectives.is_empty()
    }
}

/// Objective with its linked action plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveDetail {
    objective: Objective,
    action_plans: Vec<ActionPlan>,
}

impl ObjectiveDetail {
    /// Create new detail view
    #[inline]
    #[must_use]
    pub fn new(objective: Objective, action_plans: Vec<ActionPlan>) -> Self {
        Self {
            objective,
            action_plans,
        }
    }

    #[inline]
    #[must_use]
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    #[inline]
    #[must_use]
    pub fn action_plans(&self) -> &[ActionPlan] {
        &self.action_plans
    }
}
