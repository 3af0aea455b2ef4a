//! Planning hierarchy: Goal -> Objective -> ActionPlan -> CheckIn

use crate::id::{ActionPlanId, CheckInId, CompanyId, GoalId, ObjectiveId, PerspectiveId, UserId};
use crate::percent::Percent;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Goal under a perspective
///
/// Carries no progress of its own; completion is computed from its
/// objectives on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub perspective_id: PerspectiveId,
    pub company_id: CompanyId,
}

impl Goal {
    /// Create goal without dates
    #[inline]
    #[must_use]
    pub fn new(
        id: GoalId,
        description: impl Into<String>,
        perspective_id: PerspectiveId,
        company_id: CompanyId,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            start_date: None,
            end_date: None,
            perspective_id,
            company_id,
        }
    }

    /// With start and end dates
    #[inline]
    #[must_use]
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }
}

/// Objective under a goal
///
/// `progress` is set by users. `achieved_percentage` is derived from the
/// objective's action plans and can only be written by
/// [`propagation`](crate::propagation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: ObjectiveId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub goal_id: GoalId,
    pub company_id: CompanyId,
    #[serde(default)]
    pub progress: Percent,
    #[serde(default)]
    achieved_percentage: Percent,
}

impl Objective {
    /// Create objective with zero progress and nothing achieved
    #[inline]
    #[must_use]
    pub fn new(
        id: ObjectiveId,
        description: impl Into<String>,
        goal_id: GoalId,
        company_id: CompanyId,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            start_date: None,
            end_date: None,
            goal_id,
            company_id,
            progress: Percent::ZERO,
            achieved_percentage: Percent::ZERO,
        }
    }

    /// With manual progress
    #[inline]
    #[must_use]
    pub fn with_progress(mut self, progress: Percent) -> Self {
        self.progress = progress;
        self
    }

    /// With start and end dates
    #[inline]
    #[must_use]
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Percentage derived from linked action plans
    #[inline]
    #[must_use]
    pub fn achieved_percentage(&self) -> Percent {
        self.achieved_percentage
    }

    /// Completion this objective contributes to its goal
    ///
    /// The larger of manual progress and plan-derived achievement; the two
    /// are never averaged.
    #[inline]
    #[must_use]
    pub fn effective_completion(&self) -> Percent {
        self.progress.max(self.achieved_percentage)
    }

    pub(crate) fn set_achieved_percentage(&mut self, achieved: Percent) {
        self.achieved_percentage = achieved;
    }
}

/// Action plan under an objective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub id: ActionPlanId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub how_to: String,
    pub objective_id: ObjectiveId,
    pub company_id: CompanyId,
    #[serde(default)]
    pub progress: Percent,
    #[serde(default)]
    check_ins: Vec<CheckIn>,
}

impl ActionPlan {
    /// Create plan at zero progress with no check-ins
    #[inline]
    #[must_use]
    pub fn new(
        id: ActionPlanId,
        description: impl Into<String>,
        objective_id: ObjectiveId,
        company_id: CompanyId,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            responsible_id: None,
            start_date: None,
            end_date: None,
            how_to: String::new(),
            objective_id,
            company_id,
            progress: Percent::ZERO,
            check_ins: Vec::new(),
        }
    }

    /// With responsible user
    #[inline]
    #[must_use]
    pub fn with_responsible(mut self, user: UserId) -> Self {
        self.responsible_id = Some(user);
        self
    }

    /// With progress
    #[inline]
    #[must_use]
    pub fn with_progress(mut self, progress: Percent) -> Self {
        self.progress = progress;
        self
    }

    /// With start and end dates
    #[inline]
    #[must_use]
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Check-ins in the order they were recorded
    #[inline]
    #[must_use]
    pub fn check_ins(&self) -> &[CheckIn] {
        &self.check_ins
    }

    /// Most recently recorded check-in
    #[inline]
    #[must_use]
    pub fn last_check_in(&self) -> Option<&CheckIn> {
        self.check_ins.last()
    }

    pub(crate) fn push_check_in(&mut self, check_in: CheckIn) {
        self.check_ins.push(check_in);
    }
}

/// Progress report against an action plan
///
/// Never edited after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: CheckInId,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub progress: Percent,
    /// Owning plan; older records name this field `planId`
    #[serde(alias = "planId")]
    pub action_plan_id: ActionPlanId,
}

impl CheckIn {
    /// Create check-in for a plan
    #[inline]
    #[must_use]
    pub fn new(
        id: CheckInId,
        action_plan_id: ActionPlanId,
        date: NaiveDate,
        progress: Percent,
    ) -> Self {
        Self {
            id,
            date,
            description: String::new(),
            progress,
            action_plan_id,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
