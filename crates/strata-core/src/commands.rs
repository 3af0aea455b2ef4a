//! Command payloads for the planning service
//!
//! `New*` payloads create records; `*Patch` payloads edit them, leaving
//! `None` fields unchanged. No payload can set an objective's achieved
//! percentage.

use chrono::NaiveDate;
use strata_domain::{CompanyId, GoalId, ObjectiveId, Percent, PerspectiveId, UserId};

/// New action plan
#[derive(Debug, Clone)]
pub struct NewActionPlan {
    pub description: String,
    pub objective_id: ObjectiveId,
    pub company_id: CompanyId,
    pub responsible_id: Option<UserId>,
    pub how_to: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewActionPlan {
    /// Create payload with required fields
    #[inline]
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        objective_id: ObjectiveId,
        company_id: CompanyId,
    ) -> Self {
        Self {
            description: description.into(),
            objective_id,
            company_id,
            responsible_id: None,
            how_to: String::new(),
            start_date: None,
            end_date: None,
        }
    }

    /// With responsible user
    #[inline]
    #[must_use]
    pub fn with_responsible(mut self, user: UserId) -> Self {
        self.responsible_id = Some(user);
        self
    }

    /// With execution notes
    #[inline]
    #[must_use]
    pub fn with_how_to(mut self, how_to: impl Into<String>) -> Self {
        self.how_to = how_to.into();
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
}

/// Edit to an action plan
#[derive(Debug, Clone, Default)]
pub struct ActionPlanPatch {
    pub description: Option<String>,
    pub objective_id: Option<ObjectiveId>,
    pub responsible_id: Option<UserId>,
    pub how_to: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Direct progress edit; unlike a check-in this may lower progress
    pub progress: Option<Percent>,
}

impl ActionPlanPatch {
    /// Progress edit
    #[inline]
    #[must_use]
    pub fn progress(progress: Percent) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }

    /// Move the plan to another objective
    #[inline]
    #[must_use]
    pub fn move_to(objective: ObjectiveId) -> Self {
        Self {
            objective_id: Some(objective),
            ..Self::default()
        }
    }
}

/// New check-in
#[derive(Debug, Clone)]
pub struct NewCheckIn {
    pub progress: Percent,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub description: String,
}

impl NewCheckIn {
    /// Create check-in payload dated today
    #[inline]
    #[must_use]
    pub fn new(progress: Percent) -> Self {
        Self {
            progress,
            date: None,
            description: String::new(),
        }
    }

    /// With explicit date
    #[inline]
    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// New objective
#[derive(Debug, Clone)]
pub struct NewObjective {
    pub description: String,
    pub goal_id: GoalId,
    pub company_id: CompanyId,
    pub progress: Percent,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewObjective {
    /// Create payload with zero progress
    #[inline]
    #[must_use]
    pub fn new(description: impl Into<String>, goal_id: GoalId, company_id: CompanyId) -> Self {
        Self {
            description: description.into(),
            goal_id,
            company_id,
            progress: Percent::ZERO,
            start_date: None,
            end_date: None,
        }
    }

    /// With manual progress
    #[inline]
    #[must_use]
    pub fn with_progress(mut self, progress: Percent) -> Self {
        self.progress = progress;
        self
    }
}

/// Edit to an objective
#[derive(Debug, Clone, Default)]
pub struct ObjectivePatch {
    pub description: Option<String>,
    pub goal_id: Option<GoalId>,
    pub progress: Option<Percent>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ObjectivePatch {
    /// Manual progress edit
    #[inline]
    #[must_use]
    pub fn progress(progress: Percent) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }

    /// Move the objective to another goal
    #[inline]
    #[must_use]
    pub fn move_to(goal: GoalId) -> Self {
        Self {
            goal_id: Some(goal),
            ..Self::default()
        }
    }
}

/// New goal
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub description: String,
    pub perspective_id: PerspectiveId,
    pub company_id: CompanyId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewGoal {
    /// Create payload without dates
    #[inline]
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        perspective_id: PerspectiveId,
        company_id: CompanyId,
    ) -> Self {
        Self {
            description: description.into(),
            perspective_id,
            company_id,
            start_date: None,
            end_date: None,
        }
    }
}

/// Edit to a goal
#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub description: Option<String>,
    pub perspective_id: Option<PerspectiveId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
