//! Planning service
//!
//! The only way to mutate planning records. Each command:
//! 1. Loads full snapshots of the collections it touches
//! 2. Applies the edit
//! 3. Runs the [`Mutation`]'s effects against the snapshot
//! 4. Commits every touched collection in one [`Batch`]
//! 5. Drops cached completions of goals whose objectives changed
//!
//! Commands hold an exclusive guard from step 1 to step 5, so cached reads
//! never observe a half-applied mutation.

use crate::cache::GoalCompletionCache;
use crate::commands::{
    ActionPlanPatch, GoalPatch, NewActionPlan, NewCheckIn, NewGoal, NewObjective, ObjectivePatch,
};
use crate::config::StrataConfig;
use crate::error::PlanningError;
use crate::ids::{Clock, IdGenerator, SystemClock, UlidGenerator};
use crate::map::{GoalSummary, ObjectiveDetail, PerspectiveSummary, StrategicMap};
use parking_lot::RwLock;
use std::convert::Infallible;
use std::sync::Arc;
use strata_domain::propagation::{self, Change, Effect, Mutation};
use strata_domain::{
    aggregation, apply_check_in, ActionPlan, ActionPlanId, CheckIn, CheckInId, CompanyId, Goal,
    GoalId, Objective, ObjectiveId, Percent, Perspective, PerspectiveId,
};
use strata_store::{Batch, EntityStore, EntityStoreExt};

/// Loaded plans and objectives, across all companies
///
/// Collections are written back whole, so mutations always load unfiltered.
struct Snapshot {
    plans: Vec<ActionPlan>,
    objectives: Vec<Objective>,
}

impl Snapshot {
    fn into_batch(self) -> Result<Batch, PlanningError> {
        Ok(Batch::new().put(&self.plans)?.put(&self.objectives)?)
    }
}

/// Planning service over an entity store
pub struct PlanningService<S> {
    store: S,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    cache: Option<GoalCompletionCache>,
    guard: RwLock<()>,
}

impl<S> std::fmt::Debug for PlanningService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanningService")
            .field("ids", &self.ids)
            .field("clock", &self.clock)
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: EntityStore> PlanningService<S> {
    /// Create service with ULID ids, the system clock and a default cache
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            ids: Arc::new(UlidGenerator),
            clock: Arc::new(SystemClock),
            cache: Some(GoalCompletionCache::default()),
            guard: RwLock::new(()),
        }
    }

    /// Create service with cache settings from configuration
    #[must_use]
    pub fn from_config(store: S, config: &StrataConfig) -> Self {
        Self {
            cache: GoalCompletionCache::from_config(&config.cache),
            ..Self::new(store)
        }
    }

    /// With identifier source
    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// With clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// With goal completion cache
    #[must_use]
    pub fn with_cache(mut self, cache: GoalCompletionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Compute goal completion on every read
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Goal completion cache, if enabled
    #[inline]
    #[must_use]
    pub fn cache(&self) -> Option<&GoalCompletionCache> {
        self.cache.as_ref()
    }

    // ------------------------------------------------------------------
    // Action plans
    // ------------------------------------------------------------------

    /// Create an action plan with zero progress under an existing objective
    ///
    /// # Errors
    /// [`PlanningError::ObjectiveNotFound`] when the objective is missing or
    /// belongs to another company, or a store failure
    pub fn create_action_plan(&self, new: NewActionPlan) -> Result<ActionPlan, PlanningError> {
        let _guard = self.guard.write();
        let mut snapshot = self.load_snapshot()?;
        ensure_objective(&snapshot.objectives, &new.objective_id, &new.company_id)?;

        let mut plan = ActionPlan::new(
            ActionPlanId::new(self.ids.next_id()),
            new.description,
            new.objective_id,
            new.company_id,
        );
        plan.responsible_id = new.responsible_id;
        plan.how_to = new.how_to;
        plan.start_date = new.start_date;
        plan.end_date = new.end_date;

        snapshot.plans.push(plan.clone());
        let mutation = Mutation::ActionPlanCreated {
            objective: plan.objective_id.clone(),
        };
        self.commit(&mutation, snapshot)?;

        tracing::info!(plan = %plan.id, objective = %plan.objective_id, "action plan created");
        Ok(plan)
    }

    /// Edit an action plan
    ///
    /// A direct progress edit may lower progress. Moving the plan recomputes
    /// both the old and the new objective.
    ///
    /// # Errors
    /// [`PlanningError::ActionPlanNotFound`], [`PlanningError::ObjectiveNotFound`]
    /// for a move target that does not exist in the plan's company, or a
    /// store failure
    pub fn update_action_plan(
        &self,
        id: &ActionPlanId,
        patch: ActionPlanPatch,
    ) -> Result<ActionPlan, PlanningError> {
        let _guard = self.guard.write();
        let mut snapshot = self.load_snapshot()?;
        let index = find_plan(&snapshot.plans, id)?;

        if let Some(target) = &patch.objective_id {
            ensure_objective(&snapshot.objectives, target, &snapshot.plans[index].company_id)?;
        }

        let plan = &mut snapshot.plans[index];
        let from = plan.objective_id.clone();
        if let Some(description) = patch.description {
            plan.description = description;
        }
        if let Some(objective) = patch.objective_id {
            plan.objective_id = objective;
        }
        if let Some(responsible) = patch.responsible_id {
            plan.responsible_id = Some(responsible);
        }
        if let Some(how_to) = patch.how_to {
            plan.how_to = how_to;
        }
        if let Some(start) = patch.start_date {
            plan.start_date = Some(start);
        }
        if let Some(end) = patch.end_date {
            plan.end_date = Some(end);
        }
        if let Some(progress) = patch.progress {
            plan.progress = progress;
        }

        let plan = plan.clone();
        let mutation = if from == plan.objective_id {
            Mutation::ActionPlanProgressChanged { objective: from }
        } else {
            Mutation::ActionPlanMoved {
                from,
                to: plan.objective_id.clone(),
            }
        };
        self.commit(&mutation, snapshot)?;

        tracing::info!(plan = %plan.id, progress = %plan.progress, "action plan updated");
        Ok(plan)
    }

    /// Delete an action plan and recompute its former objective
    ///
    /// # Errors
    /// [`PlanningError::ActionPlanNotFound`] or a store failure
    pub fn delete_action_plan(&self, id: &ActionPlanId) -> Result<ActionPlan, PlanningError> {
        let _guard = self.guard.write();
        let mut snapshot = self.load_snapshot()?;
        let index = find_plan(&snapshot.plans, id)?;

        let plan = snapshot.plans.remove(index);
        let mutation = Mutation::ActionPlanDeleted {
            objective: plan.objective_id.clone(),
        };
        self.commit(&mutation, snapshot)?;

        tracing::info!(plan = %plan.id, objective = %plan.objective_id, "action plan deleted");
        Ok(plan)
    }

    /// Record a check-in and recompute the plan's objective
    ///
    /// The plan's progress becomes `max(progress, check_in.progress)`; the
    /// check-in is kept either way. Undated check-ins are dated today.
    ///
    /// # Errors
    /// [`PlanningError::ActionPlanNotFound`] or a store failure
    pub fn record_check_in(
        &self,
        plan_id: &ActionPlanId,
        new: NewCheckIn,
    ) -> Result<ActionPlan, PlanningError> {
        let _guard = self.guard.write();
        let mut snapshot = self.load_snapshot()?;
        let index = find_plan(&snapshot.plans, plan_id)?;

        let date = new.date.unwrap_or_else(|| self.clock.today());
        let check_in = CheckIn::new(
            CheckInId::new(self.ids.next_id()),
            plan_id.clone(),
            date,
            new.progress,
        )
        .with_description(new.description);

        let before = snapshot.plans[index].progress;
        let plan = apply_check_in(snapshot.plans[index].clone(), check_in);
        snapshot.plans[index] = plan.clone();

        let mutation = Mutation::ActionPlanProgressChanged {
            objective: plan.objective_id.clone(),
        };
        self.commit(&mutation, snapshot)?;

        tracing::info!(
            plan = %plan.id,
            reported = %new.progress,
            before = %before,
            after = %plan.progress,
            "check-in recorded"
        );
        Ok(plan)
    }

    // ------------------------------------------------------------------
    // Objectives
    // ------------------------------------------------------------------

    /// Create an objective under an existing goal
    ///
    /// # Errors
    /// [`PlanningError::GoalNotFound`] when the goal is missing or belongs to
    /// another company, or a store failure
    pub fn create_objective(&self, new: NewObjective) -> Result<Objective, PlanningError> {
        let _guard = self.guard.write();
        ensure_goal(&self.store.load::<Goal>(None)?, &new.goal_id, &new.company_id)?;
        let mut snapshot = self.load_snapshot()?;

        let mut objective = Objective::new(
            ObjectiveId::new(self.ids.next_id()),
            new.description,
            new.goal_id,
            new.company_id,
        )
        .with_progress(new.progress);
        objective.start_date = new.start_date;
        objective.end_date = new.end_date;

        snapshot.objectives.push(objective.clone());
        let mutation = Mutation::ObjectiveCreated {
            goal: objective.goal_id.clone(),
        };
        self.commit(&mutation, snapshot)?;

        tracing::info!(objective = %objective.id, goal = %objective.goal_id, "objective created");
        Ok(objective)
    }

    /// Edit an objective's manual progress or descriptive fields
    ///
    /// The achieved percentage cannot be set here.
    ///
    /// # Errors
    /// [`PlanningError::ObjectiveNotFound`], [`PlanningError::GoalNotFound`]
    /// for a move target that does not exist in the objective's company, or a
    /// store failure
    pub fn update_objective(
        &self,
        id: &ObjectiveId,
        patch: ObjectivePatch,
    ) -> Result<Objective, PlanningError> {
        let _guard = self.guard.write();
        let mut snapshot = self.load_snapshot()?;
        let index = find_objective(&snapshot.objectives, id)?;
        if let Some(target) = &patch.goal_id {
            let company = &snapshot.objectives[index].company_id;
            ensure_goal(&self.store.load::<Goal>(None)?, target, company)?;
        }

        let objective = &mut snapshot.objectives[index];
        let from = objective.goal_id.clone();
        if let Some(description) = patch.description {
            objective.description = description;
        }
        if let Some(goal) = patch.goal_id {
            objective.goal_id = goal;
        }
        if let Some(progress) = patch.progress {
            objective.progress = progress;
        }
        if let Some(start) = patch.start_date {
            objective.start_date = Some(start);
        }
        if let Some(end) = patch.end_date {
            objective.end_date = Some(end);
        }

        let objective = objective.clone();
        let mutation = if from == objective.goal_id {
            Mutation::ObjectiveEdited { goal: from }
        } else {
            Mutation::ObjectiveMoved {
                from,
                to: objective.goal_id.clone(),
            }
        };
        self.commit(&mutation, snapshot)?;

        tracing::info!(objective = %objective.id, progress = %objective.progress, "objective updated");
        Ok(objective)
    }

    /// Delete an objective
    ///
    /// Its action plans are kept; they no longer contribute anywhere.
    ///
    /// # Errors
    /// [`PlanningError::ObjectiveNotFound`] or a store failure
    pub fn delete_objective(&self, id: &ObjectiveId) -> Result<Objective, PlanningError> {
        let _guard = self.guard.write();
        let mut snapshot = self.load_snapshot()?;
        let index = find_objective(&snapshot.objectives, id)?;

        let objective = snapshot.objectives.remove(index);
        let orphaned = snapshot
            .plans
            .iter()
            .filter(|plan| plan.objective_id == objective.id)
            .count();
        let mutation = Mutation::ObjectiveDeleted {
            goal: objective.goal_id.clone(),
        };
        self.commit(&mutation, snapshot)?;

        tracing::info!(objective = %objective.id, orphaned, "objective deleted");
        Ok(objective)
    }

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    /// Create a goal under an existing perspective
    ///
    /// # Errors
    /// [`PlanningError::PerspectiveNotFound`] when the perspective is missing
    /// or belongs to another company, or a store failure
    pub fn create_goal(&self, new: NewGoal) -> Result<Goal, PlanningError> {
        let _guard = self.guard.write();
        let perspectives = self.store.load::<Perspective>(None)?;
        ensure_perspective(&perspectives, &new.perspective_id, &new.company_id)?;
        let mut goals = self.store.load::<Goal>(None)?;

        let mut goal = Goal::new(
            GoalId::new(self.ids.next_id()),
            new.description,
            new.perspective_id,
            new.company_id,
        );
        goal.start_date = new.start_date;
        goal.end_date = new.end_date;

        goals.push(goal.clone());
        self.store.save(&goals)?;

        tracing::info!(goal = %goal.id, perspective = %goal.perspective_id, "goal created");
        Ok(goal)
    }

    /// Edit a goal; never triggers recomputation
    ///
    /// # Errors
    /// [`PlanningError::GoalNotFound`], [`PlanningError::PerspectiveNotFound`]
    /// for a move target that does not exist in the goal's company, or a store
    /// failure
    pub fn update_goal(&self, id: &GoalId, patch: GoalPatch) -> Result<Goal, PlanningError> {
        let _guard = self.guard.write();
        let mut goals = self.store.load::<Goal>(None)?;
        let goal = goals
            .iter_mut()
            .find(|goal| &goal.id == id)
            .ok_or_else(|| PlanningError::GoalNotFound(id.clone()))?;
        if let Some(target) = &patch.perspective_id {
            let perspectives = self.store.load::<Perspective>(None)?;
            ensure_perspective(&perspectives, target, &goal.company_id)?;
        }

        if let Some(description) = patch.description {
            goal.description = description;
        }
        if let Some(perspective) = patch.perspective_id {
            goal.perspective_id = perspective;
        }
        if let Some(start) = patch.start_date {
            goal.start_date = Some(start);
        }
        if let Some(end) = patch.end_date {
            goal.end_date = Some(end);
        }

        let goal = goal.clone();
        self.store.save(&goals)?;

        tracing::info!(goal = %goal.id, "goal updated");
        Ok(goal)
    }

    /// Delete a goal
    ///
    /// Its objectives are kept and stop contributing to any perspective.
    ///
    /// # Errors
    /// [`PlanningError::GoalNotFound`] or a store failure
    pub fn delete_goal(&self, id: &GoalId) -> Result<Goal, PlanningError> {
        let _guard = self.guard.write();
        let mut goals = self.store.load::<Goal>(None)?;
        let index = goals
            .iter()
            .position(|goal| &goal.id == id)
            .ok_or_else(|| PlanningError::GoalNotFound(id.clone()))?;

        let goal = goals.remove(index);
        self.store.save(&goals)?;
        if let Some(cache) = &self.cache {
            cache.invalidate(&goal.id);
        }

        tracing::info!(goal = %goal.id, "goal deleted");
        Ok(goal)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Stored achieved percentage of an objective
    ///
    /// # Errors
    /// [`PlanningError::ObjectiveNotFound`] or a store failure
    pub fn objective_achieved(&self, id: &ObjectiveId) -> Result<Percent, PlanningError> {
        let _guard = self.guard.read();
        let objectives = self.store.load::<Objective>(None)?;
        let index = find_objective(&objectives, id)?;
        Ok(objectives[index].achieved_percentage())
    }

    /// An objective with its linked action plans
    ///
    /// # Errors
    /// [`PlanningError::ObjectiveNotFound`] or a store failure
    pub fn objective_detail(&self, id: &ObjectiveId) -> Result<ObjectiveDetail, PlanningError> {
        let _guard = self.guard.read();
        let mut objectives = self.store.load::<Objective>(None)?;
        let index = find_objective(&objectives, id)?;
        let objective = objectives.swap_remove(index);

        let plans = self
            .store
            .load::<ActionPlan>(Some(&objective.company_id))?
            .into_iter()
            .filter(|plan| plan.objective_id == objective.id)
            .collect();
        Ok(ObjectiveDetail::new(objective, plans))
    }

    /// Completion of a goal, 0 when nothing references it
    ///
    /// # Errors
    /// Store failure
    pub fn goal_completion(&self, id: &GoalId) -> Result<Percent, PlanningError> {
        let _guard = self.guard.read();
        let compute = || -> Result<Percent, PlanningError> {
            let objectives = self.store.load::<Objective>(None)?;
            Ok(aggregation::goal_completion(id, &objectives))
        };
        match &self.cache {
            Some(cache) => cache.get_or_insert_with(id, compute),
            None => compute(),
        }
    }

    /// Completion of a perspective: rounded mean of its goals' completions
    ///
    /// # Errors
    /// Store failure
    pub fn perspective_completion(&self, id: &PerspectiveId) -> Result<Percent, PlanningError> {
        let _guard = self.guard.read();
        let goals = self.store.load::<Goal>(None)?;
        let objectives = self.store.load::<Objective>(None)?;
        Ok(aggregation::perspective_completion(id, &goals, &objectives))
    }

    /// Every perspective of a company with its goals and their completions
    ///
    /// Perspectives and goals keep their stored order. Goal completions count
    /// every objective under the goal, as [`Self::goal_completion`] does.
    ///
    /// # Errors
    /// Store failure
    pub fn strategic_map(&self, company: &CompanyId) -> Result<StrategicMap, PlanningError> {
        let _guard = self.guard.read();
        let perspectives = self.store.load::<Perspective>(Some(company))?;
        let mut goals = self.store.load::<Goal>(Some(company))?;
        let objectives = self.store.load::<Objective>(None)?;

        let summaries = perspectives
            .into_iter()
            .map(|perspective| {
                let (mine, rest): (Vec<Goal>, Vec<Goal>) = goals
                    .drain(..)
                    .partition(|goal| goal.perspective_id == perspective.id);
                goals = rest;

                let goals = mine
                    .into_iter()
                    .map(|goal| {
                        let completion = self.completion_of(&goal.id, &objectives);
                        GoalSummary::new(goal, completion)
                    })
                    .collect();
                PerspectiveSummary::new(perspective, goals)
            })
            .collect();

        if !goals.is_empty() {
            tracing::debug!(
                %company,
                count = goals.len(),
                "goals without a perspective left off the map"
            );
        }
        Ok(StrategicMap::new(company.clone(), summaries))
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Recompute every stored achieved percentage of a company
    ///
    /// Repairs datasets written without propagation or left behind by a
    /// partially committed file batch. Returns only the
    /// objectives whose stored value changed.
    ///
    /// # Errors
    /// Store failure
    pub fn reconcile(&self, company: &CompanyId) -> Result<Vec<Change>, PlanningError> {
        let _guard = self.guard.write();
        let mut snapshot = self.load_snapshot()?;

        for plan in propagation::dangling_plans(&snapshot.plans, &snapshot.objectives) {
            if &plan.company_id == company {
                tracing::warn!(
                    plan = %plan.id,
                    objective = %plan.objective_id,
                    "action plan references a missing objective"
                );
            }
        }

        let changes = propagation::refresh_where(&mut snapshot.objectives, &snapshot.plans, |o| {
            &o.company_id == company
        });
        if changes.is_empty() {
            tracing::info!(%company, "reconcile found nothing to repair");
            return Ok(changes);
        }

        self.store.apply(Batch::new().put(&snapshot.objectives)?)?;
        self.invalidate(changes.iter().map(|change| &change.goal));

        tracing::info!(%company, repaired = changes.len(), "reconcile complete");
        Ok(changes)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn load_snapshot(&self) -> Result<Snapshot, PlanningError> {
        Ok(Snapshot {
            plans: self.store.load(None)?,
            objectives: self.store.load(None)?,
        })
    }

    /// Run a mutation's effects, persist the snapshot, then drop stale cache entries
    fn commit(&self, mutation: &Mutation, mut snapshot: Snapshot) -> Result<(), PlanningError> {
        let mut stale = Vec::new();
        for effect in mutation.effects() {
            match effect {
                Effect::RecomputeObjective(objective) => {
                    match propagation::refresh_objective(
                        &mut snapshot.objectives,
                        &objective,
                        &snapshot.plans,
                    ) {
                        Some(change) => {
                            tracing::debug!(
                                objective = %change.objective,
                                before = %change.before,
                                after = %change.after,
                                "achieved percentage recomputed"
                            );
                            if change.is_changed() {
                                stale.push(change.goal);
                            }
                        }
                        None => {
                            tracing::debug!(%objective, "recompute skipped, objective missing");
                        }
                    }
                }
                Effect::InvalidateGoal(goal) => stale.push(goal),
            }
        }

        self.store.apply(snapshot.into_batch()?)?;
        self.invalidate(stale.iter());
        Ok(())
    }

    fn invalidate<'a>(&self, goals: impl IntoIterator<Item = &'a GoalId>) {
        if let Some(cache) = &self.cache {
            for goal in goals {
                tracing::debug!(%goal, "goal completion invalidated");
                cache.invalidate(goal);
            }
        }
    }

    fn completion_of(&self, goal: &GoalId, objectives: &[Objective]) -> Percent {
        let compute = || Ok::<_, Infallible>(aggregation::goal_completion(goal, objectives));
        let result = match &self.cache {
            Some(cache) => cache.get_or_insert_with(goal, compute),
            None => compute(),
        };
        match result {
            Ok(completion) => completion,
            Err(never) => match never {},
        }
    }
}

fn find_plan(plans: &[ActionPlan], id: &ActionPlanId) -> Result<usize, PlanningError> {
    plans
        .iter()
        .position(|plan| &plan.id == id)
        .ok_or_else(|| PlanningError::ActionPlanNotFound(id.clone()))
}

fn find_objective(objectives: &[Objective], id: &ObjectiveId) -> Result<usize, PlanningError> {
    objectives
        .iter()
        .position(|objective| &objective.id == id)
        .ok_or_else(|| PlanningError::ObjectiveNotFound(id.clone()))
}

// Parents in another company are reported as missing.

fn ensure_objective(
    objectives: &[Objective],
    id: &ObjectiveId,
    company: &CompanyId,
) -> Result<(), PlanningError> {
    if objectives
        .iter()
        .any(|objective| &objective.id == id && &objective.company_id == company)
    {
        Ok(())
    } else {
        Err(PlanningError::ObjectiveNotFound(id.clone()))
    }
}

fn ensure_goal(goals: &[Goal], id: &GoalId, company: &CompanyId) -> Result<(), PlanningError> {
    if goals
        .iter()
        .any(|goal| &goal.id == id && &goal.company_id == company)
    {
        Ok(())
    } else {
        Err(PlanningError::GoalNotFound(id.clone()))
    }
}

fn ensure_perspective(
    perspectives: &[Perspective],
    id: &PerspectiveId,
    company: &CompanyId,
) -> Result<(), PlanningError> {
    if perspectives
        .iter()
        .any(|perspective| &perspective.id == id && &perspective.company_id == company)
    {
        Ok(())
    } else {
        Err(PlanningError::PerspectiveNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU64, Ordering};
    use strata_store::{EntityKind, MemoryStore, MockEntityStore, StoreError};

    #[derive(Debug, Default)]
    struct Counter(AtomicU64);

    impl IdGenerator for Counter {
        fn next_id(&self) -> String {
            format!("id{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[derive(Debug)]
    struct Fixed;

    impl Clock for Fixed {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        }
    }

    fn pct(v: u32) -> Percent {
        Percent::new(v).unwrap()
    }

    fn acme() -> CompanyId {
        CompanyId::new("acme")
    }

    /// Perspective "per", goal "g1", objective "o1"
    fn seeded() -> PlanningService<MemoryStore> {
        let store = MemoryStore::new();
        store
            .save(&[Perspective::new(PerspectiveId::new("per"), "Financial", acme())])
            .unwrap();
        store
            .save(&[Goal::new(GoalId::new("g1"), "Grow", PerspectiveId::new("per"), acme())])
            .unwrap();
        store
            .save(&[Objective::new(ObjectiveId::new("o1"), "Revenue", GoalId::new("g1"), acme())])
            .unwrap();
        PlanningService::new(store)
            .with_ids(Arc::new(Counter::default()))
            .with_clock(Arc::new(Fixed))
    }

    fn add_plan(service: &PlanningService<MemoryStore>, objective: &str) -> ActionPlan {
        service
            .create_action_plan(NewActionPlan::new("plan", ObjectiveId::new(objective), acme()))
            .unwrap()
    }

    #[test]
    fn create_plan_starts_at_zero() {
        let service = seeded();
        let plan = add_plan(&service, "o1");

        assert_eq!(plan.id, ActionPlanId::new("id1"));
        assert_eq!(plan.progress, Percent::ZERO);
        assert!(plan.check_ins().is_empty());
        assert_eq!(service.objective_achieved(&ObjectiveId::new("o1")).unwrap(), Percent::ZERO);
    }

    #[test]
    fn create_plan_under_missing_objective_fails() {
        let service = seeded();
        let err = service
            .create_action_plan(NewActionPlan::new("plan", ObjectiveId::new("nope"), acme()))
            .unwrap_err();
        assert!(matches!(err, PlanningError::ObjectiveNotFound(_)));
        assert_eq!(service.store().len(EntityKind::ActionPlans), 0);
    }

    #[test]
    fn check_in_recomputes_objective() {
        let service = seeded();
        let p1 = add_plan(&service, "o1");
        add_plan(&service, "o1");

        let plan = service.record_check_in(&p1.id, NewCheckIn::new(pct(60))).unwrap();
        assert_eq!(plan.progress, pct(60));
        assert_eq!(plan.check_ins()[0].date, Fixed.today());
        assert_eq!(service.objective_achieved(&ObjectiveId::new("o1")).unwrap(), pct(30));

        // Lower report is kept but does not lower progress
        let plan = service.record_check_in(&p1.id, NewCheckIn::new(pct(40))).unwrap();
        assert_eq!(plan.progress, pct(60));
        assert_eq!(plan.check_ins().len(), 2);
        assert_eq!(service.objective_achieved(&ObjectiveId::new("o1")).unwrap(), pct(30));
    }

    #[test]
    fn check_in_on_missing_plan_fails() {
        let service = seeded();
        let err = service
            .record_check_in(&ActionPlanId::new("ghost"), NewCheckIn::new(pct(10)))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn direct_progress_edit_may_lower() {
        let service = seeded();
        let plan = add_plan(&service, "o1");
        service.record_check_in(&plan.id, NewCheckIn::new(pct(80))).unwrap();

        service
            .update_action_plan(&plan.id, ActionPlanPatch::progress(pct(20)))
            .unwrap();
        assert_eq!(service.objective_achieved(&ObjectiveId::new("o1")).unwrap(), pct(20));
    }

    #[test]
    fn moving_a_plan_recomputes_both_objectives() {
        let service = seeded();
        let o2 = service
            .create_objective(NewObjective::new("Margin", GoalId::new("g1"), acme()))
            .unwrap();
        let plan = add_plan(&service, "o1");
        service.record_check_in(&plan.id, NewCheckIn::new(pct(50))).unwrap();

        service
            .update_action_plan(&plan.id, ActionPlanPatch::move_to(o2.id.clone()))
            .unwrap();
        assert_eq!(service.objective_achieved(&ObjectiveId::new("o1")).unwrap(), Percent::ZERO);
        assert_eq!(service.objective_achieved(&o2.id).unwrap(), pct(50));
    }

    #[test]
    fn deleting_a_plan_recomputes_former_objective() {
        let service = seeded();
        let keep = add_plan(&service, "o1");
        let drop = add_plan(&service, "o1");
        service.record_check_in(&keep.id, NewCheckIn::new(pct(40))).unwrap();
        service.record_check_in(&drop.id, NewCheckIn::new(pct(100))).unwrap();
        assert_eq!(service.objective_achieved(&ObjectiveId::new("o1")).unwrap(), pct(70));

        service.delete_action_plan(&drop.id).unwrap();
        assert_eq!(service.objective_achieved(&ObjectiveId::new("o1")).unwrap(), pct(40));
    }

    #[test]
    fn goal_completion_tracks_objective_edits_through_cache() {
        let service = seeded();
        let goal = GoalId::new("g1");
        assert_eq!(service.goal_completion(&goal).unwrap(), Percent::ZERO);
        assert!(service.cache().unwrap().contains(&goal));

        service
            .update_objective(&ObjectiveId::new("o1"), ObjectivePatch::progress(pct(45)))
            .unwrap();
        assert!(!service.cache().unwrap().contains(&goal));
        assert_eq!(service.goal_completion(&goal).unwrap(), pct(45));
    }

    #[test]
    fn recompute_invalidates_cached_goal() {
        let service = seeded();
        let goal = GoalId::new("g1");
        let plan = add_plan(&service, "o1");
        assert_eq!(service.goal_completion(&goal).unwrap(), Percent::ZERO);

        service.record_check_in(&plan.id, NewCheckIn::new(pct(90))).unwrap();
        assert_eq!(service.goal_completion(&goal).unwrap(), pct(90));
    }

    #[test]
    fn objective_move_invalidates_both_goals() {
        let service = seeded();
        let g2 = service
            .create_goal(NewGoal::new("Retain", PerspectiveId::new("per"), acme()))
            .unwrap();
        service
            .update_objective(&ObjectiveId::new("o1"), ObjectivePatch::progress(pct(60)))
            .unwrap();
        assert_eq!(service.goal_completion(&GoalId::new("g1")).unwrap(), pct(60));
        assert_eq!(service.goal_completion(&g2.id).unwrap(), Percent::ZERO);

        service
            .update_objective(&ObjectiveId::new("o1"), ObjectivePatch::move_to(g2.id.clone()))
            .unwrap();
        assert_eq!(service.goal_completion(&GoalId::new("g1")).unwrap(), Percent::ZERO);
        assert_eq!(service.goal_completion(&g2.id).unwrap(), pct(60));
    }

    #[test]
    fn deleting_objective_leaves_plans_dangling() {
        let service = seeded();
        let plan = add_plan(&service, "o1");
        service.record_check_in(&plan.id, NewCheckIn::new(pct(70))).unwrap();
        assert_eq!(service.goal_completion(&GoalId::new("g1")).unwrap(), pct(70));

        service.delete_objective(&ObjectiveId::new("o1")).unwrap();
        assert_eq!(service.store().len(EntityKind::ActionPlans), 1);
        assert_eq!(service.goal_completion(&GoalId::new("g1")).unwrap(), Percent::ZERO);
    }

    #[test]
    fn goal_commands_check_their_perspective() {
        let service = seeded();
        let err = service
            .create_goal(NewGoal::new("Orphan", PerspectiveId::new("none"), acme()))
            .unwrap_err();
        assert!(matches!(err, PlanningError::PerspectiveNotFound(_)));

        let err = service
            .update_goal(
                &GoalId::new("g1"),
                GoalPatch {
                    perspective_id: Some(PerspectiveId::new("none")),
                    ..GoalPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, PlanningError::PerspectiveNotFound(_)));
    }

    #[test]
    fn parents_from_another_company_are_not_found() {
        let service = seeded();
        let other = CompanyId::new("globex");

        let err = service
            .create_action_plan(NewActionPlan::new("plan", ObjectiveId::new("o1"), other.clone()))
            .unwrap_err();
        assert!(matches!(err, PlanningError::ObjectiveNotFound(_)));

        let err = service
            .create_objective(NewObjective::new("Margin", GoalId::new("g1"), other.clone()))
            .unwrap_err();
        assert!(matches!(err, PlanningError::GoalNotFound(_)));

        let err = service
            .create_goal(NewGoal::new("Expand", PerspectiveId::new("per"), other))
            .unwrap_err();
        assert!(matches!(err, PlanningError::PerspectiveNotFound(_)));
        assert_eq!(service.store().len(EntityKind::ActionPlans), 0);
        assert_eq!(service.store().len(EntityKind::Objectives), 1);
        assert_eq!(service.store().len(EntityKind::Goals), 1);
    }

    #[test]
    fn goal_edit_does_not_touch_objectives() {
        let service = seeded();
        let before = service.store().load::<Objective>(None).unwrap();
        service
            .update_goal(
                &GoalId::new("g1"),
                GoalPatch {
                    description: Some("Grow faster".to_string()),
                    ..GoalPatch::default()
                },
            )
            .unwrap();
        assert_eq!(service.store().load::<Objective>(None).unwrap(), before);
    }

    #[test]
    fn strategic_map_groups_goals() {
        let service = seeded();
        service
            .update_objective(&ObjectiveId::new("o1"), ObjectivePatch::progress(pct(50)))
            .unwrap();
        service
            .create_goal(NewGoal::new("Retain", PerspectiveId::new("per"), acme()))
            .unwrap();

        let map = service.strategic_map(&acme()).unwrap();
        assert_eq!(map.perspectives().len(), 1);
        let financial = &map.perspectives()[0];
        assert_eq!(financial.goals().len(), 2);
        assert_eq!(financial.goals()[0].completion(), pct(50));
        assert_eq!(financial.goals()[1].completion(), Percent::ZERO);
        assert_eq!(financial.completion(), pct(25));
        assert_eq!(
            service.perspective_completion(&PerspectiveId::new("per")).unwrap(),
            pct(25)
        );
    }

    #[test]
    fn reconcile_repairs_stale_objectives() {
        let store = MemoryStore::new();
        store
            .save(&[Objective::new(ObjectiveId::new("o1"), "Revenue", GoalId::new("g1"), acme())])
            .unwrap();
        store
            .save(&[ActionPlan::new(ActionPlanId::new("p1"), "plan", ObjectiveId::new("o1"), acme())
                .with_progress(pct(80))])
            .unwrap();
        let service = PlanningService::new(store);

        let changes = service.reconcile(&acme()).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].after, pct(80));
        assert_eq!(service.objective_achieved(&ObjectiveId::new("o1")).unwrap(), pct(80));

        assert!(service.reconcile(&acme()).unwrap().is_empty());
    }

    #[test]
    fn failed_commit_leaves_cache_alone() {
        let mut store = MockEntityStore::new();
        store
            .expect_read_all()
            .withf(|kind, _| *kind == EntityKind::ActionPlans)
            .returning(|_, _| {
                Ok(vec![serde_json::to_value(ActionPlan::new(
                    ActionPlanId::new("p1"),
                    "plan",
                    ObjectiveId::new("o1"),
                    acme(),
                ))
                .unwrap()])
            });
        store
            .expect_read_all()
            .withf(|kind, _| *kind == EntityKind::Objectives)
            .returning(|_, _| {
                Ok(vec![serde_json::to_value(Objective::new(
                    ObjectiveId::new("o1"),
                    "Revenue",
                    GoalId::new("g1"),
                    acme(),
                ))
                .unwrap()])
            });
        store
            .expect_commit()
            .times(1)
            .returning(|_| {
                Err(StoreError::Io {
                    path: "objectives.json".into(),
                    source: std::io::Error::other("disk full"),
                })
            });

        let service = PlanningService::new(store);
        service.cache().unwrap().insert(GoalId::new("g1"), pct(5));

        let err = service
            .record_check_in(&ActionPlanId::new("p1"), NewCheckIn::new(pct(50)))
            .unwrap_err();
        assert!(matches!(err, PlanningError::Store(_)));
        assert_eq!(service.cache().unwrap().get(&GoalId::new("g1")), Some(pct(5)));
    }

    #[test]
    fn check_in_commits_plans_and_objectives_together() {
        let mut store = MockEntityStore::new();
        store.expect_read_all().returning(|kind, _| match kind {
            EntityKind::ActionPlans => Ok(vec![serde_json::to_value(ActionPlan::new(
                ActionPlanId::new("p1"),
                "plan",
                ObjectiveId::new("o1"),
                acme(),
            ))
            .unwrap()]),
            EntityKind::Objectives => Ok(vec![serde_json::to_value(Objective::new(
                ObjectiveId::new("o1"),
                "Revenue",
                GoalId::new("g1"),
                acme(),
            ))
            .unwrap()]),
            _ => Ok(Vec::new()),
        });
        store
            .expect_commit()
            .times(1)
            .withf(|writes| {
                let kinds: Vec<_> = writes.iter().map(|(kind, _)| *kind).collect();
                let achieved = writes
                    .iter()
                    .find(|(kind, _)| *kind == EntityKind::Objectives)
                    .and_then(|(_, records)| records[0].get("achievedPercentage").cloned());
                kinds == [EntityKind::ActionPlans, EntityKind::Objectives]
                    && achieved == Some(serde_json::json!(50))
            })
            .returning(|_| Ok(()));
        store.expect_write_all().never();

        let service = PlanningService::new(store).without_cache();
        service
            .record_check_in(&ActionPlanId::new("p1"), NewCheckIn::new(pct(50)))
            .unwrap();
    }
}
