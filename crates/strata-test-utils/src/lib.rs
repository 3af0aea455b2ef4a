//! Testing utilities for the Strata workspace
//!
//! Shared fixtures: deterministic ids and dates, record builders, and a
//! seeded two-company dataset.

#![allow(missing_docs)]

use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use strata_core::{Clock, IdGenerator, PlanningService};
use strata_domain::{
    ActionPlan, ActionPlanId, Company, CompanyId, Goal, GoalId, Objective, ObjectiveId, Percent,
    Perspective, PerspectiveId,
};
use strata_store::{EntityStore, EntityStoreExt, MemoryStore, StoreError};

/// Ids `<prefix>1`, `<prefix>2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("{}{}", self.prefix, self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Clock stuck on one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Date every fixture clock reports
pub fn today() -> NaiveDate {
    date(2024, 6, 1)
}

pub fn pct(value: u32) -> Percent {
    Percent::new(value).unwrap()
}

pub fn acme() -> CompanyId {
    CompanyId::new("acme")
}

pub fn globex() -> CompanyId {
    CompanyId::new("globex")
}

pub fn create_test_objective(id: &str, goal: &str, company: &CompanyId) -> Objective {
    Objective::new(ObjectiveId::new(id), format!("objective {id}"), GoalId::new(goal), company.clone())
}

pub fn create_test_plan(id: &str, objective: &str, company: &CompanyId, progress: u32) -> ActionPlan {
    ActionPlan::new(
        ActionPlanId::new(id),
        format!("plan {id}"),
        ObjectiveId::new(objective),
        company.clone(),
    )
    .with_progress(pct(progress))
}

/// Write the fixture dataset
///
/// `acme`: perspective `financial` with goals `grow` and `retain`,
/// perspective `customers` with goal `nps`; objective `revenue` under `grow`.
/// `globex`: perspective `gx-financial`, goal `gx-grow`, objective `gx-revenue`.
/// No action plans.
pub fn seed_store<S: EntityStore + ?Sized>(store: &S) -> Result<(), StoreError> {
    let (acme, globex) = (acme(), globex());

    store.save(&[
        Company {
            id: acme.clone(),
            name: "Acme".to_string(),
            email: "ops@acme.test".to_string(),
            phone: String::new(),
        },
        Company {
            id: globex.clone(),
            name: "Globex".to_string(),
            email: String::new(),
            phone: String::new(),
        },
    ])?;
    store.save(&[
        Perspective::new(PerspectiveId::new("financial"), "Financial", acme.clone()),
        Perspective::new(PerspectiveId::new("customers"), "Customers", acme.clone()),
        Perspective::new(PerspectiveId::new("gx-financial"), "Financial", globex.clone()),
    ])?;
    store.save(&[
        Goal::new(GoalId::new("grow"), "Grow", PerspectiveId::new("financial"), acme.clone()),
        Goal::new(GoalId::new("retain"), "Retain", PerspectiveId::new("financial"), acme.clone()),
        Goal::new(GoalId::new("nps"), "Raise NPS", PerspectiveId::new("customers"), acme.clone()),
        Goal::new(GoalId::new("gx-grow"), "Grow", PerspectiveId::new("gx-financial"), globex.clone()),
    ])?;
    store.save(&[
        create_test_objective("revenue", "grow", &acme),
        create_test_objective("gx-revenue", "gx-grow", &globex),
    ])?;
    Ok(())
}

/// Service over a seeded in-memory store with deterministic ids and dates
pub fn setup_test_service() -> PlanningService<MemoryStore> {
    let store = MemoryStore::new();
    seed_store(&store).unwrap();
    PlanningService::new(store)
        .with_ids(Arc::new(SequentialIds::new("id")))
        .with_clock(Arc::new(FixedClock(today())))
}
