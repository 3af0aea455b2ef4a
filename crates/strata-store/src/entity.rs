//! Typed records stored in a collection

use crate::kind::EntityKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_domain::{
    ActionPlan, Company, Department, Goal, Mission, Objective, Perspective, Position, SwotItem,
    User, Value, Vision,
};

/// Record type stored in exactly one collection
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection holding records of this type
    const KIND: EntityKind;
}

macro_rules! impl_entity {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$kind;
            }
        )*
    };
}

impl_entity! {
    Company => Companies,
    User => Users,
    Department => Departments,
    Position => Positions,
    Vision => Visions,
    Mission => Missions,
    Value => Values,
    Perspective => Perspectives,
    Goal => Goals,
    Objective => Objectives,
    ActionPlan => ActionPlans,
    SwotItem => SwotItems,
}
