//! Collection identifiers

use std::fmt;

/// Record collection in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Companies,
    Users,
    Departments,
    Positions,
    Visions,
    Missions,
    Values,
    Perspectives,
    Goals,
    Objectives,
    /// Action plans, with their check-ins embedded in order
    ActionPlans,
    SwotItems,
}

impl EntityKind {
    /// Every collection
    pub const ALL: [Self; 12] = [
        Self::Companies,
        Self::Users,
        Self::Departments,
        Self::Positions,
        Self::Visions,
        Self::Missions,
        Self::Values,
        Self::Perspectives,
        Self::Goals,
        Self::Objectives,
        Self::ActionPlans,
        Self::SwotItems,
    ];

    /// Storage key, as used by existing datasets
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Users => "users",
            Self::Departments => "departments",
            Self::Positions => "positions",
            Self::Visions => "visions",
            Self::Missions => "missions",
            Self::Values => "values",
            Self::Perspectives => "perspectives",
            Self::Goals => "goals",
            Self::Objectives => "objectives",
            Self::ActionPlans => "actionPlans",
            Self::SwotItems => "swot-items",
        }
    }

    /// Record field naming the owning company
    ///
    /// A company owns itself.
    #[inline]
    #[must_use]
    pub fn company_field(self) -> &'static str {
        match self {
            Self::Companies => "id",
            _ => "companyId",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
