//! Record identifiers
//!
//! Every entity is keyed by an opaque string. Existing datasets carry
//! millisecond timestamps; new records get whatever the caller's id source
//! produces. Each entity has its own newtype so a goal id can never be
//! passed where an objective id is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Tenant identifier
    CompanyId
);
define_id!(
    /// User identifier
    UserId
);
define_id!(DepartmentId);
define_id!(PositionId);
define_id!(VisionId);
define_id!(MissionId);
define_id!(ValueId);
define_id!(
    /// Perspective identifier (top-level grouping of goals)
    PerspectiveId
);
define_id!(GoalId);
define_id!(ObjectiveId);
define_id!(ActionPlanId);
define_id!(CheckInId);
define_id!(SwotItemId);
