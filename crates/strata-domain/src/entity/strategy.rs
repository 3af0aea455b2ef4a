//! Strategic statements and groupings

use crate::id::{CompanyId, MissionId, PerspectiveId, SwotItemId, ValueId, VisionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company vision statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vision {
    pub id: VisionId,
    pub description: String,
    pub company_id: CompanyId,
}

/// Company mission statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: MissionId,
    pub description: String,
    pub company_id: CompanyId,
}

/// One of a company's values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub id: ValueId,
    pub description: String,
    pub company_id: CompanyId,
}

/// Top-level grouping of goals on the strategic map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perspective {
    pub id: PerspectiveId,
    pub description: String,
    pub company_id: CompanyId,
}

impl Perspective {
    /// Create perspective
    #[inline]
    #[must_use]
    pub fn new(id: PerspectiveId, description: impl Into<String>, company_id: CompanyId) -> Self {
        Self {
            id,
            description: description.into(),
            company_id,
        }
    }
}

/// SWOT quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwotKind {
    Strength,
    Weakness,
    Opportunity,
    Threat,
}

/// Entry in a SWOT analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwotItem {
    pub id: SwotItemId,
    #[serde(rename = "type")]
    pub kind: SwotKind,
    pub description: String,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
}
