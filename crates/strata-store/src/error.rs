//! Store errors

use crate::kind::EntityKind;
use std::path::PathBuf;

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Collection could not be encoded or decoded
    #[error("malformed {kind} collection: {source}")]
    Serialization {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    #[inline]
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[inline]
    pub(crate) fn serialization(kind: EntityKind, source: serde_json::Error) -> Self {
        Self::Serialization { kind, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_collection() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = StoreError::serialization(EntityKind::Objectives, source);
        assert!(err.to_string().starts_with("malformed objectives collection"));
    }
}
