//! Catalog access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::MapId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("map '{0}' is not registered")]
    UnknownMap(MapId),

    #[error("map '{id}' failed to build: {reason}")]
    BuildFailed { id: MapId, reason: String },
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownMap(_) => ErrorSeverity::Validation,
            Self::BuildFailed { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownMap(_) => "CATALOG_UNKNOWN_MAP",
            Self::BuildFailed { .. } => "CATALOG_BUILD_FAILED",
        }
    }
}
