use thiserror::Error;

use crate::model::ModelError;
use crate::record::FileStatus;
use crate::status::StatusAction;

/// Errors surfaced by record store operations.
///
/// `Validation`, `NotFound` and `InvalidTransition` are raised before any
/// backend call; `Persistence` wraps a failed backend round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("file record not found: {0}")]
    NotFound(String),
    #[error("cannot {action} file {id} while it is {from}")]
    InvalidTransition {
        id: String,
        from: FileStatus,
        action: StatusAction,
    },
    #[error("persistence error: {0}")]
    Persistence(#[from] ModelError),
}

impl RegistryError {
    pub(crate) fn missing(field: &str) -> Self {
        RegistryError::Validation(format!("missing required field `{}`", field))
    }
}
