use thiserror::Error;

use crate::draft::DraftError;
use crate::settings::ValidationError;

#[derive(Debug, Error)]
pub enum CrateCostError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Settings changed concurrently: expected version {expected}, found {found}")]
    VersionConflict { expected: String, found: String },

    #[error("Settings version not found in history: {0}")]
    VersionNotFound(String),

    #[error("Settings store error: {0}")]
    Store(String),

    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl From<CrateCostError> for String {
    fn from(err: CrateCostError) -> Self {
        err.to_string()
    }
}
