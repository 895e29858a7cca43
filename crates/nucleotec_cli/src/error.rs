//! Error types for the CLI application.

use nucleotec_core::db::DbError;
use nucleotec_core::{AssociationServiceError, EntityId, LoggingError, RepoError, ServiceError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Database could not be opened or migrated
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Storage error: {0}")]
    Repo(#[from] RepoError),

    /// Registry, catalog or trilha use-case failure
    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Association(#[from] AssociationServiceError),

    /// Some rows of a reconciliation were not applied or were rolled back
    #[error(
        "{failed} row(s) failed while reconciling parent {parent_id}{}",
        rollback_suffix(.rolled_back)
    )]
    IncompleteReconcile {
        parent_id: EntityId,
        failed: usize,
        rolled_back: bool,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn rollback_suffix(rolled_back: &bool) -> &'static str {
    if *rolled_back {
        "; nothing was applied"
    } else {
        ""
    }
}
