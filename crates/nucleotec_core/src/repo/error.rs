//! Repository error taxonomy.
//!
//! # Responsibility
//! - Carry semantic failures (`NotFound`, `InUse`) next to transport errors.
//! - Classify every failure as storage-unavailable or constraint-violation.
//!
//! # Invariants
//! - A missing parent/related row is classified as a constraint violation.

use crate::db::DbError;
use crate::model::kind::{EntityId, EntityKind};
use crate::model::registry::ValidationError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for registry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Draft rejected before reaching SQL.
    Validation(ValidationError),
    /// Target row does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// Target trilha row does not exist.
    TrilhaNotFound(EntityId),
    /// Delete refused because other rows still reference the target.
    InUse {
        kind: EntityKind,
        id: EntityId,
        references: u64,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

/// Coarse classification used when reporting failures to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFault {
    /// Database cannot serve the request (open, IO, busy, corrupt, schema).
    Unavailable,
    /// A foreign-key, uniqueness, check or validation rule rejected the row.
    ConstraintViolation,
}

impl RepoError {
    pub fn fault(&self) -> StorageFault {
        match self {
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                StorageFault::ConstraintViolation
            }
            Self::Validation(_)
            | Self::NotFound { .. }
            | Self::TrilhaNotFound(_)
            | Self::InUse { .. } => StorageFault::ConstraintViolation,
            Self::Db(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::InvalidData(_) => StorageFault::Unavailable,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        self.fault() == StorageFault::ConstraintViolation
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::TrilhaNotFound(id) => write!(f, "trilha not found: {id}"),
            Self::InUse {
                kind,
                id,
                references,
            } => write!(
                f,
                "{kind} {id} is still referenced by {references} row(s); remove the links first"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{RepoError, StorageFault};
    use crate::model::kind::EntityKind;
    use crate::model::registry::ValidationError;

    #[test]
    fn semantic_errors_classify_as_constraint_violations() {
        let not_found = RepoError::NotFound {
            kind: EntityKind::Ficha,
            id: 7,
        };
        assert_eq!(not_found.fault(), StorageFault::ConstraintViolation);
        let invalid = RepoError::Validation(ValidationError::BlankField("nome"));
        assert!(invalid.is_constraint_violation());
    }

    #[test]
    fn schema_errors_classify_as_unavailable() {
        let err = RepoError::UninitializedConnection {
            expected_version: 3,
            actual_version: 0,
        };
        assert_eq!(err.fault(), StorageFault::Unavailable);
    }

    #[test]
    fn in_use_message_names_kind_and_count() {
        let err = RepoError::InUse {
            kind: EntityKind::Setor,
            id: 4,
            references: 2,
        };
        let message = err.to_string();
        assert!(message.contains("setor 4"));
        assert!(message.contains("2 row(s)"));
    }
}
