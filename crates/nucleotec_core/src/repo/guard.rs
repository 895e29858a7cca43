//! Referential-integrity guard.
//!
//! # Responsibility
//! - Count rows referencing one entity across its static dependent relations.
//! - Refuse hard deletes of entities that are still referenced.
//!
//! # Invariants
//! - Deletes never cascade; a referenced row yields `RepoError::InUse`.
//! - Table/column identifiers come only from `EntityKind::layout()`.

use crate::model::kind::{EntityId, EntityKind};
use crate::repo::error::{RepoError, RepoResult};
use log::{info, warn};
use rusqlite::Connection;

/// Returns how many rows reference `(kind, id)` across all dependent relations.
pub fn count_references(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<u64> {
    let mut total: u64 = 0;
    for dependent in kind.layout().dependents {
        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?1;",
                dependent.table, dependent.column
            ),
            [id],
            |row| row.get(0),
        )?;
        total += u64::try_from(count).map_err(|_| {
            RepoError::InvalidData(format!(
                "negative reference count in {}.{}",
                dependent.table, dependent.column
            ))
        })?;
    }
    Ok(total)
}

/// Returns whether one row of `kind` with `id` exists.
pub fn entity_exists(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<bool> {
    let layout = kind.layout();
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1);",
            layout.table, layout.id_column
        ),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Deletes one entity row after checking it exists and is unreferenced.
pub fn delete_unreferenced(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<()> {
    if !entity_exists(conn, kind, id)? {
        return Err(RepoError::NotFound { kind, id });
    }

    let references = count_references(conn, kind, id)?;
    if references > 0 {
        warn!(
            "event=entity_delete module=repo status=blocked kind={} id={} references={}",
            kind, id, references
        );
        return Err(RepoError::InUse {
            kind,
            id,
            references,
        });
    }

    let layout = kind.layout();
    conn.execute(
        &format!("DELETE FROM {} WHERE {} = ?1;", layout.table, layout.id_column),
        [id],
    )?;
    info!(
        "event=entity_delete module=repo status=ok kind={} id={}",
        kind, id
    );
    Ok(())
}
