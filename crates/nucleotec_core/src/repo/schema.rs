//! Connection readiness checks shared by SQLite repositories.

use crate::db::migrations::schema_status;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::Connection;

/// Verifies the connection is fully migrated and exposes `tables`.
pub fn ensure_connection_ready(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    let status = schema_status(conn)?;
    if !status.is_current() {
        return Err(RepoError::UninitializedConnection {
            expected_version: status.latest,
            actual_version: status.current,
        });
    }

    for &table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

pub fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
