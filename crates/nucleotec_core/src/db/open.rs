//! Connection bootstrap.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`; junction and trilha
//!   constraints depend on it.
//! - Returned connections are at `migrations::latest_version()`.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when missing) a registry database file.
///
/// Emits `event=db_open` with duration, applied migration count and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    bootstrap(&path.display().to_string(), || Connection::open(path))
}

/// Opens a private in-memory registry database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap(":memory:", Connection::open_in_memory)
}

fn bootstrap(
    target: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();

    let result = open()
        .map_err(DbError::from)
        .and_then(|mut conn| -> DbResult<(Connection, usize)> {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            let applied = apply_migrations(&mut conn)?;
            Ok((conn, applied))
        });

    match result {
        Ok((conn, applied)) => {
            info!(
                "event=db_open module=db status=ok target={} migrations_applied={} duration_ms={}",
                target,
                applied,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error target={} duration_ms={} error={}",
                target,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
