//! Embedded schema migrations.
//!
//! Pending scripts run in version order inside one transaction. After each
//! script the reached version is written to `PRAGMA user_version`, so a
//! committed batch always leaves the file at `latest_version()`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "trilhas",
        sql: include_str!("0002_trilhas.sql"),
    },
    Migration {
        version: 3,
        name: "ficha_associations",
        sql: include_str!("0003_ficha_associations.sql"),
    },
];

/// Schema version of one database relative to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    pub current: u32,
    pub latest: u32,
}

impl SchemaStatus {
    pub fn is_current(&self) -> bool {
        self.current == self.latest
    }

    /// Number of migrations this build would still apply.
    pub fn pending(&self) -> u32 {
        self.latest.saturating_sub(self.current)
    }
}

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

pub fn schema_status(conn: &Connection) -> DbResult<SchemaStatus> {
    Ok(SchemaStatus {
        current: current_user_version(conn)?,
        latest: latest_version(),
    })
}

/// Brings the schema to `latest_version()` and returns how many scripts ran.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the first script that failed; nothing is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let status = schema_status(conn)?;
    if status.current > status.latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: status.current,
            latest_supported: status.latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > status.current)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::{SchemaStatus, MIGRATIONS};

    #[test]
    fn versions_start_at_one_and_increase_by_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1, "{}", migration.name);
        }
    }

    #[test]
    fn pending_count_saturates() {
        let behind = SchemaStatus {
            current: 1,
            latest: 3,
        };
        assert_eq!(behind.pending(), 2);
        assert!(!behind.is_current());

        let ahead = SchemaStatus {
            current: 9,
            latest: 3,
        };
        assert_eq!(ahead.pending(), 0);
    }
}
