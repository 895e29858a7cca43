//! Init command implementation.

use crate::error::Result;
use crate::output::Formatter;
use nucleotec_core::db::migrations::schema_status;
use rusqlite::Connection;
use std::path::Path;

/// Report the schema version of the database opened for this invocation.
///
/// Opening the database already created it and applied pending migrations.
pub fn execute_init(conn: &Connection, db_path: &Path, formatter: &Formatter) -> Result<String> {
    let status = schema_status(conn)?;
    formatter.success(&format!(
        "Database ready at {} (schema version {} of {})",
        db_path.display(),
        status.current,
        status.latest
    ))
}
