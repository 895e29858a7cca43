//! Catalog command implementation.

use crate::cli::{CatalogAction, CatalogArgs};
use crate::error::Result;
use crate::output::Formatter;
use nucleotec_core::{CatalogKind, CatalogService, SqliteCatalogRepository};
use rusqlite::Connection;

/// Execute the catalog command.
pub fn execute_catalog(
    args: CatalogArgs,
    conn: &Connection,
    formatter: &Formatter,
) -> Result<String> {
    let service = CatalogService::new(SqliteCatalogRepository::try_new(conn)?);

    match args.action {
        CatalogAction::Add { kind, nome } => {
            let item = service.create(kind.into(), &nome)?;
            formatter.record(&item)
        }
        CatalogAction::List { kind } => formatter.records(&service.list(kind.into())?),
        CatalogAction::Rename { kind, id, nome } => {
            let item = service.rename(kind.into(), id, &nome)?;
            formatter.record(&item)
        }
        CatalogAction::Delete { kind, id } => {
            let kind = CatalogKind::from(kind);
            service.delete(kind, id)?;
            formatter.success(&format!("Deleted {kind} {id}"))
        }
    }
}
