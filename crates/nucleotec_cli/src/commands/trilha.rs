//! Trilha and historico command implementations.

use crate::cli::{TrilhaAction, TrilhaArgs};
use crate::error::Result;
use crate::output::Formatter;
use nucleotec_core::{EntityId, SqliteTrilhaRepository, TrilhaService};
use rusqlite::Connection;

/// Execute the trilha command.
pub fn execute_trilha(
    args: TrilhaArgs,
    conn: &Connection,
    formatter: &Formatter,
) -> Result<String> {
    let service = TrilhaService::new(SqliteTrilhaRepository::try_new(conn)?);

    let changed = match args.action {
        TrilhaAction::Add {
            empresa_id,
            ficha_id,
            consultor,
        } => service.add(empresa_id, ficha_id, consultor)?,
        TrilhaAction::List => return formatter.records(&service.list()?),
        TrilhaAction::Status { id, status, data } => {
            service.update_status(id, status.into(), data)?
        }
        TrilhaAction::Assign { id, consultor } => service.assign_consultor(id, consultor)?,
    };

    formatter.record(&service.get_view(changed.id)?)
}

/// Execute the historico command.
pub fn execute_historico(
    empresa_id: EntityId,
    conn: &Connection,
    formatter: &Formatter,
) -> Result<String> {
    let service = TrilhaService::new(SqliteTrilhaRepository::try_new(conn)?);
    formatter.records(&service.history(empresa_id)?)
}

