//! Command implementations.
//!
//! Every command borrows the connection opened for this invocation and
//! returns its rendered output instead of printing it.

pub mod assoc;
pub mod catalog;
pub mod init;
pub mod registry;
pub mod trilha;

pub use self::assoc::execute_assoc;
pub use self::catalog::execute_catalog;
pub use self::init::execute_init;
pub use self::registry::{execute_consultor, execute_empresa, execute_ficha};
pub use self::trilha::{execute_historico, execute_trilha};

use crate::cli::Command;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nucleotec_core::ReconcileMode;
use rusqlite::Connection;
use std::path::Path;

/// Result of one command.
#[derive(Debug)]
pub enum Outcome {
    /// Rendered output of a successful command.
    Done(String),
    /// Output rendered before a failure that must still be reported.
    Partial(String, CliError),
}

/// Per-invocation state shared by every command.
pub struct Session<'a> {
    pub conn: &'a mut Connection,
    pub formatter: &'a Formatter,
    pub db_path: &'a Path,
    pub reconcile_mode: ReconcileMode,
}

/// Dispatch one parsed command.
pub fn execute(command: Command, session: &mut Session<'_>) -> Result<Outcome> {
    let formatter = session.formatter;
    let conn: &Connection = &*session.conn;
    let output = match command {
        Command::Init => execute_init(conn, session.db_path, formatter)?,
        Command::Empresa(args) => execute_empresa(args, conn, formatter)?,
        Command::Consultor(args) => execute_consultor(args, conn, formatter)?,
        Command::Ficha(args) => execute_ficha(args, conn, formatter)?,
        Command::Catalog(args) => execute_catalog(args, conn, formatter)?,
        Command::Trilha(args) => execute_trilha(args, conn, formatter)?,
        Command::Historico { empresa_id } => execute_historico(empresa_id, conn, formatter)?,
        Command::Assoc(args) => {
            return execute_assoc(args, &mut *session.conn, formatter, session.reconcile_mode);
        }
    };
    Ok(Outcome::Done(output))
}
