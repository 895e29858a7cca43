//! Assoc command implementation.

use crate::cli::{AssocAction, AssocArgs};
use crate::commands::Outcome;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nucleotec_core::{reconcile_with_mode, selection_view, AssociationKind, ReconcileMode};
use rusqlite::Connection;

/// Execute the assoc command.
///
/// `set` renders the reconcile report even when some rows failed; the failure
/// is then returned inside `Outcome::Partial`.
pub fn execute_assoc(
    args: AssocArgs,
    conn: &mut Connection,
    formatter: &Formatter,
    default_mode: ReconcileMode,
) -> Result<Outcome> {
    match args.action {
        AssocAction::Show { kind, parent_id } => {
            let entries = selection_view(conn, kind.into(), parent_id)?;
            Ok(Outcome::Done(formatter.records(&entries)?))
        }
        AssocAction::Set {
            kind,
            parent_id,
            ids,
            atomic,
        } => {
            let mode = if atomic {
                ReconcileMode::Atomic
            } else {
                default_mode
            };
            let report =
                reconcile_with_mode(conn, AssociationKind::from(kind), parent_id, ids, mode)?;
            let output = formatter.reconcile_report(&report)?;

            if report.is_complete() {
                Ok(Outcome::Done(output))
            } else {
                Ok(Outcome::Partial(
                    output,
                    CliError::IncompleteReconcile {
                        parent_id,
                        failed: report.failures.len(),
                        rolled_back: report.rolled_back,
                    },
                ))
            }
        }
    }
}
