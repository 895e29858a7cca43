//! Association use-case service.
//!
//! # Responsibility
//! - Provide one call site per managed relation (público alvo, setores
//!   indicados, macro segmentos, trilha fichas).
//! - Build the candidate/selected view a multi-select form renders.
//! - Run reconciliation in best-effort or all-or-nothing mode.
//!
//! # Invariants
//! - Best-effort mode keeps every row that succeeded, even when others failed.
//! - Atomic mode commits only when every row succeeded.

use crate::model::kind::{AssociationKind, EntityId, EntityKind};
use crate::model::registry::CatalogItem;
use crate::repo::association_repo::{AssociationStore, SqliteAssociationStore};
use crate::repo::error::{RepoError, RepoResult};
use crate::service::reconcile::{reconcile, ReconcileError, ReconcileReport};
use log::warn;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a reconciliation batch treats row failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Apply every row independently; keep what succeeded.
    #[default]
    BestEffort,
    /// Apply inside one transaction; roll back if any row fails.
    Atomic,
}

/// Service error for association use-cases.
#[derive(Debug)]
pub enum AssociationServiceError {
    Repo(RepoError),
    Reconcile(ReconcileError),
}

impl Display for AssociationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Reconcile(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssociationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Reconcile(err) => Some(err),
        }
    }
}

impl From<RepoError> for AssociationServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for AssociationServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<ReconcileError> for AssociationServiceError {
    fn from(value: ReconcileError) -> Self {
        Self::Reconcile(value)
    }
}

/// One candidate of a multi-select, flagged when currently linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub id: EntityId,
    pub nome: String,
    pub selected: bool,
}

/// Association service facade over any store implementation.
pub struct AssociationService<S: AssociationStore> {
    store: S,
}

impl<S: AssociationStore> AssociationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Makes the stored `kind` set of `parent_id` equal `target_ids`.
    pub fn reconcile(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
        target_ids: impl IntoIterator<Item = EntityId>,
    ) -> Result<ReconcileReport, ReconcileError> {
        reconcile(&self.store, kind, parent_id, target_ids)
    }

    /// Replaces the business sizes (portes) a ficha targets.
    pub fn set_publico_alvo(
        &self,
        ficha_id: EntityId,
        porte_ids: impl IntoIterator<Item = EntityId>,
    ) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile(AssociationKind::PublicoAlvo, ficha_id, porte_ids)
    }

    /// Replaces the sectors a ficha is recommended for.
    pub fn set_setores_indicados(
        &self,
        ficha_id: EntityId,
        setor_ids: impl IntoIterator<Item = EntityId>,
    ) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile(AssociationKind::SetoresIndicados, ficha_id, setor_ids)
    }

    /// Replaces the macro segments of a ficha.
    pub fn set_macro_segmentos(
        &self,
        ficha_id: EntityId,
        macro_segmento_ids: impl IntoIterator<Item = EntityId>,
    ) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile(AssociationKind::MacroSegmentos, ficha_id, macro_segmento_ids)
    }

    /// Replaces the fichas on an empresa's trilha.
    ///
    /// New rows start as `pendente` without consultor; removed rows are gone
    /// together with their status and date.
    pub fn set_trilha_fichas(
        &self,
        empresa_id: EntityId,
        ficha_ids: impl IntoIterator<Item = EntityId>,
    ) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile(AssociationKind::TrilhaFichas, empresa_id, ficha_ids)
    }

    /// Returns the related ids currently linked to `parent_id`.
    pub fn assigned(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
    ) -> RepoResult<BTreeSet<EntityId>> {
        self.store.list_associated(kind, parent_id)
    }

    /// Counts rows referencing one entity across all relations.
    pub fn count_references(&self, kind: EntityKind, entity_id: EntityId) -> RepoResult<u64> {
        self.store.count_references(kind, entity_id)
    }
}

/// Lists every candidate of `kind`'s related side with its selected flag.
pub fn selection_view(
    conn: &Connection,
    kind: AssociationKind,
    parent_id: EntityId,
) -> RepoResult<Vec<SelectionEntry>> {
    let store = SqliteAssociationStore::try_new(conn)?;
    let selected = store.list_associated(kind, parent_id)?;
    let candidates = store.list_candidates(kind)?;
    Ok(candidates
        .into_iter()
        .map(|CatalogItem { id, nome }| SelectionEntry {
            selected: selected.contains(&id),
            id,
            nome,
        })
        .collect())
}

/// Reconciles one relation on a SQLite connection using `mode`.
///
/// In `ReconcileMode::Atomic` any row failure rolls back the whole batch and
/// the returned report is flagged `rolled_back`.
pub fn reconcile_with_mode(
    conn: &mut Connection,
    kind: AssociationKind,
    parent_id: EntityId,
    target_ids: impl IntoIterator<Item = EntityId>,
    mode: ReconcileMode,
) -> Result<ReconcileReport, AssociationServiceError> {
    match mode {
        ReconcileMode::BestEffort => {
            let store = SqliteAssociationStore::try_new(conn)?;
            Ok(reconcile(&store, kind, parent_id, target_ids)?)
        }
        ReconcileMode::Atomic => {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let mut report = {
                let store = SqliteAssociationStore::try_new(&tx)?;
                reconcile(&store, kind, parent_id, target_ids)?
            };

            if report.failures.is_empty() {
                tx.commit()?;
            } else {
                tx.rollback()?;
                report.rolled_back = true;
                warn!(
                    "event=reconcile module=service status=rolled_back kind={} parent_id={} failed={}",
                    kind,
                    parent_id,
                    report.failures.len()
                );
            }
            Ok(report)
        }
    }
}
