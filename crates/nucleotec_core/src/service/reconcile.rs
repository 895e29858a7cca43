//! Association reconciliation.
//!
//! # Responsibility
//! - Compute the minimal link/unlink delta between stored and target sets.
//! - Apply that delta through an `AssociationStore`, one row at a time.
//!
//! # Invariants
//! - `to_remove` and `to_add` are disjoint.
//! - Removals run before additions, each in ascending id order.
//! - A failure while reading the current set aborts before any mutation.
//! - A failed row mutation is recorded and the remaining rows still run.
//! - Reconciling twice with the same target issues no mutation the second time.

use crate::model::kind::{AssociationKind, EntityId};
use crate::repo::association_repo::AssociationStore;
use crate::repo::error::RepoError;
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Delta between the stored association set and the target set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Stored ids missing from the target.
    pub to_remove: BTreeSet<EntityId>,
    /// Target ids not yet stored.
    pub to_add: BTreeSet<EntityId>,
}

impl ReconcilePlan {
    pub fn compute(current: &BTreeSet<EntityId>, target: &BTreeSet<EntityId>) -> Self {
        Self {
            to_remove: current.difference(target).copied().collect(),
            to_add: target.difference(current).copied().collect(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    pub fn mutation_count(&self) -> usize {
        self.to_remove.len() + self.to_add.len()
    }
}

/// Row mutation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOp {
    Link,
    Unlink,
}

impl Display for RowOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Link => f.write_str("link"),
            Self::Unlink => f.write_str("unlink"),
        }
    }
}

/// One row mutation that the store rejected.
#[derive(Debug)]
pub struct RowFailure {
    pub op: RowOp,
    pub related_id: EntityId,
    pub error: RepoError,
}

/// Outcome of one reconciliation call.
///
/// Partial success is representable: `removed`/`added` hold the rows that were
/// applied, `failures` the rows that were not.
#[derive(Debug)]
pub struct ReconcileReport {
    pub kind: AssociationKind,
    pub parent_id: EntityId,
    pub removed: Vec<EntityId>,
    pub added: Vec<EntityId>,
    pub failures: Vec<RowFailure>,
    /// Set by the atomic mode when failures caused the whole batch to be undone.
    pub rolled_back: bool,
}

impl ReconcileReport {
    fn new(kind: AssociationKind, parent_id: EntityId) -> Self {
        Self {
            kind,
            parent_id,
            removed: Vec::new(),
            added: Vec::new(),
            failures: Vec::new(),
            rolled_back: false,
        }
    }

    /// Every planned row was applied and kept.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.rolled_back
    }

    /// Number of mutations that were applied.
    pub fn applied_count(&self) -> usize {
        self.removed.len() + self.added.len()
    }
}

/// Reconciliation failure raised before any mutation was attempted.
#[derive(Debug)]
pub enum ReconcileError {
    /// The current association set could not be read.
    StorageUnavailable {
        kind: AssociationKind,
        parent_id: EntityId,
        source: RepoError,
    },
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable {
                kind,
                parent_id,
                source,
            } => write!(
                f,
                "cannot read {kind} associations of {parent_id}: {source}"
            ),
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable { source, .. } => Some(source),
        }
    }
}

/// Makes the stored `kind` associations of `parent_id` equal `target_ids`.
///
/// Duplicate ids in `target_ids` are ignored. `parent_id` is not validated:
/// a dangling parent simply has no current rows and its inserts fail at the
/// storage layer.
///
/// # Errors
/// - `ReconcileError::StorageUnavailable` when the current set cannot be read.
///   Row-level failures are reported inside the returned `ReconcileReport`.
pub fn reconcile<S>(
    store: &S,
    kind: AssociationKind,
    parent_id: EntityId,
    target_ids: impl IntoIterator<Item = EntityId>,
) -> Result<ReconcileReport, ReconcileError>
where
    S: AssociationStore + ?Sized,
{
    let started_at = Instant::now();
    let target: BTreeSet<EntityId> = target_ids.into_iter().collect();

    let current = match store.list_associated(kind, parent_id) {
        Ok(current) => current,
        Err(source) => {
            error!(
                "event=reconcile module=service status=error kind={} parent_id={} error_code=list_failed error={}",
                kind, parent_id, source
            );
            return Err(ReconcileError::StorageUnavailable {
                kind,
                parent_id,
                source,
            });
        }
    };

    let plan = ReconcilePlan::compute(&current, &target);
    let mut report = ReconcileReport::new(kind, parent_id);

    for &related_id in &plan.to_remove {
        match store.unlink(kind, parent_id, related_id) {
            Ok(()) => report.removed.push(related_id),
            Err(error) => record_failure(&mut report, RowOp::Unlink, related_id, error),
        }
    }

    for &related_id in &plan.to_add {
        match store.link(kind, parent_id, related_id) {
            Ok(()) => report.added.push(related_id),
            Err(error) => record_failure(&mut report, RowOp::Link, related_id, error),
        }
    }

    info!(
        "event=reconcile module=service status={} kind={} parent_id={} current={} target={} removed={} added={} failed={} duration_ms={}",
        if report.failures.is_empty() { "ok" } else { "partial" },
        kind,
        parent_id,
        current.len(),
        target.len(),
        report.removed.len(),
        report.added.len(),
        report.failures.len(),
        started_at.elapsed().as_millis()
    );

    Ok(report)
}

fn record_failure(
    report: &mut ReconcileReport,
    op: RowOp,
    related_id: EntityId,
    error: RepoError,
) {
    warn!(
        "event=reconcile_row module=service status=error kind={} parent_id={} op={} related_id={} fault={:?} error={}",
        report.kind,
        report.parent_id,
        op,
        related_id,
        error.fault(),
        error
    );
    report.failures.push(RowFailure {
        op,
        related_id,
        error,
    });
}

#[cfg(test)]
mod tests {
    use super::ReconcilePlan;
    use std::collections::BTreeSet;

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn plan_removes_stale_and_adds_missing() {
        let plan = ReconcilePlan::compute(&set(&[1, 2, 3]), &set(&[2, 3, 4]));
        assert_eq!(plan.to_remove, set(&[1]));
        assert_eq!(plan.to_add, set(&[4]));
        assert_eq!(plan.mutation_count(), 2);
    }

    #[test]
    fn plan_sides_are_always_disjoint() {
        let cases: [(&[i64], &[i64]); 5] = [
            (&[], &[]),
            (&[1, 2], &[]),
            (&[], &[1, 2]),
            (&[1, 2, 3], &[3, 4, 5]),
            (&[9], &[9]),
        ];
        for (current, target) in cases {
            let plan = ReconcilePlan::compute(&set(current), &set(target));
            assert!(plan.to_remove.is_disjoint(&plan.to_add));
        }
    }

    #[test]
    fn identical_sets_produce_noop_plan() {
        let plan = ReconcilePlan::compute(&set(&[5]), &set(&[5]));
        assert!(plan.is_noop());
    }
}
