//! Association store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Expose the storage collaborator used by the association reconciler.
//! - Keep junction-table SQL behind `AssociationKind::layout()`.
//!
//! # Invariants
//! - `link` inserts exactly one row and fails if the pair already exists.
//! - `unlink` of a missing pair succeeds without touching anything.
//! - Only the junction relation is mutated; parent/related rows never are.

use crate::model::kind::{AssociationKind, EntityId, EntityKind};
use crate::model::registry::CatalogItem;
use crate::repo::error::RepoResult;
use crate::repo::guard;
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection};
use std::collections::BTreeSet;

/// Storage collaborator for many-to-many reconciliation.
pub trait AssociationStore {
    /// Returns every related id currently linked to `parent_id`.
    fn list_associated(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
    ) -> RepoResult<BTreeSet<EntityId>>;
    /// Inserts one association row.
    fn link(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
        related_id: EntityId,
    ) -> RepoResult<()>;
    /// Deletes one association row; a missing row is not an error.
    fn unlink(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
        related_id: EntityId,
    ) -> RepoResult<()>;
    /// Counts rows referencing one entity, used by delete guards.
    fn count_references(&self, kind: EntityKind, entity_id: EntityId) -> RepoResult<u64>;
}

/// SQLite-backed association store.
///
/// Accepts any `&Connection`, including one borrowed from a `Transaction`.
pub struct SqliteAssociationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssociationStore<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let tables = AssociationKind::ALL.map(|kind| kind.layout().table);
        ensure_connection_ready(conn, &tables)?;
        Ok(Self { conn })
    }

    /// Lists the related rows of `parent_id` with their display labels.
    pub fn list_associated_items(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
    ) -> RepoResult<Vec<CatalogItem>> {
        load_associated_items(self.conn, kind, parent_id)
    }

    /// Lists every candidate of the related side, ordered by label.
    pub fn list_candidates(&self, kind: AssociationKind) -> RepoResult<Vec<CatalogItem>> {
        let related = kind.layout().related_kind.layout();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {id} AS id, {label} AS nome
             FROM {table}
             ORDER BY {label} COLLATE NOCASE ASC, {id} ASC;",
            id = related.id_column,
            label = related.label_column,
            table = related.table,
        ))?;
        let items = stmt
            .query_map([], |row| {
                Ok(CatalogItem {
                    id: row.get("id")?,
                    nome: row.get("nome")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

impl AssociationStore for SqliteAssociationStore<'_> {
    fn list_associated(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
    ) -> RepoResult<BTreeSet<EntityId>> {
        let layout = kind.layout();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} WHERE {} = ?1;",
            layout.related_column, layout.table, layout.parent_column
        ))?;
        let ids = stmt
            .query_map([parent_id], |row| row.get::<_, EntityId>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(ids)
    }

    fn link(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
        related_id: EntityId,
    ) -> RepoResult<()> {
        let layout = kind.layout();
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}) VALUES (?1, ?2);",
                layout.table, layout.parent_column, layout.related_column
            ),
            params![parent_id, related_id],
        )?;
        Ok(())
    }

    fn unlink(
        &self,
        kind: AssociationKind,
        parent_id: EntityId,
        related_id: EntityId,
    ) -> RepoResult<()> {
        let layout = kind.layout();
        self.conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?1 AND {} = ?2;",
                layout.table, layout.parent_column, layout.related_column
            ),
            params![parent_id, related_id],
        )?;
        Ok(())
    }

    fn count_references(&self, kind: EntityKind, entity_id: EntityId) -> RepoResult<u64> {
        guard::count_references(self.conn, kind, entity_id)
    }
}

/// Loads the related rows of one parent joined with their labels.
pub fn load_associated_items(
    conn: &Connection,
    kind: AssociationKind,
    parent_id: EntityId,
) -> RepoResult<Vec<CatalogItem>> {
    let layout = kind.layout();
    let related = layout.related_kind.layout();
    let mut stmt = conn.prepare(&format!(
        "SELECT r.{id} AS id, r.{label} AS nome
         FROM {junction} j
         INNER JOIN {table} r ON r.{id} = j.{related_column}
         WHERE j.{parent_column} = ?1
         ORDER BY r.{label} COLLATE NOCASE ASC, r.{id} ASC;",
        id = related.id_column,
        label = related.label_column,
        junction = layout.table,
        table = related.table,
        related_column = layout.related_column,
        parent_column = layout.parent_column,
    ))?;
    let items = stmt
        .query_map([parent_id], |row| {
            Ok(CatalogItem {
                id: row.get("id")?,
                nome: row.get("nome")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}
