//! Catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the simple id+name reference tables.
//! - Keep the per-kind table choice inside the static kind table.
//!
//! # Invariants
//! - Names are trimmed and never blank.
//! - Listing is deterministic: `nome COLLATE NOCASE ASC, id ASC`.
//! - Deletes go through the referential-integrity guard.

use crate::model::kind::{CatalogKind, EntityId};
use crate::model::registry::{required_text, CatalogItem};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::guard::delete_unreferenced;
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for catalog CRUD operations.
pub trait CatalogRepository {
    fn create_item(&self, kind: CatalogKind, nome: &str) -> RepoResult<CatalogItem>;
    fn get_item(&self, kind: CatalogKind, id: EntityId) -> RepoResult<Option<CatalogItem>>;
    fn list_items(&self, kind: CatalogKind) -> RepoResult<Vec<CatalogItem>>;
    fn rename_item(&self, kind: CatalogKind, id: EntityId, nome: &str) -> RepoResult<()>;
    fn delete_item(&self, kind: CatalogKind, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let tables = CatalogKind::ALL.map(CatalogKind::table);
        ensure_connection_ready(conn, &tables)?;
        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_item(&self, kind: CatalogKind, nome: &str) -> RepoResult<CatalogItem> {
        let nome = required_text("nome", nome)?;
        self.conn.execute(
            &format!("INSERT INTO {} (nome) VALUES (?1);", kind.table()),
            [nome.as_str()],
        )?;
        Ok(CatalogItem {
            id: self.conn.last_insert_rowid(),
            nome,
        })
    }

    fn get_item(&self, kind: CatalogKind, id: EntityId) -> RepoResult<Option<CatalogItem>> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT id, nome FROM {} WHERE id = ?1;", kind.table()),
                [id],
                |row| {
                    Ok(CatalogItem {
                        id: row.get("id")?,
                        nome: row.get("nome")?,
                    })
                },
            )
            .optional()?;
        Ok(item)
    }

    fn list_items(&self, kind: CatalogKind) -> RepoResult<Vec<CatalogItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, nome FROM {} ORDER BY nome COLLATE NOCASE ASC, id ASC;",
            kind.table()
        ))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(CatalogItem {
                id: row.get("id")?,
                nome: row.get("nome")?,
            });
        }
        Ok(items)
    }

    fn rename_item(&self, kind: CatalogKind, id: EntityId, nome: &str) -> RepoResult<()> {
        let nome = required_text("nome", nome)?;
        let changed = self.conn.execute(
            &format!("UPDATE {} SET nome = ?1 WHERE id = ?2;", kind.table()),
            params![nome, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: kind.entity_kind(),
                id,
            });
        }
        Ok(())
    }

    fn delete_item(&self, kind: CatalogKind, id: EntityId) -> RepoResult<()> {
        delete_unreferenced(self.conn, kind.entity_kind(), id)
    }
}
