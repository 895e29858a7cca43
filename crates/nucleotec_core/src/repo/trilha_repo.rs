//! Trilha repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist empresa x ficha tracks with consultor/status/date payload.
//! - Serve joined listings and per-empresa history.
//!
//! # Invariants
//! - One row per (empresa, ficha); a duplicate insert is a constraint error.
//! - Listing order: `id ASC`; history order: `ficha titulo ASC, id ASC`.

use crate::model::kind::EntityId;
use crate::model::trilha::{HistoricoEntry, Trilha, TrilhaStatus, TrilhaView};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TRILHA_VIEW_SQL: &str = "SELECT
    t.id AS id,
    t.empresa_id AS empresa_id,
    e.nome AS empresa_nome,
    t.ficha_id AS ficha_id,
    f.titulo AS ficha_titulo,
    t.consultor_id AS consultor_id,
    c.nome AS consultor_nome,
    t.status AS status,
    t.data_execucao AS data_execucao
FROM trilhas t
INNER JOIN empresas e ON e.id = t.empresa_id
INNER JOIN fichas f ON f.id = t.ficha_id
LEFT JOIN consultores c ON c.id = t.consultor_id";

/// Repository interface for trilha operations.
pub trait TrilhaRepository {
    fn create_trilha(
        &self,
        empresa_id: EntityId,
        ficha_id: EntityId,
        consultor_id: Option<EntityId>,
    ) -> RepoResult<Trilha>;
    fn get_trilha(&self, id: EntityId) -> RepoResult<Option<Trilha>>;
    fn get_trilha_view(&self, id: EntityId) -> RepoResult<Option<TrilhaView>>;
    fn list_trilhas(&self) -> RepoResult<Vec<TrilhaView>>;
    fn list_history(&self, empresa_id: EntityId) -> RepoResult<Vec<HistoricoEntry>>;
    fn update_status(
        &self,
        id: EntityId,
        status: TrilhaStatus,
        data_execucao: Option<i64>,
    ) -> RepoResult<()>;
    fn assign_consultor(&self, id: EntityId, consultor_id: Option<EntityId>) -> RepoResult<()>;
}

/// SQLite-backed trilha repository.
pub struct SqliteTrilhaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrilhaRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["trilhas", "empresas", "fichas", "consultores"])?;
        Ok(Self { conn })
    }
}

impl TrilhaRepository for SqliteTrilhaRepository<'_> {
    fn create_trilha(
        &self,
        empresa_id: EntityId,
        ficha_id: EntityId,
        consultor_id: Option<EntityId>,
    ) -> RepoResult<Trilha> {
        self.conn.execute(
            "INSERT INTO trilhas (empresa_id, ficha_id, consultor_id, status)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                empresa_id,
                ficha_id,
                consultor_id,
                TrilhaStatus::Pendente.as_str()
            ],
        )?;
        Ok(Trilha {
            id: self.conn.last_insert_rowid(),
            empresa_id,
            ficha_id,
            consultor_id,
            status: TrilhaStatus::Pendente,
            data_execucao: None,
        })
    }

    fn get_trilha(&self, id: EntityId) -> RepoResult<Option<Trilha>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, empresa_id, ficha_id, consultor_id, status, data_execucao
                 FROM trilhas
                 WHERE id = ?1;",
                [id],
                |row| {
                    Ok((
                        row.get::<_, EntityId>("id")?,
                        row.get::<_, EntityId>("empresa_id")?,
                        row.get::<_, EntityId>("ficha_id")?,
                        row.get::<_, Option<EntityId>>("consultor_id")?,
                        row.get::<_, String>("status")?,
                        row.get::<_, Option<i64>>("data_execucao")?,
                    ))
                },
            )
            .optional()?;

        let Some((id, empresa_id, ficha_id, consultor_id, status, data_execucao)) = row else {
            return Ok(None);
        };
        Ok(Some(Trilha {
            id,
            empresa_id,
            ficha_id,
            consultor_id,
            status: parse_status(&status)?,
            data_execucao,
        }))
    }

    fn get_trilha_view(&self, id: EntityId) -> RepoResult<Option<TrilhaView>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TRILHA_VIEW_SQL} WHERE t.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_view_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_trilhas(&self) -> RepoResult<Vec<TrilhaView>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TRILHA_VIEW_SQL} ORDER BY t.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut trilhas = Vec::new();
        while let Some(row) = rows.next()? {
            trilhas.push(parse_view_row(row)?);
        }
        Ok(trilhas)
    }

    fn list_history(&self, empresa_id: EntityId) -> RepoResult<Vec<HistoricoEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TRILHA_VIEW_SQL}
             WHERE t.empresa_id = ?1
             ORDER BY f.titulo COLLATE NOCASE ASC, t.id ASC;"
        ))?;
        let mut rows = stmt.query([empresa_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let view = parse_view_row(row)?;
            entries.push(HistoricoEntry {
                trilha_id: view.id,
                ficha_titulo: view.ficha_titulo,
                status: view.status,
                consultor_nome: view.consultor_nome,
                data_execucao: view.data_execucao,
            });
        }
        Ok(entries)
    }

    fn update_status(
        &self,
        id: EntityId,
        status: TrilhaStatus,
        data_execucao: Option<i64>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE trilhas SET status = ?1, data_execucao = ?2 WHERE id = ?3;",
            params![status.as_str(), data_execucao, id],
        )?;
        if changed == 0 {
            return Err(RepoError::TrilhaNotFound(id));
        }
        Ok(())
    }

    fn assign_consultor(&self, id: EntityId, consultor_id: Option<EntityId>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE trilhas SET consultor_id = ?1 WHERE id = ?2;",
            params![consultor_id, id],
        )?;
        if changed == 0 {
            return Err(RepoError::TrilhaNotFound(id));
        }
        Ok(())
    }
}

fn parse_view_row(row: &Row<'_>) -> RepoResult<TrilhaView> {
    let status: String = row.get("status")?;
    Ok(TrilhaView {
        id: row.get("id")?,
        empresa_id: row.get("empresa_id")?,
        empresa_nome: row.get("empresa_nome")?,
        ficha_id: row.get("ficha_id")?,
        ficha_titulo: row.get("ficha_titulo")?,
        consultor_id: row.get("consultor_id")?,
        consultor_nome: row.get("consultor_nome")?,
        status: parse_status(&status)?,
        data_execucao: row.get("data_execucao")?,
    })
}

fn parse_status(value: &str) -> RepoResult<TrilhaStatus> {
    TrilhaStatus::parse(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{value}` in trilhas.status"))
    })
}
