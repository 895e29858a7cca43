//! Registry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `empresas`, `consultores` and `fichas`.
//! - Resolve ficha association sets for detail views.
//!
//! # Invariants
//! - Write paths normalize drafts before SQL mutations.
//! - Deletes go through the referential-integrity guard.
//! - Listing is deterministic: label `COLLATE NOCASE ASC, id ASC`.

use crate::model::kind::{AssociationKind, EntityId, EntityKind};
use crate::model::registry::{
    Consultor, ConsultorDraft, Empresa, EmpresaDraft, Ficha, FichaDetail, FichaDraft,
};
use crate::repo::association_repo::load_associated_items;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::guard::delete_unreferenced;
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, OptionalExtension, Row};

const FICHA_SELECT_SQL: &str = "SELECT
    id,
    titulo,
    descricao,
    duracao_horas,
    categoria_id,
    tipo_servico_id,
    instrumento_id,
    modalidade_id
FROM fichas";

/// Repository interface for empresa/consultor/ficha records.
pub trait RegistryRepository {
    fn create_empresa(&self, draft: &EmpresaDraft) -> RepoResult<Empresa>;
    fn get_empresa(&self, id: EntityId) -> RepoResult<Option<Empresa>>;
    fn list_empresas(&self) -> RepoResult<Vec<Empresa>>;
    fn update_empresa(&self, id: EntityId, draft: &EmpresaDraft) -> RepoResult<Empresa>;
    fn delete_empresa(&self, id: EntityId) -> RepoResult<()>;

    fn create_consultor(&self, draft: &ConsultorDraft) -> RepoResult<Consultor>;
    fn get_consultor(&self, id: EntityId) -> RepoResult<Option<Consultor>>;
    fn list_consultores(&self) -> RepoResult<Vec<Consultor>>;
    fn update_consultor(&self, id: EntityId, draft: &ConsultorDraft) -> RepoResult<Consultor>;
    fn delete_consultor(&self, id: EntityId) -> RepoResult<()>;

    fn create_ficha(&self, draft: &FichaDraft) -> RepoResult<Ficha>;
    fn get_ficha(&self, id: EntityId) -> RepoResult<Option<Ficha>>;
    fn list_fichas(&self) -> RepoResult<Vec<Ficha>>;
    fn update_ficha(&self, id: EntityId, draft: &FichaDraft) -> RepoResult<Ficha>;
    fn delete_ficha(&self, id: EntityId) -> RepoResult<()>;
    /// Ficha plus its público alvo, setores and macro segmentos.
    fn get_ficha_detail(&self, id: EntityId) -> RepoResult<Option<FichaDetail>>;
}

/// SQLite-backed registry repository.
pub struct SqliteRegistryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRegistryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                "empresas",
                "consultores",
                "fichas",
                "fichas_publico_alvo",
                "fichas_setores",
                "fichas_macro_segmentos",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl RegistryRepository for SqliteRegistryRepository<'_> {
    fn create_empresa(&self, draft: &EmpresaDraft) -> RepoResult<Empresa> {
        let draft = draft.normalized()?;
        self.conn.execute(
            "INSERT INTO empresas (nome, cnpj, contato, cidade) VALUES (?1, ?2, ?3, ?4);",
            params![draft.nome, draft.cnpj, draft.contato, draft.cidade],
        )?;
        Ok(empresa_from_draft(self.conn.last_insert_rowid(), draft))
    }

    fn get_empresa(&self, id: EntityId) -> RepoResult<Option<Empresa>> {
        let empresa = self
            .conn
            .query_row(
                "SELECT id, nome, cnpj, contato, cidade FROM empresas WHERE id = ?1;",
                [id],
                parse_empresa_row,
            )
            .optional()?;
        Ok(empresa)
    }

    fn list_empresas(&self) -> RepoResult<Vec<Empresa>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, nome, cnpj, contato, cidade
             FROM empresas
             ORDER BY nome COLLATE NOCASE ASC, id ASC;",
        )?;
        let empresas = stmt
            .query_map([], parse_empresa_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(empresas)
    }

    fn update_empresa(&self, id: EntityId, draft: &EmpresaDraft) -> RepoResult<Empresa> {
        let draft = draft.normalized()?;
        let changed = self.conn.execute(
            "UPDATE empresas
             SET nome = ?1, cnpj = ?2, contato = ?3, cidade = ?4
             WHERE id = ?5;",
            params![draft.nome, draft.cnpj, draft.contato, draft.cidade, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Empresa,
                id,
            });
        }
        Ok(empresa_from_draft(id, draft))
    }

    fn delete_empresa(&self, id: EntityId) -> RepoResult<()> {
        delete_unreferenced(self.conn, EntityKind::Empresa, id)
    }

    fn create_consultor(&self, draft: &ConsultorDraft) -> RepoResult<Consultor> {
        let draft = draft.normalized()?;
        self.conn.execute(
            "INSERT INTO consultores (nome, email) VALUES (?1, ?2);",
            params![draft.nome, draft.email],
        )?;
        Ok(Consultor {
            id: self.conn.last_insert_rowid(),
            nome: draft.nome,
            email: draft.email,
        })
    }

    fn get_consultor(&self, id: EntityId) -> RepoResult<Option<Consultor>> {
        let consultor = self
            .conn
            .query_row(
                "SELECT id, nome, email FROM consultores WHERE id = ?1;",
                [id],
                parse_consultor_row,
            )
            .optional()?;
        Ok(consultor)
    }

    fn list_consultores(&self) -> RepoResult<Vec<Consultor>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, nome, email
             FROM consultores
             ORDER BY nome COLLATE NOCASE ASC, id ASC;",
        )?;
        let consultores = stmt
            .query_map([], parse_consultor_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(consultores)
    }

    fn update_consultor(&self, id: EntityId, draft: &ConsultorDraft) -> RepoResult<Consultor> {
        let draft = draft.normalized()?;
        let changed = self.conn.execute(
            "UPDATE consultores SET nome = ?1, email = ?2 WHERE id = ?3;",
            params![draft.nome, draft.email, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Consultor,
                id,
            });
        }
        Ok(Consultor {
            id,
            nome: draft.nome,
            email: draft.email,
        })
    }

    fn delete_consultor(&self, id: EntityId) -> RepoResult<()> {
        delete_unreferenced(self.conn, EntityKind::Consultor, id)
    }

    fn create_ficha(&self, draft: &FichaDraft) -> RepoResult<Ficha> {
        let draft = draft.normalized()?;
        self.conn.execute(
            "INSERT INTO fichas (
                titulo,
                descricao,
                duracao_horas,
                categoria_id,
                tipo_servico_id,
                instrumento_id,
                modalidade_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                draft.titulo,
                draft.descricao,
                draft.duracao_horas,
                draft.categoria_id,
                draft.tipo_servico_id,
                draft.instrumento_id,
                draft.modalidade_id,
            ],
        )?;
        Ok(ficha_from_draft(self.conn.last_insert_rowid(), draft))
    }

    fn get_ficha(&self, id: EntityId) -> RepoResult<Option<Ficha>> {
        let ficha = self
            .conn
            .query_row(
                &format!("{FICHA_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_ficha_row,
            )
            .optional()?;
        Ok(ficha)
    }

    fn list_fichas(&self) -> RepoResult<Vec<Ficha>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FICHA_SELECT_SQL} ORDER BY titulo COLLATE NOCASE ASC, id ASC;"
        ))?;
        let fichas = stmt
            .query_map([], parse_ficha_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fichas)
    }

    fn update_ficha(&self, id: EntityId, draft: &FichaDraft) -> RepoResult<Ficha> {
        let draft = draft.normalized()?;
        let changed = self.conn.execute(
            "UPDATE fichas
             SET
                titulo = ?1,
                descricao = ?2,
                duracao_horas = ?3,
                categoria_id = ?4,
                tipo_servico_id = ?5,
                instrumento_id = ?6,
                modalidade_id = ?7
             WHERE id = ?8;",
            params![
                draft.titulo,
                draft.descricao,
                draft.duracao_horas,
                draft.categoria_id,
                draft.tipo_servico_id,
                draft.instrumento_id,
                draft.modalidade_id,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Ficha,
                id,
            });
        }
        Ok(ficha_from_draft(id, draft))
    }

    fn delete_ficha(&self, id: EntityId) -> RepoResult<()> {
        delete_unreferenced(self.conn, EntityKind::Ficha, id)
    }

    fn get_ficha_detail(&self, id: EntityId) -> RepoResult<Option<FichaDetail>> {
        let Some(ficha) = self.get_ficha(id)? else {
            return Ok(None);
        };
        Ok(Some(FichaDetail {
            publico_alvo: load_associated_items(self.conn, AssociationKind::PublicoAlvo, id)?,
            setores_indicados: load_associated_items(
                self.conn,
                AssociationKind::SetoresIndicados,
                id,
            )?,
            macro_segmentos: load_associated_items(
                self.conn,
                AssociationKind::MacroSegmentos,
                id,
            )?,
            ficha,
        }))
    }
}

fn empresa_from_draft(id: EntityId, draft: EmpresaDraft) -> Empresa {
    Empresa {
        id,
        nome: draft.nome,
        cnpj: draft.cnpj,
        contato: draft.contato,
        cidade: draft.cidade,
    }
}

fn ficha_from_draft(id: EntityId, draft: FichaDraft) -> Ficha {
    Ficha {
        id,
        titulo: draft.titulo,
        descricao: draft.descricao,
        duracao_horas: draft.duracao_horas,
        categoria_id: draft.categoria_id,
        tipo_servico_id: draft.tipo_servico_id,
        instrumento_id: draft.instrumento_id,
        modalidade_id: draft.modalidade_id,
    }
}

fn parse_empresa_row(row: &Row<'_>) -> rusqlite::Result<Empresa> {
    Ok(Empresa {
        id: row.get("id")?,
        nome: row.get("nome")?,
        cnpj: row.get("cnpj")?,
        contato: row.get("contato")?,
        cidade: row.get("cidade")?,
    })
}

fn parse_consultor_row(row: &Row<'_>) -> rusqlite::Result<Consultor> {
    Ok(Consultor {
        id: row.get("id")?,
        nome: row.get("nome")?,
        email: row.get("email")?,
    })
}

fn parse_ficha_row(row: &Row<'_>) -> rusqlite::Result<Ficha> {
    Ok(Ficha {
        id: row.get("id")?,
        titulo: row.get("titulo")?,
        descricao: row.get("descricao")?,
        duracao_horas: row.get("duracao_horas")?,
        categoria_id: row.get("categoria_id")?,
        tipo_servico_id: row.get("tipo_servico_id")?,
        instrumento_id: row.get("instrumento_id")?,
        modalidade_id: row.get("modalidade_id")?,
    })
}
