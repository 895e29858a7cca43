//! Registry use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete entry points for empresas,
//!   consultores and fichas.
//! - Translate repository failures into caller-facing service errors.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or the delete guard.
//! - `get_*` turns a missing row into `ServiceError::NotFound`.

use crate::model::kind::{EntityId, EntityKind};
use crate::model::registry::{
    Consultor, ConsultorDraft, Empresa, EmpresaDraft, Ficha, FichaDetail, FichaDraft,
    ValidationError,
};
use crate::repo::error::{RepoError, StorageFault};
use crate::repo::registry_repo::RegistryRepository;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-facing error shared by the CRUD services.
#[derive(Debug)]
pub enum ServiceError {
    /// Draft rejected before persistence.
    Invalid(ValidationError),
    /// Target row does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// Target trilha does not exist.
    TrilhaNotFound(EntityId),
    /// Delete blocked by live references.
    InUse {
        kind: EntityKind,
        id: EntityId,
        references: u64,
    },
    /// Uniqueness or foreign-key rule rejected the write.
    Conflict(RepoError),
    /// Storage failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::TrilhaNotFound(id) => write!(f, "trilha not found: {id}"),
            Self::InUse {
                kind,
                id,
                references,
            } => write!(
                f,
                "cannot delete {kind} {id}: still referenced by {references} row(s)"
            ),
            Self::Conflict(err) => write!(f, "conflicting data: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Conflict(err) | Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::TrilhaNotFound(id) => Self::TrilhaNotFound(id),
            RepoError::InUse {
                kind,
                id,
                references,
            } => Self::InUse {
                kind,
                id,
                references,
            },
            other if other.fault() == StorageFault::ConstraintViolation => Self::Conflict(other),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Registry service facade over repository implementations.
pub struct RegistryService<R: RegistryRepository> {
    repo: R,
}

impl<R: RegistryRepository> RegistryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_empresa(&self, draft: &EmpresaDraft) -> ServiceResult<Empresa> {
        Ok(self.repo.create_empresa(draft)?)
    }

    pub fn get_empresa(&self, id: EntityId) -> ServiceResult<Empresa> {
        self.repo
            .get_empresa(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Empresa,
                id,
            })
    }

    pub fn list_empresas(&self) -> ServiceResult<Vec<Empresa>> {
        Ok(self.repo.list_empresas()?)
    }

    pub fn update_empresa(&self, id: EntityId, draft: &EmpresaDraft) -> ServiceResult<Empresa> {
        Ok(self.repo.update_empresa(id, draft)?)
    }

    /// Deletes an empresa that has no trilha rows.
    pub fn delete_empresa(&self, id: EntityId) -> ServiceResult<()> {
        Ok(self.repo.delete_empresa(id)?)
    }

    pub fn create_consultor(&self, draft: &ConsultorDraft) -> ServiceResult<Consultor> {
        Ok(self.repo.create_consultor(draft)?)
    }

    pub fn get_consultor(&self, id: EntityId) -> ServiceResult<Consultor> {
        self.repo
            .get_consultor(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Consultor,
                id,
            })
    }

    pub fn list_consultores(&self) -> ServiceResult<Vec<Consultor>> {
        Ok(self.repo.list_consultores()?)
    }

    pub fn update_consultor(
        &self,
        id: EntityId,
        draft: &ConsultorDraft,
    ) -> ServiceResult<Consultor> {
        Ok(self.repo.update_consultor(id, draft)?)
    }

    /// Deletes a consultor not assigned to any trilha.
    pub fn delete_consultor(&self, id: EntityId) -> ServiceResult<()> {
        Ok(self.repo.delete_consultor(id)?)
    }

    pub fn create_ficha(&self, draft: &FichaDraft) -> ServiceResult<Ficha> {
        Ok(self.repo.create_ficha(draft)?)
    }

    pub fn get_ficha(&self, id: EntityId) -> ServiceResult<Ficha> {
        self.repo.get_ficha(id)?.ok_or(ServiceError::NotFound {
            kind: EntityKind::Ficha,
            id,
        })
    }

    pub fn get_ficha_detail(&self, id: EntityId) -> ServiceResult<FichaDetail> {
        self.repo
            .get_ficha_detail(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Ficha,
                id,
            })
    }

    pub fn list_fichas(&self) -> ServiceResult<Vec<Ficha>> {
        Ok(self.repo.list_fichas()?)
    }

    pub fn update_ficha(&self, id: EntityId, draft: &FichaDraft) -> ServiceResult<Ficha> {
        Ok(self.repo.update_ficha(id, draft)?)
    }

    /// Deletes a ficha with no trilha rows and no associations.
    pub fn delete_ficha(&self, id: EntityId) -> ServiceResult<()> {
        Ok(self.repo.delete_ficha(id)?)
    }
}
