//! Trilha use-case service.
//!
//! # Responsibility
//! - Add fichas to an empresa's trilha, list trilhas and empresa history.
//! - Apply status transitions with execution-date stamping.
//!
//! # Invariants
//! - `concluida` always carries an execution date.
//! - `pendente` never carries an execution date.

use crate::model::kind::EntityId;
use crate::model::trilha::{HistoricoEntry, Trilha, TrilhaStatus, TrilhaView};
use crate::repo::trilha_repo::TrilhaRepository;
use crate::service::registry_service::{ServiceError, ServiceResult};
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};

/// Trilha service facade over repository implementations.
pub struct TrilhaService<R: TrilhaRepository> {
    repo: R,
}

impl<R: TrilhaRepository> TrilhaService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds one ficha to an empresa's trilha as `pendente`.
    pub fn add(
        &self,
        empresa_id: EntityId,
        ficha_id: EntityId,
        consultor_id: Option<EntityId>,
    ) -> ServiceResult<Trilha> {
        let trilha = self.repo.create_trilha(empresa_id, ficha_id, consultor_id)?;
        info!(
            "event=trilha_add module=service status=ok trilha_id={} empresa_id={} ficha_id={}",
            trilha.id, empresa_id, ficha_id
        );
        Ok(trilha)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<Trilha> {
        self.repo
            .get_trilha(id)?
            .ok_or(ServiceError::TrilhaNotFound(id))
    }

    /// Returns one trilha with empresa/ficha/consultor names resolved.
    pub fn get_view(&self, id: EntityId) -> ServiceResult<TrilhaView> {
        self.repo
            .get_trilha_view(id)?
            .ok_or(ServiceError::TrilhaNotFound(id))
    }

    pub fn list(&self) -> ServiceResult<Vec<TrilhaView>> {
        Ok(self.repo.list_trilhas()?)
    }

    pub fn history(&self, empresa_id: EntityId) -> ServiceResult<Vec<HistoricoEntry>> {
        Ok(self.repo.list_history(empresa_id)?)
    }

    /// Moves a trilha to `status`, stamping the current time when needed.
    pub fn update_status(
        &self,
        id: EntityId,
        status: TrilhaStatus,
        data_execucao: Option<i64>,
    ) -> ServiceResult<Trilha> {
        self.update_status_at(id, status, data_execucao, now_epoch_ms())
    }

    /// Same as `update_status` with an explicit clock value.
    pub fn update_status_at(
        &self,
        id: EntityId,
        status: TrilhaStatus,
        data_execucao: Option<i64>,
        now_ms: i64,
    ) -> ServiceResult<Trilha> {
        let current = self.get(id)?;
        let resolved = match status {
            TrilhaStatus::Pendente => None,
            TrilhaStatus::Concluida => Some(data_execucao.unwrap_or(now_ms)),
            TrilhaStatus::EmAndamento | TrilhaStatus::Cancelada => {
                data_execucao.or(current.data_execucao)
            }
        };
        self.repo.update_status(id, status, resolved)?;
        info!(
            "event=trilha_status module=service status=ok trilha_id={} from={} to={}",
            id, current.status, status
        );
        Ok(Trilha {
            status,
            data_execucao: resolved,
            ..current
        })
    }

    /// Sets or clears the consultor of one trilha.
    pub fn assign_consultor(
        &self,
        id: EntityId,
        consultor_id: Option<EntityId>,
    ) -> ServiceResult<Trilha> {
        self.repo.assign_consultor(id, consultor_id)?;
        self.get(id)
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
