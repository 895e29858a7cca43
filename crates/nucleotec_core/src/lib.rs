//! Core domain logic for the NucleoTec consultancy registry.
//! This crate is the single source of truth for registry invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::kind::{AssociationKind, CatalogKind, EntityId, EntityKind};
pub use model::registry::{
    CatalogItem, Consultor, ConsultorDraft, Empresa, EmpresaDraft, Ficha, FichaDetail, FichaDraft,
    ValidationError,
};
pub use model::trilha::{HistoricoEntry, Trilha, TrilhaStatus, TrilhaView};
pub use repo::association_repo::{AssociationStore, SqliteAssociationStore};
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use repo::error::{RepoError, RepoResult, StorageFault};
pub use repo::registry_repo::{RegistryRepository, SqliteRegistryRepository};
pub use repo::trilha_repo::{SqliteTrilhaRepository, TrilhaRepository};
pub use service::association_service::{
    reconcile_with_mode, selection_view, AssociationService, AssociationServiceError,
    ReconcileMode, SelectionEntry,
};
pub use service::catalog_service::CatalogService;
pub use service::reconcile::{
    reconcile, ReconcileError, ReconcilePlan, ReconcileReport, RowFailure, RowOp,
};
pub use service::registry_service::{RegistryService, ServiceError, ServiceResult};
pub use service::trilha_service::TrilhaService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
