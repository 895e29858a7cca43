//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points for the simple reference catalogs.
//!
//! # Invariants
//! - Deleting a referenced catalog item fails with `ServiceError::InUse`.

use crate::model::kind::{CatalogKind, EntityId};
use crate::model::registry::CatalogItem;
use crate::repo::catalog_repo::CatalogRepository;
use crate::service::registry_service::{ServiceError, ServiceResult};

/// Catalog service facade over repository implementations.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create(&self, kind: CatalogKind, nome: &str) -> ServiceResult<CatalogItem> {
        Ok(self.repo.create_item(kind, nome)?)
    }

    pub fn get(&self, kind: CatalogKind, id: EntityId) -> ServiceResult<CatalogItem> {
        self.repo
            .get_item(kind, id)?
            .ok_or(ServiceError::NotFound {
                kind: kind.entity_kind(),
                id,
            })
    }

    pub fn list(&self, kind: CatalogKind) -> ServiceResult<Vec<CatalogItem>> {
        Ok(self.repo.list_items(kind)?)
    }

    /// Renames one item and returns its new state.
    pub fn rename(&self, kind: CatalogKind, id: EntityId, nome: &str) -> ServiceResult<CatalogItem> {
        self.repo.rename_item(kind, id, nome)?;
        self.get(kind, id)
    }

    pub fn delete(&self, kind: CatalogKind, id: EntityId) -> ServiceResult<()> {
        Ok(self.repo.delete_item(kind, id)?)
    }
}
