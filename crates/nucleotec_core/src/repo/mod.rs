//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories only accept fully migrated connections.
//! - Repository APIs return semantic errors (`NotFound`, `InUse`) in addition
//!   to DB transport errors.

pub mod association_repo;
pub mod catalog_repo;
pub mod error;
pub mod guard;
pub mod registry_repo;
pub mod schema;
pub mod trilha_repo;
