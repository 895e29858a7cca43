//! Registry domain model.
//!
//! # Responsibility
//! - Define canonical records used by repositories and services.
//! - Hold the static kind tables that drive all generic SQL.
//!
//! # Invariants
//! - Every record is identified by an integer `EntityId`.
//! - Deletion is a hard delete, guarded by reference counting.

pub mod kind;
pub mod registry;
pub mod trilha;
