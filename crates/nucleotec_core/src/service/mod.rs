//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod association_service;
pub mod catalog_service;
pub mod reconcile;
pub mod registry_service;
pub mod trilha_service;
