//! Trilha domain model.
//!
//! # Responsibility
//! - Define the empresa x ficha execution track and its status lifecycle.
//! - Provide read models joined with display names for listings/history.
//!
//! # Invariants
//! - One trilha row per (empresa, ficha) pair.
//! - `data_execucao` is Unix epoch milliseconds.

use crate::model::kind::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Execution status of one trilha row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrilhaStatus {
    /// Planned, not started. Default for new rows.
    #[default]
    Pendente,
    EmAndamento,
    Concluida,
    Cancelada,
}

impl TrilhaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendente => "pendente",
            Self::EmAndamento => "em_andamento",
            Self::Concluida => "concluida",
            Self::Cancelada => "cancelada",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pendente" => Some(Self::Pendente),
            "em_andamento" => Some(Self::EmAndamento),
            "concluida" => Some(Self::Concluida),
            "cancelada" => Some(Self::Cancelada),
            _ => None,
        }
    }
}

impl Display for TrilhaStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted trilha row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trilha {
    pub id: EntityId,
    pub empresa_id: EntityId,
    pub ficha_id: EntityId,
    pub consultor_id: Option<EntityId>,
    pub status: TrilhaStatus,
    pub data_execucao: Option<i64>,
}

/// Trilha listing row with empresa/ficha/consultor names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrilhaView {
    pub id: EntityId,
    pub empresa_id: EntityId,
    pub empresa_nome: String,
    pub ficha_id: EntityId,
    pub ficha_titulo: String,
    pub consultor_id: Option<EntityId>,
    pub consultor_nome: Option<String>,
    pub status: TrilhaStatus,
    pub data_execucao: Option<i64>,
}

/// One line of an empresa's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricoEntry {
    pub trilha_id: EntityId,
    pub ficha_titulo: String,
    pub status: TrilhaStatus,
    pub consultor_nome: Option<String>,
    pub data_execucao: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::TrilhaStatus;

    #[test]
    fn status_text_round_trips() {
        for status in [
            TrilhaStatus::Pendente,
            TrilhaStatus::EmAndamento,
            TrilhaStatus::Concluida,
            TrilhaStatus::Cancelada,
        ] {
            assert_eq!(TrilhaStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TrilhaStatus::parse("done"), None);
    }

    #[test]
    fn default_status_is_pendente() {
        assert_eq!(TrilhaStatus::default(), TrilhaStatus::Pendente);
    }

    #[test]
    fn serde_uses_storage_names() {
        for status in [TrilhaStatus::EmAndamento, TrilhaStatus::Cancelada] {
            let encoded = serde_json::to_string(&status).unwrap();
            assert_eq!(encoded, format!("\"{}\"", status.as_str()));
        }
    }
}
