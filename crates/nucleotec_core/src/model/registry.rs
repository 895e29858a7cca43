//! Registry records: empresas, consultores, fichas and catalog items.
//!
//! # Responsibility
//! - Define persisted record shapes and their write-side drafts.
//! - Normalize and validate drafts before any SQL mutation.
//!
//! # Invariants
//! - Required text fields are trimmed and never blank.
//! - Optional text fields are trimmed; blank input is stored as `None`.
//! - `cnpj` is stored as exactly 14 ASCII digits.
//! - `duracao_horas` is at least 1 when present.

use crate::model::kind::EntityId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static CNPJ_PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s./-]").expect("valid cnpj punctuation regex"));
static CNPJ_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{14}$").expect("valid cnpj digits regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Field-level validation failures for registry drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is blank after trim.
    BlankField(&'static str),
    /// CNPJ does not contain exactly 14 digits after normalization.
    InvalidCnpj(String),
    /// Email is present but malformed.
    InvalidEmail(String),
    /// Duration is present but lower than one hour.
    InvalidDuration(u32),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::InvalidCnpj(value) => {
                write!(f, "invalid cnpj `{value}`: expected 14 digits")
            }
            Self::InvalidEmail(value) => write!(f, "invalid email `{value}`"),
            Self::InvalidDuration(value) => {
                write!(f, "invalid duracao_horas {value}: must be at least 1")
            }
        }
    }
}

impl Error for ValidationError {}

/// Row of any simple id+name catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: EntityId,
    pub nome: String,
}

/// Client company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empresa {
    pub id: EntityId,
    pub nome: String,
    /// 14 digits, no punctuation.
    pub cnpj: String,
    pub contato: Option<String>,
    pub cidade: Option<String>,
}

/// Write-side fields of an empresa.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpresaDraft {
    pub nome: String,
    pub cnpj: String,
    pub contato: Option<String>,
    pub cidade: Option<String>,
}

impl EmpresaDraft {
    pub fn new(nome: impl Into<String>, cnpj: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            cnpj: cnpj.into(),
            contato: None,
            cidade: None,
        }
    }

    /// Returns a trimmed copy with a digits-only CNPJ, or the first invalid field.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            nome: required_text("nome", &self.nome)?,
            cnpj: normalize_cnpj(&self.cnpj)?,
            contato: optional_text(self.contato.as_deref()),
            cidade: optional_text(self.cidade.as_deref()),
        })
    }
}

/// Consultant assigned to trilhas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultor {
    pub id: EntityId,
    pub nome: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultorDraft {
    pub nome: String,
    pub email: Option<String>,
}

impl ConsultorDraft {
    pub fn new(nome: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            email: None,
        }
    }

    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let email = optional_text(self.email.as_deref());
        if let Some(value) = email.as_deref() {
            if !EMAIL_RE.is_match(value) {
                return Err(ValidationError::InvalidEmail(value.to_string()));
            }
        }
        Ok(Self {
            nome: required_text("nome", &self.nome)?,
            email,
        })
    }
}

/// Technical sheet describing one consultancy service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ficha {
    pub id: EntityId,
    pub titulo: String,
    pub descricao: Option<String>,
    pub duracao_horas: Option<u32>,
    pub categoria_id: Option<EntityId>,
    pub tipo_servico_id: Option<EntityId>,
    pub instrumento_id: Option<EntityId>,
    pub modalidade_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FichaDraft {
    pub titulo: String,
    pub descricao: Option<String>,
    pub duracao_horas: Option<u32>,
    pub categoria_id: Option<EntityId>,
    pub tipo_servico_id: Option<EntityId>,
    pub instrumento_id: Option<EntityId>,
    pub modalidade_id: Option<EntityId>,
}

impl FichaDraft {
    pub fn new(titulo: impl Into<String>) -> Self {
        Self {
            titulo: titulo.into(),
            ..Self::default()
        }
    }

    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if let Some(hours) = self.duracao_horas {
            if hours < 1 {
                return Err(ValidationError::InvalidDuration(hours));
            }
        }
        Ok(Self {
            titulo: required_text("titulo", &self.titulo)?,
            descricao: optional_text(self.descricao.as_deref()),
            ..self.clone()
        })
    }
}

/// Ficha read model with its three association sets resolved to names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FichaDetail {
    pub ficha: Ficha,
    pub publico_alvo: Vec<CatalogItem>,
    pub setores_indicados: Vec<CatalogItem>,
    pub macro_segmentos: Vec<CatalogItem>,
}

/// Trims a required text field, rejecting blank values.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

/// Strips CNPJ punctuation (`.`, `/`, `-`, whitespace) and checks for 14 digits.
pub fn normalize_cnpj(value: &str) -> Result<String, ValidationError> {
    let digits = CNPJ_PUNCTUATION_RE.replace_all(value, "");
    if !CNPJ_DIGITS_RE.is_match(&digits) {
        return Err(ValidationError::InvalidCnpj(value.to_string()));
    }
    Ok(digits.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cnpj_punctuation_is_stripped() {
        assert_eq!(
            normalize_cnpj("12.345.678/0001-90").unwrap(),
            "12345678000190"
        );
        assert_eq!(normalize_cnpj(" 12345678000190 ").unwrap(), "12345678000190");
    }

    #[test]
    fn cnpj_with_wrong_length_or_letters_is_rejected() {
        assert!(matches!(
            normalize_cnpj("1234"),
            Err(ValidationError::InvalidCnpj(_))
        ));
        assert!(matches!(
            normalize_cnpj("12.345.678/0001-9X"),
            Err(ValidationError::InvalidCnpj(_))
        ));
    }

    #[test]
    fn empresa_draft_trims_and_drops_blank_optionals() {
        let draft = EmpresaDraft {
            nome: "  Acme  ".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            contato: Some("   ".to_string()),
            cidade: Some(" Recife ".to_string()),
        };
        let normalized = draft.normalized().unwrap();
        assert_eq!(normalized.nome, "Acme");
        assert_eq!(normalized.contato, None);
        assert_eq!(normalized.cidade.as_deref(), Some("Recife"));
    }

    #[test]
    fn consultor_email_must_look_like_an_address() {
        let mut draft = ConsultorDraft::new("Ana");
        draft.email = Some("ana.example.com".to_string());
        assert!(matches!(
            draft.normalized(),
            Err(ValidationError::InvalidEmail(_))
        ));

        draft.email = Some(" ana@example.com ".to_string());
        assert_eq!(
            draft.normalized().unwrap().email.as_deref(),
            Some("ana@example.com")
        );
    }

    #[test]
    fn ficha_requires_title_and_positive_duration() {
        assert_eq!(
            FichaDraft::new("  ").normalized(),
            Err(ValidationError::BlankField("titulo"))
        );

        let mut draft = FichaDraft::new("Diagnóstico");
        draft.duracao_horas = Some(0);
        assert_eq!(draft.normalized(), Err(ValidationError::InvalidDuration(0)));
    }
}
