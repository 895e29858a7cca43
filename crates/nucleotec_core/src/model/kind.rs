//! Static entity and association kind tables.
//!
//! # Responsibility
//! - Name every registry table the core touches.
//! - Map each entity kind to its id/label columns and dependent relations.
//! - Map each association kind to its junction table and key columns.
//!
//! # Invariants
//! - SQL identifiers only ever come from these `'static` tables, never from
//!   caller input.
//! - Every foreign key declared by the migrations that points at an entity
//!   table is listed in that entity's `dependents`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Integer primary key shared by every registry table.
pub type EntityId = i64;

/// One `(table, column)` pair that holds a foreign key to some entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependentRef {
    pub table: &'static str,
    pub column: &'static str,
}

/// Fixed storage layout of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityLayout {
    pub table: &'static str,
    pub id_column: &'static str,
    pub label_column: &'static str,
    pub dependents: &'static [DependentRef],
}

/// Every entity kind stored by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Empresa,
    Consultor,
    Ficha,
    CategoriaServico,
    TipoServico,
    Instrumento,
    Modalidade,
    Porte,
    Setor,
    MacroSegmento,
}

const EMPRESA_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "trilhas",
    column: "empresa_id",
}];
const CONSULTOR_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "trilhas",
    column: "consultor_id",
}];
const FICHA_DEPENDENTS: &[DependentRef] = &[
    DependentRef {
        table: "trilhas",
        column: "ficha_id",
    },
    DependentRef {
        table: "fichas_publico_alvo",
        column: "ficha_id",
    },
    DependentRef {
        table: "fichas_setores",
        column: "ficha_id",
    },
    DependentRef {
        table: "fichas_macro_segmentos",
        column: "ficha_id",
    },
];
const CATEGORIA_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "fichas",
    column: "categoria_id",
}];
const TIPO_SERVICO_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "fichas",
    column: "tipo_servico_id",
}];
const INSTRUMENTO_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "fichas",
    column: "instrumento_id",
}];
const MODALIDADE_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "fichas",
    column: "modalidade_id",
}];
const PORTE_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "fichas_publico_alvo",
    column: "porte_id",
}];
const SETOR_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "fichas_setores",
    column: "setor_id",
}];
const MACRO_SEGMENTO_DEPENDENTS: &[DependentRef] = &[DependentRef {
    table: "fichas_macro_segmentos",
    column: "macro_segmento_id",
}];

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        Self::Empresa,
        Self::Consultor,
        Self::Ficha,
        Self::CategoriaServico,
        Self::TipoServico,
        Self::Instrumento,
        Self::Modalidade,
        Self::Porte,
        Self::Setor,
        Self::MacroSegmento,
    ];

    /// Returns the fixed storage layout for this kind.
    pub fn layout(self) -> EntityLayout {
        let (table, label_column, dependents) = match self {
            Self::Empresa => ("empresas", "nome", EMPRESA_DEPENDENTS),
            Self::Consultor => ("consultores", "nome", CONSULTOR_DEPENDENTS),
            Self::Ficha => ("fichas", "titulo", FICHA_DEPENDENTS),
            Self::CategoriaServico => ("categorias_servico", "nome", CATEGORIA_DEPENDENTS),
            Self::TipoServico => ("tipos_servico", "nome", TIPO_SERVICO_DEPENDENTS),
            Self::Instrumento => ("instrumentos", "nome", INSTRUMENTO_DEPENDENTS),
            Self::Modalidade => ("modalidades", "nome", MODALIDADE_DEPENDENTS),
            Self::Porte => ("portes", "nome", PORTE_DEPENDENTS),
            Self::Setor => ("setores", "nome", SETOR_DEPENDENTS),
            Self::MacroSegmento => ("macro_segmentos", "nome", MACRO_SEGMENTO_DEPENDENTS),
        };
        EntityLayout {
            table,
            id_column: "id",
            label_column,
            dependents,
        }
    }

    /// Stable snake_case name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empresa => "empresa",
            Self::Consultor => "consultor",
            Self::Ficha => "ficha",
            Self::CategoriaServico => "categoria_servico",
            Self::TipoServico => "tipo_servico",
            Self::Instrumento => "instrumento",
            Self::Modalidade => "modalidade",
            Self::Porte => "porte",
            Self::Setor => "setor",
            Self::MacroSegmento => "macro_segmento",
        }
    }

    /// Returns the catalog view of this kind, if it is a simple id+name table.
    pub fn as_catalog(self) -> Option<CatalogKind> {
        CatalogKind::ALL
            .into_iter()
            .find(|catalog| catalog.entity_kind() == self)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simple reference tables made of an id and a unique name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    CategoriaServico,
    TipoServico,
    Instrumento,
    Modalidade,
    Porte,
    Setor,
    MacroSegmento,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 7] = [
        Self::CategoriaServico,
        Self::TipoServico,
        Self::Instrumento,
        Self::Modalidade,
        Self::Porte,
        Self::Setor,
        Self::MacroSegmento,
    ];

    pub fn entity_kind(self) -> EntityKind {
        match self {
            Self::CategoriaServico => EntityKind::CategoriaServico,
            Self::TipoServico => EntityKind::TipoServico,
            Self::Instrumento => EntityKind::Instrumento,
            Self::Modalidade => EntityKind::Modalidade,
            Self::Porte => EntityKind::Porte,
            Self::Setor => EntityKind::Setor,
            Self::MacroSegmento => EntityKind::MacroSegmento,
        }
    }

    pub fn table(self) -> &'static str {
        self.entity_kind().layout().table
    }
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.entity_kind().as_str())
    }
}

/// Fixed storage layout of one many-to-many relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationLayout {
    pub table: &'static str,
    pub parent_column: &'static str,
    pub related_column: &'static str,
    pub parent_kind: EntityKind,
    pub related_kind: EntityKind,
}

/// Many-to-many relations managed through reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// Ficha -> target business sizes (portes).
    PublicoAlvo,
    /// Ficha -> recommended sectors.
    SetoresIndicados,
    /// Ficha -> macro segments.
    MacroSegmentos,
    /// Empresa -> fichas on its trilha. Rows carry trilha defaults on link.
    TrilhaFichas,
}

impl AssociationKind {
    pub const ALL: [AssociationKind; 4] = [
        Self::PublicoAlvo,
        Self::SetoresIndicados,
        Self::MacroSegmentos,
        Self::TrilhaFichas,
    ];

    pub fn layout(self) -> AssociationLayout {
        match self {
            Self::PublicoAlvo => AssociationLayout {
                table: "fichas_publico_alvo",
                parent_column: "ficha_id",
                related_column: "porte_id",
                parent_kind: EntityKind::Ficha,
                related_kind: EntityKind::Porte,
            },
            Self::SetoresIndicados => AssociationLayout {
                table: "fichas_setores",
                parent_column: "ficha_id",
                related_column: "setor_id",
                parent_kind: EntityKind::Ficha,
                related_kind: EntityKind::Setor,
            },
            Self::MacroSegmentos => AssociationLayout {
                table: "fichas_macro_segmentos",
                parent_column: "ficha_id",
                related_column: "macro_segmento_id",
                parent_kind: EntityKind::Ficha,
                related_kind: EntityKind::MacroSegmento,
            },
            Self::TrilhaFichas => AssociationLayout {
                table: "trilhas",
                parent_column: "empresa_id",
                related_column: "ficha_id",
                parent_kind: EntityKind::Empresa,
                related_kind: EntityKind::Ficha,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PublicoAlvo => "publico_alvo",
            Self::SetoresIndicados => "setores_indicados",
            Self::MacroSegmentos => "macro_segmentos",
            Self::TrilhaFichas => "trilha_fichas",
        }
    }
}

impl Display for AssociationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
