//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand, ValueEnum};
use nucleotec_core::{AssociationKind, CatalogKind, EntityId, TrilhaStatus};
use std::path::PathBuf;

/// NucleoTec - consultancy registry for empresas, fichas and trilhas.
#[derive(Debug, Parser)]
#[command(name = "nucleotec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "nucleotec.toml")]
    pub config: PathBuf,

    /// SQLite database path (overrides `database_path`)
    #[arg(long, global = true, env = "NUCLEOTEC_DB")]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or migrate the database and report its schema version
    Init,

    /// Manage client companies
    Empresa(EmpresaArgs),

    /// Manage consultants
    Consultor(ConsultorArgs),

    /// Manage technical sheets
    Ficha(FichaArgs),

    /// Manage reference catalogs
    Catalog(CatalogArgs),

    /// Show or replace many-to-many selections
    Assoc(AssocArgs),

    /// Manage empresa x ficha tracks
    Trilha(TrilhaArgs),

    /// Show the trilha history of one empresa
    Historico {
        /// Empresa id
        empresa_id: EntityId,
    },
}

#[derive(Debug, Args)]
pub struct EmpresaArgs {
    #[command(subcommand)]
    pub action: EmpresaAction,
}

#[derive(Debug, Args)]
pub struct EmpresaFields {
    /// Company name
    pub nome: String,

    /// CNPJ, with or without punctuation
    pub cnpj: String,

    /// Contact person or phone
    #[arg(long)]
    pub contato: Option<String>,

    #[arg(long)]
    pub cidade: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum EmpresaAction {
    /// Register a company
    Add(EmpresaFields),
    List,
    Show {
        id: EntityId,
    },
    /// Replace every field of a company
    Update {
        id: EntityId,
        #[command(flatten)]
        fields: EmpresaFields,
    },
    /// Delete a company that is on no trilha
    Delete {
        id: EntityId,
    },
}

#[derive(Debug, Args)]
pub struct ConsultorArgs {
    #[command(subcommand)]
    pub action: ConsultorAction,
}

#[derive(Debug, Args)]
pub struct ConsultorFields {
    pub nome: String,

    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConsultorAction {
    /// Register a consultant
    Add(ConsultorFields),
    List,
    Show {
        id: EntityId,
    },
    Update {
        id: EntityId,
        #[command(flatten)]
        fields: ConsultorFields,
    },
    Delete {
        id: EntityId,
    },
}

#[derive(Debug, Args)]
pub struct FichaArgs {
    #[command(subcommand)]
    pub action: FichaAction,
}

#[derive(Debug, Args)]
pub struct FichaFields {
    pub titulo: String,

    #[arg(long)]
    pub descricao: Option<String>,

    /// Workload in hours (at least 1)
    #[arg(long)]
    pub duracao_horas: Option<u32>,

    /// Categoria de serviço id
    #[arg(long)]
    pub categoria: Option<EntityId>,

    /// Tipo de serviço id
    #[arg(long)]
    pub tipo_servico: Option<EntityId>,

    /// Instrumento id
    #[arg(long)]
    pub instrumento: Option<EntityId>,

    /// Modalidade id
    #[arg(long)]
    pub modalidade: Option<EntityId>,
}

#[derive(Debug, Subcommand)]
pub enum FichaAction {
    /// Register a technical sheet
    Add(FichaFields),
    List,
    /// Show a ficha with its público alvo, setores and macro segmentos
    Show {
        id: EntityId,
    },
    Update {
        id: EntityId,
        #[command(flatten)]
        fields: FichaFields,
    },
    Delete {
        id: EntityId,
    },
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub action: CatalogAction,
}

#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    Add {
        #[arg(value_enum)]
        kind: CatalogKindArg,
        nome: String,
    },
    List {
        #[arg(value_enum)]
        kind: CatalogKindArg,
    },
    Rename {
        #[arg(value_enum)]
        kind: CatalogKindArg,
        id: EntityId,
        nome: String,
    },
    /// Delete an item no ficha references
    Delete {
        #[arg(value_enum)]
        kind: CatalogKindArg,
        id: EntityId,
    },
}

/// Catalog selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKindArg {
    Categoria,
    TipoServico,
    Instrumento,
    Modalidade,
    Porte,
    Setor,
    MacroSegmento,
}

impl From<CatalogKindArg> for CatalogKind {
    fn from(value: CatalogKindArg) -> Self {
        match value {
            CatalogKindArg::Categoria => CatalogKind::CategoriaServico,
            CatalogKindArg::TipoServico => CatalogKind::TipoServico,
            CatalogKindArg::Instrumento => CatalogKind::Instrumento,
            CatalogKindArg::Modalidade => CatalogKind::Modalidade,
            CatalogKindArg::Porte => CatalogKind::Porte,
            CatalogKindArg::Setor => CatalogKind::Setor,
            CatalogKindArg::MacroSegmento => CatalogKind::MacroSegmento,
        }
    }
}

#[derive(Debug, Args)]
pub struct AssocArgs {
    #[command(subcommand)]
    pub action: AssocAction,
}

#[derive(Debug, Subcommand)]
pub enum AssocAction {
    /// List candidates of a relation, marking the selected ones
    Show {
        #[arg(value_enum)]
        kind: AssocKindArg,
        parent_id: EntityId,
    },
    /// Replace the selection of a relation; no ids clears it
    Set {
        #[arg(value_enum)]
        kind: AssocKindArg,
        parent_id: EntityId,
        /// Related ids, space or comma separated
        #[arg(num_args = 0.., value_delimiter = ',')]
        ids: Vec<EntityId>,
        /// Roll back every row when any row fails
        #[arg(long)]
        atomic: bool,
    },
}

/// Relation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssocKindArg {
    /// Ficha -> portes
    PublicoAlvo,
    /// Ficha -> setores
    Setores,
    /// Ficha -> macro segmentos
    MacroSegmentos,
    /// Empresa -> fichas
    TrilhaFichas,
}

impl From<AssocKindArg> for AssociationKind {
    fn from(value: AssocKindArg) -> Self {
        match value {
            AssocKindArg::PublicoAlvo => AssociationKind::PublicoAlvo,
            AssocKindArg::Setores => AssociationKind::SetoresIndicados,
            AssocKindArg::MacroSegmentos => AssociationKind::MacroSegmentos,
            AssocKindArg::TrilhaFichas => AssociationKind::TrilhaFichas,
        }
    }
}

#[derive(Debug, Args)]
pub struct TrilhaArgs {
    #[command(subcommand)]
    pub action: TrilhaAction,
}

#[derive(Debug, Subcommand)]
pub enum TrilhaAction {
    /// Put one ficha on an empresa's trilha as pendente
    Add {
        empresa_id: EntityId,
        ficha_id: EntityId,
        #[arg(long)]
        consultor: Option<EntityId>,
    },
    List,
    /// Change status; concluida without --data stamps the current time
    Status {
        id: EntityId,
        #[arg(value_enum)]
        status: StatusArg,
        /// Execution date as Unix epoch milliseconds
        #[arg(long)]
        data: Option<i64>,
    },
    /// Set the consultor; omit --consultor to clear it
    Assign {
        id: EntityId,
        #[arg(long)]
        consultor: Option<EntityId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pendente,
    EmAndamento,
    Concluida,
    Cancelada,
}

impl From<StatusArg> for TrilhaStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pendente => TrilhaStatus::Pendente,
            StatusArg::EmAndamento => TrilhaStatus::EmAndamento,
            StatusArg::Concluida => TrilhaStatus::Concluida,
            StatusArg::Cancelada => TrilhaStatus::Cancelada,
        }
    }
}
