//! Empresa, consultor and ficha command implementations.

use crate::cli::{
    ConsultorAction, ConsultorArgs, ConsultorFields, EmpresaAction, EmpresaArgs, EmpresaFields,
    FichaAction, FichaArgs, FichaFields,
};
use crate::error::Result;
use crate::output::Formatter;
use nucleotec_core::{
    ConsultorDraft, EmpresaDraft, FichaDraft, RegistryService, SqliteRegistryRepository,
};
use rusqlite::Connection;

impl From<EmpresaFields> for EmpresaDraft {
    fn from(fields: EmpresaFields) -> Self {
        Self {
            nome: fields.nome,
            cnpj: fields.cnpj,
            contato: fields.contato,
            cidade: fields.cidade,
        }
    }
}

impl From<ConsultorFields> for ConsultorDraft {
    fn from(fields: ConsultorFields) -> Self {
        Self {
            nome: fields.nome,
            email: fields.email,
        }
    }
}

impl From<FichaFields> for FichaDraft {
    fn from(fields: FichaFields) -> Self {
        Self {
            titulo: fields.titulo,
            descricao: fields.descricao,
            duracao_horas: fields.duracao_horas,
            categoria_id: fields.categoria,
            tipo_servico_id: fields.tipo_servico,
            instrumento_id: fields.instrumento,
            modalidade_id: fields.modalidade,
        }
    }
}

fn registry(conn: &Connection) -> Result<RegistryService<SqliteRegistryRepository<'_>>> {
    Ok(RegistryService::new(SqliteRegistryRepository::try_new(conn)?))
}

/// Execute the empresa command.
pub fn execute_empresa(
    args: EmpresaArgs,
    conn: &Connection,
    formatter: &Formatter,
) -> Result<String> {
    let service = registry(conn)?;

    match args.action {
        EmpresaAction::Add(fields) => formatter.record(&service.create_empresa(&fields.into())?),
        EmpresaAction::List => formatter.records(&service.list_empresas()?),
        EmpresaAction::Show { id } => formatter.record(&service.get_empresa(id)?),
        EmpresaAction::Update { id, fields } => {
            formatter.record(&service.update_empresa(id, &fields.into())?)
        }
        EmpresaAction::Delete { id } => {
            service.delete_empresa(id)?;
            formatter.success(&format!("Deleted empresa {id}"))
        }
    }
}

/// Execute the consultor command.
pub fn execute_consultor(
    args: ConsultorArgs,
    conn: &Connection,
    formatter: &Formatter,
) -> Result<String> {
    let service = registry(conn)?;

    match args.action {
        ConsultorAction::Add(fields) => {
            formatter.record(&service.create_consultor(&fields.into())?)
        }
        ConsultorAction::List => formatter.records(&service.list_consultores()?),
        ConsultorAction::Show { id } => formatter.record(&service.get_consultor(id)?),
        ConsultorAction::Update { id, fields } => {
            formatter.record(&service.update_consultor(id, &fields.into())?)
        }
        ConsultorAction::Delete { id } => {
            service.delete_consultor(id)?;
            formatter.success(&format!("Deleted consultor {id}"))
        }
    }
}

/// Execute the ficha command.
pub fn execute_ficha(
    args: FichaArgs,
    conn: &Connection,
    formatter: &Formatter,
) -> Result<String> {
    let service = registry(conn)?;

    match args.action {
        FichaAction::Add(fields) => formatter.record(&service.create_ficha(&fields.into())?),
        FichaAction::List => formatter.records(&service.list_fichas()?),
        FichaAction::Show { id } => formatter.ficha_detail(&service.get_ficha_detail(id)?),
        FichaAction::Update { id, fields } => {
            formatter.record(&service.update_ficha(id, &fields.into())?)
        }
        FichaAction::Delete { id } => {
            service.delete_ficha(id)?;
            formatter.success(&format!("Deleted ficha {id}"))
        }
    }
}
