//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use nucleotec_core::{
    CatalogItem, Consultor, Empresa, Ficha, FichaDetail, HistoricoEntry, ReconcileReport,
    SelectionEntry, TrilhaView,
};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// A record that renders as one table row.
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a list of records.
    pub fn records<T: Serialize + Tabular>(&self, records: &[T]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Table => {
                if records.is_empty() {
                    return Ok("No records found.".to_string());
                }
                Ok(table(T::headers(), records.iter().map(Tabular::row)))
            }
        }
    }

    /// Format a single record.
    pub fn record<T: Serialize + Tabular>(&self, record: &T) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Table => Ok(table(T::headers(), [record.row()])),
        }
    }

    /// Format a ficha with its association names.
    pub fn ficha_detail(&self, detail: &FichaDetail) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(detail)?);
        }

        let mut out = table(Ficha::headers(), [detail.ficha.row()]);
        for (label, items) in [
            ("Público alvo", &detail.publico_alvo),
            ("Setores indicados", &detail.setores_indicados),
            ("Macro segmentos", &detail.macro_segmentos),
        ] {
            out.push_str(&format!("\n{label}: {}", join_names(items)));
        }
        Ok(out)
    }

    /// Format the outcome of one reconciliation.
    pub fn reconcile_report(&self, report: &ReconcileReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            let failures: Vec<serde_json::Value> = report
                .failures
                .iter()
                .map(|failure| {
                    serde_json::json!({
                        "op": failure.op.to_string(),
                        "related_id": failure.related_id,
                        "constraint_violation": failure.error.is_constraint_violation(),
                        "error": failure.error.to_string(),
                    })
                })
                .collect();
            let value = serde_json::json!({
                "kind": report.kind,
                "parent_id": report.parent_id,
                "removed": report.removed,
                "added": report.added,
                "failures": failures,
                "rolled_back": report.rolled_back,
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut lines = vec![format!(
            "{} of {}: removed [{}], added [{}]",
            report.kind,
            report.parent_id,
            join_ids(&report.removed),
            join_ids(&report.added)
        )];
        for failure in &report.failures {
            lines.push(format!(
                "failed {} {}: {}",
                failure.op, failure.related_id, failure.error
            ));
        }
        if report.rolled_back {
            lines.push("rolled back: no change was kept".to_string());
        }
        Ok(lines.join("\n"))
    }

    /// Format a confirmation message.
    pub fn success(&self, message: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(
                &serde_json::json!({ "message": message }),
            )?),
            OutputFormat::Table => Ok(message.to_string()),
        }
    }
}

fn table(headers: Vec<&'static str>, rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn join_names(items: &[CatalogItem]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(|item| item.nome.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
}

impl Tabular for CatalogItem {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Nome"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.nome.clone()]
    }
}

impl Tabular for Empresa {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Nome", "CNPJ", "Contato", "Cidade"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.nome.clone(),
            self.cnpj.clone(),
            opt(&self.contato),
            opt(&self.cidade),
        ]
    }
}

impl Tabular for Consultor {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Nome", "Email"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.nome.clone(), opt(&self.email)]
    }
}

impl Tabular for Ficha {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Título",
            "Horas",
            "Categoria",
            "Tipo",
            "Instrumento",
            "Modalidade",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.titulo.clone(),
            opt(&self.duracao_horas),
            opt(&self.categoria_id),
            opt(&self.tipo_servico_id),
            opt(&self.instrumento_id),
            opt(&self.modalidade_id),
        ]
    }
}

impl Tabular for TrilhaView {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Empresa", "Ficha", "Consultor", "Status", "Execução"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.empresa_nome.clone(),
            self.ficha_titulo.clone(),
            opt(&self.consultor_nome),
            self.status.to_string(),
            opt(&self.data_execucao),
        ]
    }
}

impl Tabular for HistoricoEntry {
    fn headers() -> Vec<&'static str> {
        vec!["Trilha", "Ficha", "Status", "Consultor", "Execução"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.trilha_id.to_string(),
            self.ficha_titulo.clone(),
            self.status.to_string(),
            opt(&self.consultor_nome),
            opt(&self.data_execucao),
        ]
    }
}

impl Tabular for SelectionEntry {
    fn headers() -> Vec<&'static str> {
        vec!["", "ID", "Nome"]
    }

    fn row(&self) -> Vec<String> {
        let marker = if self.selected { "[x]" } else { "[ ]" };
        vec![marker.to_string(), self.id.to_string(), self.nome.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nucleotec_core::TrilhaStatus;

    fn empresa() -> Empresa {
        Empresa {
            id: 1,
            nome: "Padaria Central".to_string(),
            cnpj: "11222333000144".to_string(),
            contato: None,
            cidade: Some("Recife".to_string()),
        }
    }

    #[test]
    fn table_format_has_headers_and_placeholders() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.records(&[empresa()]).unwrap();
        assert!(output.contains("CNPJ"));
        assert!(output.contains("Padaria Central"));
        assert!(output.contains("Recife"));
        assert!(output.contains(" - "));
    }

    #[test]
    fn json_format_serializes_records() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.records(&[empresa()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["cnpj"], "11222333000144");
        assert!(parsed[0]["contato"].is_null());
    }

    #[test]
    fn empty_table_prints_notice() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.records::<Consultor>(&[]).unwrap();
        assert_eq!(output, "No records found.");
    }

    #[test]
    fn selection_rows_mark_selected_entries() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter
            .records(&[
                SelectionEntry {
                    id: 1,
                    nome: "MEI".to_string(),
                    selected: true,
                },
                SelectionEntry {
                    id: 2,
                    nome: "EPP".to_string(),
                    selected: false,
                },
            ])
            .unwrap();
        assert!(output.contains("[x]"));
        assert!(output.contains("[ ]"));
    }

    #[test]
    fn trilha_status_uses_storage_names() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter
            .record(&HistoricoEntry {
                trilha_id: 9,
                ficha_titulo: "Vendas".to_string(),
                status: TrilhaStatus::EmAndamento,
                consultor_nome: None,
                data_execucao: Some(1_700_000_000_000),
            })
            .unwrap();
        assert!(output.contains("\"em_andamento\""));
    }
}
