//! Output formatting module for CLI display
//!
//! Keeps presentation of extracted records (tables, JSON, line traces)
//! apart from the extraction itself.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use vendas::report::{Extraction, ExtractionStats, LineEvent, LineKind, SalesRecord};
use vendas::utils::{format_date_br, format_decimal_br, format_percent, or_missing};

/// JSON shape of one record, keyed by the sales table columns.
#[derive(Serialize)]
struct JsonRecord {
    cliente: String,
    primeira_venda: Option<String>,
    ultima_venda: Option<String>,
    vl_vnd_medio: Option<String>,
    qtd: Option<i64>,
    total_venda: Option<String>,
    custo_venda: Option<String>,
    total_devolucao: Option<String>,
    custo_dev: Option<String>,
    total: Option<String>,
    total_custo: Option<String>,
    lucro_reais: Option<String>,
    lucro_percentual: Option<String>,
}

impl From<&SalesRecord> for JsonRecord {
    fn from(r: &SalesRecord) -> Self {
        let dec = |v: Option<Decimal>| v.map(|d| d.to_string());
        Self {
            cliente: r.customer.clone(),
            primeira_venda: r.first_sale_date.map(|d| d.to_string()),
            ultima_venda: r.last_sale_date.map(|d| d.to_string()),
            vl_vnd_medio: dec(r.avg_sale_value),
            qtd: r.quantity,
            total_venda: dec(r.total_sale_value),
            custo_venda: dec(r.sale_cost),
            total_devolucao: dec(r.return_total),
            custo_dev: dec(r.return_cost_total),
            total: dec(r.grand_total),
            total_custo: dec(r.total_cost),
            lucro_reais: dec(r.profit_amount),
            lucro_percentual: dec(r.profit_percent),
        }
    }
}

/// Format one JSON entry per document, in the order given
pub fn format_documents_json(documents: &[(&Path, Extraction)]) -> String {
    #[derive(Serialize)]
    struct JsonDocument<'a> {
        file: String,
        records: Vec<JsonRecord>,
        stats: &'a ExtractionStats,
        header_line: Option<usize>,
    }

    let json: Vec<JsonDocument> = documents
        .iter()
        .map(|(file, extraction)| JsonDocument {
            file: file.display().to_string(),
            records: extraction.records.iter().map(JsonRecord::from).collect(),
            stats: &extraction.stats,
            header_line: extraction.header.as_ref().map(|h| h.line_index),
        })
        .collect();

    serde_json::to_string_pretty(&json)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format records for terminal table output, showing at most `limit` rows
pub fn format_records_table(records: &[SalesRecord], limit: Option<usize>) -> String {
    #[derive(Tabled)]
    struct RecordRow {
        #[tabled(rename = "Cliente")]
        customer: String,
        #[tabled(rename = "Primeira Venda")]
        first_sale: String,
        #[tabled(rename = "Última Venda")]
        last_sale: String,
        #[tabled(rename = "Vl Vnd Médio")]
        avg_sale: String,
        #[tabled(rename = "Qtd")]
        quantity: String,
        #[tabled(rename = "Total Venda")]
        total_sale: String,
        #[tabled(rename = "Custo Venda")]
        sale_cost: String,
        #[tabled(rename = "Devolução")]
        returns: String,
        #[tabled(rename = "Custo Dev.")]
        return_cost: String,
        #[tabled(rename = "Total")]
        total: String,
        #[tabled(rename = "Total Custo")]
        total_cost: String,
        #[tabled(rename = "Lucro (R$)")]
        profit: String,
        #[tabled(rename = "Lucro (%)")]
        profit_pct: String,
    }

    let shown = limit.unwrap_or(records.len()).min(records.len());
    let rows: Vec<RecordRow> = records[..shown]
        .iter()
        .map(|r| RecordRow {
            customer: r.customer.clone(),
            first_sale: or_missing(r.first_sale_date, format_date_br),
            last_sale: or_missing(r.last_sale_date, format_date_br),
            avg_sale: or_missing(r.avg_sale_value, format_decimal_br),
            quantity: or_missing(r.quantity, |q| q.to_string()),
            total_sale: or_missing(r.total_sale_value, format_decimal_br),
            sale_cost: or_missing(r.sale_cost, format_decimal_br),
            returns: or_missing(r.return_total, format_decimal_br),
            return_cost: or_missing(r.return_cost_total, format_decimal_br),
            total: or_missing(r.grand_total, format_decimal_br),
            total_cost: or_missing(r.total_cost, format_decimal_br),
            profit: or_missing(r.profit_amount, |p| colorize_signed(p, format_decimal_br(p))),
            profit_pct: or_missing(r.profit_percent, |p| colorize_signed(p, format_percent(p))),
        })
        .collect();

    let mut output = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string();

    if records.len() > shown {
        output.push_str(&format!(
            "\n... and {} more records",
            records.len() - shown
        ));
    }

    output
}

/// One-line summary of an extraction
pub fn format_summary(extraction: &Extraction) -> String {
    let stats = &extraction.stats;
    let mut summary = format!(
        "{} Found {} records in {} lines",
        "✓".green().bold(),
        extraction.records.len(),
        stats.total_lines
    );
    if stats.rows_rejected > 0 {
        summary.push_str(&format!(
            " ({} rows rejected)",
            stats.rows_rejected.to_string().yellow()
        ));
    }
    summary
}

/// Format the per-line trace produced by `inspect`
pub fn format_trace(extraction: &Extraction, show_all: bool) -> String {
    let mut output = String::new();

    match &extraction.header {
        Some(header) => {
            output.push_str(&format!(
                "{} Header on line {} ({} of 11 labels)\n",
                "ℹ".blue().bold(),
                header.line_index + 1,
                header.mapping.len()
            ));
            for (field, label) in header.mapping.iter() {
                output.push_str(&format!("    {:<18} {}\n", field.key(), label));
            }
            let missing = header.mapping.missing_labels();
            if !missing.is_empty() {
                let keys: Vec<&str> = missing.iter().map(|f| f.key()).collect();
                output.push_str(&format!("    missing: {}\n", keys.join(", ")));
            }
        }
        None => output.push_str(&format!("{} No header detected\n", "ℹ".blue().bold())),
    }
    output.push('\n');

    for event in extraction
        .trace
        .iter()
        .filter(|e| show_all || e.kind != LineKind::Blank)
    {
        output.push_str(&format_event(event));
        output.push('\n');
    }

    output
}

fn format_event(event: &LineEvent) -> String {
    let label = match event.kind {
        LineKind::Blank => "blank".dimmed(),
        LineKind::Noise => "noise".dimmed(),
        LineKind::Header => "header".blue(),
        LineKind::HeaderResidue => "residue".dimmed(),
        LineKind::Buffered => "buffered".cyan(),
        LineKind::Record => "record".green(),
        LineKind::Rejected => "rejected".red(),
        LineKind::Fragment => "fragment".yellow(),
    };
    format!("{:>5}  {:<10} {}", event.index + 1, label, event.text)
}

fn colorize_signed(value: Decimal, text: String) -> String {
    if value >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}
