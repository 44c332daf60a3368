//! Header detection and column mapping
//!
//! The report header names its columns in Portuguese. Detection is a
//! majority vote over the known labels; the resulting mapping is only a
//! hint; data rows are still mapped positionally by the parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Minimum number of labels a line must contain to be taken as the header.
pub const DEFAULT_HEADER_MIN_LABELS: usize = 8;

/// Semantic columns of the sales-per-customer report, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnField {
    Cliente,
    PrimeiraVenda,
    UltimaVenda,
    VlVndMedio,
    Qtd,
    TotalVenda,
    CustoVenda,
    TotalDevolucao,
    CustoDev,
    Total,
    TotalCusto,
    LucroReais,
    LucroPercentual,
}

impl ColumnField {
    pub const ALL: [ColumnField; 13] = [
        ColumnField::Cliente,
        ColumnField::PrimeiraVenda,
        ColumnField::UltimaVenda,
        ColumnField::VlVndMedio,
        ColumnField::Qtd,
        ColumnField::TotalVenda,
        ColumnField::CustoVenda,
        ColumnField::TotalDevolucao,
        ColumnField::CustoDev,
        ColumnField::Total,
        ColumnField::TotalCusto,
        ColumnField::LucroReais,
        ColumnField::LucroPercentual,
    ];

    /// Storage key used by the sales table
    pub fn key(&self) -> &'static str {
        match self {
            ColumnField::Cliente => "cliente",
            ColumnField::PrimeiraVenda => "primeira_venda",
            ColumnField::UltimaVenda => "ultima_venda",
            ColumnField::VlVndMedio => "vl_vnd_medio",
            ColumnField::Qtd => "qtd",
            ColumnField::TotalVenda => "total_venda",
            ColumnField::CustoVenda => "custo_venda",
            ColumnField::TotalDevolucao => "total_devolucao",
            ColumnField::CustoDev => "custo_dev",
            ColumnField::Total => "total",
            ColumnField::TotalCusto => "total_custo",
            ColumnField::LucroReais => "lucro_reais",
            ColumnField::LucroPercentual => "lucro_percentual",
        }
    }

    /// Label as printed in the report header. `TotalVenda` and `Total` have
    /// no label of their own: "Total" alone occurs inside every other label.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            ColumnField::Cliente => Some("Cliente"),
            ColumnField::PrimeiraVenda => Some("Primeira Venda"),
            ColumnField::UltimaVenda => Some("Última Venda"),
            ColumnField::VlVndMedio => Some("Vl Vnd Médio"),
            ColumnField::Qtd => Some("Qtd. Total Venda"),
            ColumnField::CustoVenda => Some("Custo Venda Total"),
            ColumnField::TotalDevolucao => Some("Devolução"),
            ColumnField::CustoDev => Some("Custo Dev. Total"),
            ColumnField::TotalCusto => Some("Total Custo"),
            ColumnField::LucroReais => Some("Lucro (R$)"),
            ColumnField::LucroPercentual => Some("Lucro (%)"),
            ColumnField::TotalVenda | ColumnField::Total => None,
        }
    }
}

impl fmt::Display for ColumnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Case-insensitive matchers for the eleven labelled columns.
static LABEL_PATTERNS: Lazy<Vec<(ColumnField, Regex)>> = Lazy::new(|| {
    [
        (ColumnField::Cliente, r"cliente"),
        (ColumnField::PrimeiraVenda, r"primeira venda"),
        (ColumnField::UltimaVenda, r"[úu]ltima venda"),
        (ColumnField::VlVndMedio, r"vl\.? ?vnd\.? ?m[ée]dio"),
        (ColumnField::Qtd, r"qtd\b\.?(?: ?total venda)?"),
        (ColumnField::CustoVenda, r"custo venda(?: total)?"),
        (ColumnField::TotalDevolucao, r"devolu[çc][ãa]o"),
        (ColumnField::CustoDev, r"custo dev\b\.?(?: ?total)?"),
        (ColumnField::TotalCusto, r"total custo"),
        (ColumnField::LucroReais, r"lucro ?\(r\$\)"),
        (ColumnField::LucroPercentual, r"lucro ?\(%\)"),
    ]
    .into_iter()
    .map(|(field, pattern)| {
        let regex = Regex::new(&format!("(?iu){}", pattern)).expect("valid header label regex");
        (field, regex)
    })
    .collect()
});

/// Which header labels were seen, and the text they were printed as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    labels: BTreeMap<ColumnField, String>,
}

impl ColumnMapping {
    pub fn get(&self, field: ColumnField) -> Option<&str> {
        self.labels.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: ColumnField) -> bool {
        self.labels.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnField, &str)> {
        self.labels.iter().map(|(f, l)| (*f, l.as_str()))
    }

    /// Labelled columns the header did not show.
    pub fn missing_labels(&self) -> Vec<ColumnField> {
        ColumnField::ALL
            .into_iter()
            .filter(|f| f.label().is_some() && !self.contains(*f))
            .collect()
    }

    /// True when all eleven labelled columns were found.
    pub fn is_complete(&self) -> bool {
        self.missing_labels().is_empty()
    }
}

/// Detect the report header using the default label threshold.
pub fn try_detect_header(line: &str) -> Option<ColumnMapping> {
    try_detect_header_with(line, DEFAULT_HEADER_MIN_LABELS)
}

pub fn try_detect_header_with(line: &str, min_labels: usize) -> Option<ColumnMapping> {
    let mapping = map_labels(line);
    if mapping.len() >= min_labels {
        Some(mapping)
    } else {
        None
    }
}

/// Number of distinct header labels present in a line.
pub fn count_header_labels(line: &str) -> usize {
    let normalized = normalize_whitespace(line);
    LABEL_PATTERNS
        .iter()
        .filter(|(_, regex)| regex.is_match(&normalized))
        .count()
}

fn map_labels(line: &str) -> ColumnMapping {
    let normalized = normalize_whitespace(line);
    let labels = LABEL_PATTERNS
        .iter()
        .filter_map(|(field, regex)| {
            regex
                .find(&normalized)
                .map(|m| (*field, m.as_str().to_string()))
        })
        .collect();
    ColumnMapping { labels }
}

pub(crate) fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
