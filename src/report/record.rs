//! Sales record model
//!
//! One customer's aggregated figures as read from a report row. Every
//! field except the customer is optional: `None` means the value was not
//! found on the row, not zero.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use super::header::ColumnField;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesRecord {
    pub customer: String,
    pub first_sale_date: Option<NaiveDate>,
    pub last_sale_date: Option<NaiveDate>,
    pub avg_sale_value: Option<Decimal>,
    pub quantity: Option<i64>,
    pub total_sale_value: Option<Decimal>,
    pub sale_cost: Option<Decimal>,
    /// Returns (devolução), always stored as an absolute value
    pub return_total: Option<Decimal>,
    /// Cost of returns, always stored as an absolute value
    pub return_cost_total: Option<Decimal>,
    pub grand_total: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub profit_amount: Option<Decimal>,
    pub profit_percent: Option<Decimal>,
}

impl SalesRecord {
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            first_sale_date: None,
            last_sale_date: None,
            avg_sale_value: None,
            quantity: None,
            total_sale_value: None,
            sale_cost: None,
            return_total: None,
            return_cost_total: None,
            grand_total: None,
            total_cost: None,
            profit_amount: None,
            profit_percent: None,
        }
    }

    /// Final gate before a record leaves the pipeline.
    pub fn is_valid(&self) -> bool {
        is_valid_customer_name(&self.customer)
    }

    /// True when the row carried a name but no figures at all.
    pub fn has_no_figures(&self) -> bool {
        self.first_sale_date.is_none()
            && self.last_sale_date.is_none()
            && self.quantity.is_none()
            && self.decimal_fields().iter().all(|(_, v)| v.is_none())
    }

    /// Decimal fields keyed by their storage column.
    pub fn decimal_fields(&self) -> [(ColumnField, Option<Decimal>); 9] {
        [
            (ColumnField::VlVndMedio, self.avg_sale_value),
            (ColumnField::TotalVenda, self.total_sale_value),
            (ColumnField::CustoVenda, self.sale_cost),
            (ColumnField::TotalDevolucao, self.return_total),
            (ColumnField::CustoDev, self.return_cost_total),
            (ColumnField::Total, self.grand_total),
            (ColumnField::TotalCusto, self.total_cost),
            (ColumnField::LucroReais, self.profit_amount),
            (ColumnField::LucroPercentual, self.profit_percent),
        ]
    }

    pub(crate) fn decimal_slot_mut(&mut self, field: ColumnField) -> Option<&mut Option<Decimal>> {
        match field {
            ColumnField::VlVndMedio => Some(&mut self.avg_sale_value),
            ColumnField::TotalVenda => Some(&mut self.total_sale_value),
            ColumnField::CustoVenda => Some(&mut self.sale_cost),
            ColumnField::TotalDevolucao => Some(&mut self.return_total),
            ColumnField::CustoDev => Some(&mut self.return_cost_total),
            ColumnField::Total => Some(&mut self.grand_total),
            ColumnField::TotalCusto => Some(&mut self.total_cost),
            ColumnField::LucroReais => Some(&mut self.profit_amount),
            ColumnField::LucroPercentual => Some(&mut self.profit_percent),
            ColumnField::Cliente
            | ColumnField::PrimeiraVenda
            | ColumnField::UltimaVenda
            | ColumnField::Qtd => None,
        }
    }
}

static DATE_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("valid date regex"));

static CURRENCY_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^R\$").expect("valid currency regex"));

static NUMBER_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?[\d.,]+\s*%?$").expect("valid number-only regex")
});

static WEEKDAY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?iu)^(?:segunda-feira|terça-feira|terca-feira|quarta-feira|quinta-feira|sexta-feira|sábado|sabado|domingo)\b",
    )
    .expect("valid weekday regex")
});

/// Prepositions and report boilerplate that never name a customer.
const STOPWORDS: &[&str] = &[
    "de", "à", "a", "até", "para", "em", "com", "por", "sem", "sobre", "total", "subtotal",
    "soma", "cliente", "nome", "data", "valor", "período", "periodo", "página", "pagina", "page",
    "relatório", "relatorio", "totais",
];

/// Whether a string can stand as a customer name.
///
/// Rejects short strings, strings without letters, bare numbers, dates,
/// currency amounts, weekday banners and boilerplate words.
pub fn is_valid_customer_name(name: &str) -> bool {
    let name = name.trim();

    if name.chars().count() < 2 {
        return false;
    }
    if !name.chars().any(char::is_alphabetic) {
        return false;
    }
    if NUMBER_ONLY.is_match(name) || DATE_ONLY.is_match(name) || CURRENCY_TOKEN.is_match(name) {
        return false;
    }
    if WEEKDAY_PREFIX.is_match(name) {
        return false;
    }

    let lowered = name.to_lowercase();
    !STOPWORDS.contains(&lowered.as_str())
}
