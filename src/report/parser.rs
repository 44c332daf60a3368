//! Record parser
//!
//! Turns one complete report line into a [`SalesRecord`]:
//!
//! 1. The customer name is everything before the first date or number.
//! 2. The first two dates are the first and last sale.
//! 3. The first `N %` token is the profit percentage.
//! 4. Remaining numbers are converted; negative ones are returns.
//! 5. Whatever is still unset is filled from [`POSITIONAL_SLOTS`].

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::trace;

use super::header::{normalize_whitespace, ColumnField, ColumnMapping};
use super::record::{is_valid_customer_name, SalesRecord};
use super::tokenizer::{tokenize, LineTokens};
use crate::converters::{convert_date, convert_decimal};

/// Index into the converted amount list and the column it fills.
///
/// The order follows the printed report as it comes out of text extraction,
/// not the header order: `CustoDev` at index 2 is how the rows actually read.
/// Index 1 has no column.
pub const POSITIONAL_SLOTS: [(usize, ColumnField); 10] = [
    (0, ColumnField::LucroReais),
    (2, ColumnField::CustoDev),
    (3, ColumnField::Total),
    (4, ColumnField::TotalCusto),
    (5, ColumnField::VlVndMedio),
    (6, ColumnField::Qtd),
    (7, ColumnField::TotalVenda),
    (8, ColumnField::CustoVenda),
    (9, ColumnField::TotalDevolucao),
    (10, ColumnField::LucroPercentual),
];

static WIDE_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}|\t+").expect("valid column gap regex"));

/// Parse a reassembled report line.
///
/// Returns `None` when no valid customer name can be read from the line.
/// Missing figures never reject a row.
pub fn parse_line(line: &str, mapping: Option<&ColumnMapping>) -> Option<SalesRecord> {
    let line = line.trim();
    let tokens = tokenize(line);

    let Some(name_end) = tokens.first_value_offset() else {
        // No figures on the line: take the first cell that reads as a name
        return fallback_customer(line).map(SalesRecord::new);
    };

    let customer = normalize_whitespace(&line[..name_end]);
    if !is_valid_customer_name(&customer) {
        trace!("Rejected customer span '{}'", customer);
        return None;
    }

    let mut record = SalesRecord::new(customer);

    let mut dates = tokens.dates.iter();
    record.first_sale_date = dates.next().and_then(|t| convert_date(t.text));
    record.last_sale_date = dates.next().and_then(|t| convert_date(t.text));

    if let Some(percent) = &tokens.percent {
        record.profit_percent = convert_decimal(&percent.text.replace('%', ""));
    }

    let values = convert_amounts(&tokens);
    apply_returns(&values, &mut record);
    apply_positional_fallback(&values, &mut record, mapping);

    Some(record)
}

/// Convert the standalone amounts of a line, dropping the unparseable ones.
pub fn convert_amounts(tokens: &LineTokens<'_>) -> Vec<Decimal> {
    tokens
        .amounts()
        .filter_map(|t| convert_decimal(t.text))
        .collect()
}

/// Negative amounts are returns: the first is the returned total, the
/// second the cost of returns. Both are stored as absolute values.
pub fn apply_returns(values: &[Decimal], record: &mut SalesRecord) {
    let mut negatives = values.iter().filter(|v| v.is_sign_negative() && !v.is_zero());

    if let Some(v) = negatives.next() {
        record.return_total = Some(v.abs());
    }
    if let Some(v) = negatives.next() {
        record.return_cost_total = Some(v.abs());
    }
}

/// Fill unset fields from their fixed index in the full amount list.
///
/// Never overwrites a field that already has a value.
pub fn apply_positional_fallback(
    values: &[Decimal],
    record: &mut SalesRecord,
    mapping: Option<&ColumnMapping>,
) {
    for (index, field) in POSITIONAL_SLOTS {
        let Some(value) = values.get(index).copied() else {
            continue;
        };

        // Return columns never hold a sign, whichever rule fills them
        let value = if matches!(field, ColumnField::TotalDevolucao | ColumnField::CustoDev) {
            value.abs()
        } else {
            value
        };

        let filled = if field == ColumnField::Qtd {
            fill_quantity(&mut record.quantity, value)
        } else {
            match record.decimal_slot_mut(field) {
                Some(slot) if slot.is_none() => {
                    *slot = Some(value);
                    true
                }
                _ => false,
            }
        };

        if filled && mapping.is_some_and(|m| field.label().is_some() && !m.contains(field)) {
            trace!("Filled {} positionally although the header had no label for it", field);
        }
    }
}

fn fill_quantity(slot: &mut Option<i64>, value: Decimal) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = value.trunc().to_i64();
    slot.is_some()
}

/// First whitespace-separated cell that passes the customer-name check.
fn fallback_customer(line: &str) -> Option<String> {
    let mut parts: Vec<&str> = WIDE_GAP.split(line).collect();
    if parts.len() < 3 {
        parts = line.split_whitespace().collect();
    }

    parts
        .into_iter()
        .map(str::trim)
        .find(|p| is_valid_customer_name(p))
        .map(str::to_string)
}
