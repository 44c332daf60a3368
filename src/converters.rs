//! Brazilian locale converters
//!
//! Pure functions turning report strings into canonical values:
//! - Dates: `D/M/YYYY` (day first, zero padding optional) or ISO `YYYY-MM-DD`
//! - Decimals: `1.234,56` (dot thousands, comma decimal)
//! - Integers: `1.234` (every dot is a thousands separator)

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static BR_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid date regex"));

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid iso date regex"));

/// Plain numeric literal: optional sign, digits with an optional fraction.
static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").expect("valid numeric regex")
});

/// Convert a report date into a calendar date.
///
/// Accepts `D/M/YYYY` with one or two digit day and month, and ISO
/// `YYYY-MM-DD`. Impossible dates (`31/02/2024`, `13/13/2024`) yield `None`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use vendas::converters::convert_date;
///
/// assert_eq!(convert_date("5/3/2024"), NaiveDate::from_ymd_opt(2024, 3, 5));
/// assert_eq!(convert_date("2024-03-05"), NaiveDate::from_ymd_opt(2024, 3, 5));
/// assert_eq!(convert_date("13/13/2024"), None);
/// ```
pub fn convert_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE.captures(s) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let caps = BR_DATE.captures(s)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Convert a Brazilian-formatted amount into a decimal.
///
/// A leading `R$` marker and all spaces are stripped. When a comma is
/// present every `.` is a thousands separator and the comma is the decimal
/// point. Without a comma the `.` is taken as the decimal point as-is, so
/// `3.500` is three and a half, not three thousand five hundred.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use vendas::converters::convert_decimal;
///
/// assert_eq!(convert_decimal("1.234,56"), Some(dec!(1234.56)));
/// assert_eq!(convert_decimal("1234.56"), Some(dec!(1234.56)));
/// assert_eq!(convert_decimal("abc"), None);
/// ```
pub fn convert_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed);
    let mut value: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    if value.contains(',') {
        value = value.replace('.', "").replace(',', ".");
    }

    if !NUMERIC_LITERAL.is_match(&value) {
        return None;
    }

    parse_numeric_literal(&value)
}

/// Convert a quantity string into an integer, dropping every `.` and space.
///
/// # Examples
/// ```
/// use vendas::converters::convert_integer;
///
/// assert_eq!(convert_integer("1.234"), Some(1234));
/// assert_eq!(convert_integer("12,5"), None);
/// ```
pub fn convert_integer(s: &str) -> Option<i64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    unsigned.parse::<i64>().ok()
}

/// Parse a literal already validated by `NUMERIC_LITERAL`.
///
/// `Decimal::from_str` rejects the `5.` and `.5` shapes, so those are
/// completed with a zero first.
fn parse_numeric_literal(literal: &str) -> Option<Decimal> {
    let (sign, digits) = match literal.as_bytes().first() {
        Some(b'-') => ("-", &literal[1..]),
        Some(b'+') => ("", &literal[1..]),
        _ => ("", literal),
    };

    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let normalized = if digits.starts_with('.') {
        format!("{}0{}", sign, digits)
    } else {
        format!("{}{}", sign, digits)
    };

    Decimal::from_str(&normalized).ok()
}
