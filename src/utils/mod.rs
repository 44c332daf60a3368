//! Display formatting in Brazilian conventions
//!
//! The inverse of [`crate::converters`]: canonical values back to the way
//! the report prints them, for tables and previews.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Placeholder for a value the row did not carry.
pub const MISSING: &str = "-";

/// Format a decimal with `.` thousands and `,` decimal separators, two places.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use vendas::utils::format_decimal_br;
///
/// assert_eq!(format_decimal_br(dec!(1234.56)), "1.234,56");
/// assert_eq!(format_decimal_br(dec!(-150)), "-150,00");
/// ```
pub fn format_decimal_br(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };

    let formatted = format!("{:.2}", value.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    format!("{}{},{}", sign, group_thousands(integer_part), decimal_part)
}

/// Format a percentage: "15,50%"
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_decimal_br(value))
}

/// Format a date as the report prints it: "05/03/2024"
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Apply a formatter to an optional value, with [`MISSING`] for `None`.
pub fn or_missing<T>(value: Option<T>, format: impl FnOnce(T) -> String) -> String {
    value.map(format).unwrap_or_else(|| MISSING.to_string())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}
