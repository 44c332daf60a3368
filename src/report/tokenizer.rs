//! Line tokenizer
//!
//! Breaks one reassembled report line into typed tokens with byte offsets.
//! The report has no delimiters, so everything hinges on three shapes:
//! dates (`D/M/YYYY`), signed numbers (`-?[\d.,]+`) and the profit
//! percentage (`[\d.,]+ %`). Later stages work on offsets so a number that
//! lives inside a date or the percentage can be told apart from a real
//! amount.

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").expect("valid date token regex"));

/// Unsigned number, optionally followed by `%`. Used for completeness counts.
pub(crate) static NUMBER_LIKE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d.,]+(?:\s*%)?").expect("valid number-like regex"));

pub(crate) static SIGNED_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?[\d.,]+").expect("valid signed number regex"));

pub(crate) static PERCENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d.,]+\s*%").expect("valid percent regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Date,
    Number,
    Percent,
}

/// A token found in a line; `start..end` is a byte range into that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// All tokens of one line, grouped by kind, each group in line order.
#[derive(Debug, Clone, Default)]
pub struct LineTokens<'a> {
    pub dates: Vec<Token<'a>>,
    /// Every signed number match, including the ones inside dates and the percentage
    pub numbers: Vec<Token<'a>>,
    /// First percentage match only; the report carries a single profit percentage
    pub percent: Option<Token<'a>>,
}

impl<'a> LineTokens<'a> {
    /// Offset where the customer name ends: the first date or number token.
    pub fn first_value_offset(&self) -> Option<usize> {
        let first_date = self.dates.first().map(|t| t.start);
        let first_number = self.numbers.first().map(|t| t.start);
        match (first_date, first_number) {
            (Some(d), Some(n)) => Some(d.min(n)),
            (d, n) => d.or(n),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.numbers.is_empty() && self.percent.is_none()
    }

    /// Numbers that are neither part of a date nor the percentage, in line order.
    pub fn amounts(&self) -> impl Iterator<Item = &Token<'a>> {
        self.numbers.iter().filter(move |num| {
            let in_date = self.dates.iter().any(|d| d.contains(num.start));
            let in_percent = self.percent.as_ref().is_some_and(|p| p.contains(num.start));
            !in_date && !in_percent
        })
    }
}

pub fn tokenize(line: &str) -> LineTokens<'_> {
    let dates = scan(&DATE_PATTERN, line, TokenKind::Date);
    let numbers = scan(&SIGNED_NUMBER_PATTERN, line, TokenKind::Number);
    let percent = PERCENT_PATTERN.find(line).map(|m| Token {
        kind: TokenKind::Percent,
        text: m.as_str(),
        start: m.start(),
        end: m.end(),
    });

    LineTokens {
        dates,
        numbers,
        percent,
    }
}

/// Count date-like and number-like substrings, as used by the reassembler.
pub fn count_dates_and_numbers(line: &str) -> (usize, usize) {
    let dates = DATE_PATTERN.find_iter(line).count();
    let numbers = NUMBER_LIKE_PATTERN.find_iter(line).count();
    (dates, numbers)
}

pub fn has_date(line: &str) -> bool {
    DATE_PATTERN.is_match(line)
}

fn scan<'a>(pattern: &Regex, line: &'a str, kind: TokenKind) -> Vec<Token<'a>> {
    pattern
        .find_iter(line)
        .map(|m| Token {
            kind,
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_dates_and_percent() {
        let line = "Acme 01/01/2024 15/06/2024 120,50 15,5%";
        let tokens = tokenize(line);

        let dates: Vec<&str> = tokens.dates.iter().map(|t| t.text).collect();
        assert_eq!(dates, vec!["01/01/2024", "15/06/2024"]);

        let percent = tokens.percent.expect("percent token");
        assert_eq!(percent.text, "15,5%");
        assert_eq!(&line[percent.start..percent.end], "15,5%");
    }

    #[test]
    fn test_amounts_skip_date_and_percent_parts() {
        let tokens = tokenize("Acme 01/01/2024 120,50 -3,00 15,5 %");
        let amounts: Vec<&str> = tokens.amounts().map(|t| t.text).collect();
        assert_eq!(amounts, vec!["120,50", "-3,00"]);
    }

    #[test]
    fn test_first_value_offset() {
        assert_eq!(tokenize("Acme Corp 01/01/2024").first_value_offset(), Some(10));
        assert_eq!(tokenize("Acme 7 01/01/2024").first_value_offset(), Some(5));
        assert_eq!(tokenize("Acme -7").first_value_offset(), Some(5));
        assert_eq!(tokenize("Acme Corp").first_value_offset(), None);
    }

    #[test]
    fn test_count_dates_and_numbers() {
        // The date contributes one date and its digit groups to the number count
        let (dates, numbers) = count_dates_and_numbers("X 01/02/2024 10,00 5%");
        assert_eq!(dates, 1);
        assert_eq!(numbers, 5);

        assert_eq!(count_dates_and_numbers("Beta Ltd"), (0, 0));
    }

    #[test]
    fn test_stray_dot_is_a_number_token() {
        // An abbreviation dot matches the number shape; later conversion drops it
        let tokens = tokenize("Acme Ltda. 01/01/2024");
        assert_eq!(tokens.numbers[0].text, ".");
        assert_eq!(tokens.first_value_offset(), Some(9));
    }
}
