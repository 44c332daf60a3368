//! Extracted text cleanup
//!
//! Strips pagination and header lines from stored report text so it can be
//! reviewed or re-parsed without them. Blank lines are kept so paragraphs
//! don't run together.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::report::split_lines;

static REMOVABLE_LINES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?iu)^Página\s+\d+\s+de\s+\d+$",
        r"(?iu)^Custo\s+Dev\.?$",
        r"(?iu)^\s*[^\d-][^-]*-\s*Venda\s*X\s*Cliente.*$",
        r"(?iu)^\s*Per[íi]odo\s*:\s*de\s*\d{1,2}/\d{1,2}/\d{4}\s*[aà]\s*\d{1,2}/\d{1,2}/\d{4}\s*$",
        r"(?iu)\bTOTAIS\s*:",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid cleanup regex"))
    .collect()
});

static DEV_ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?iu)\bDev\.\s*").expect("valid abbreviation regex"));

/// Tokens of the printed header; a line with enough of them is a header.
const HEADER_TOKENS: &[&str] = &[
    "cliente",
    "primeira venda",
    "última venda",
    "vl vnd médio",
    "qtd. total venda",
    "custo venda total",
    "devolução total",
    "total custo",
    "lucro (r$)",
    "lucro (%)",
    "custo dev.",
];

const HEADER_MIN_TOKENS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedText {
    pub text: String,
    pub removed: usize,
    pub changed: bool,
}

/// Remove page footers, banners and header lines from report text.
///
/// # Examples
/// ```
/// use vendas::cleanup::clean_report_text;
///
/// let cleaned = clean_report_text("Acme 01/01/2024\nPágina 1 de 3\n");
/// assert_eq!(cleaned.text, "Acme 01/01/2024\n");
/// assert!(cleaned.changed);
/// ```
pub fn clean_report_text(text: &str) -> CleanedText {
    let mut removed = 0;
    let kept: Vec<&str> = split_lines(text)
        .filter(|line| {
            let keep = !is_removable(line);
            if !keep {
                removed += 1;
            }
            keep
        })
        .collect();

    let cleaned = kept.join("\n");
    let changed = cleaned != text;

    CleanedText {
        text: cleaned,
        removed,
        changed,
    }
}

fn is_removable(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }

    if REMOVABLE_LINES.iter().any(|p| p.is_match(line)) {
        return true;
    }

    // The `Dev.` abbreviation is not counted
    let stripped = DEV_ABBREVIATION.replace_all(line, "").to_lowercase();
    let hits = HEADER_TOKENS
        .iter()
        .filter(|tk| stripped.contains(*tk))
        .count();
    hits >= HEADER_MIN_TOKENS
}
