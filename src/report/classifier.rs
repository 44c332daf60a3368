//! Noise line classification
//!
//! Lines that carry no customer data (page footers, report title, period
//! banner, totals, separators) are dropped before any other stage looks at
//! them.

use once_cell::sync::Lazy;
use regex::Regex;

use super::header::count_header_labels;
use super::tokenizer::has_date;

static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "Página 3 de 10" / "Page 3 of 10"
        r"(?iu)^(?:p[áa]gina\s+\d+\s+de|page\s+\d+\s+of)\s+\d+$",
        // dashes-only separator
        r"^-+$",
        // "SENNACAR - Venda X Cliente (Analítico)"
        r"(?iu)^(?:[^\d-][^-]*-\s*)?Venda\s*X\s*Cliente",
        // "Período: de 01/01/2024 à 31/12/2024"
        r"(?iu)^Per[íi]odo\s*:",
        r"(?iu)\bTOTAIS\s*:",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid noise regex"))
    .collect()
});

/// Header continuation line left behind when the extractor wraps the header.
static CUSTO_DEV_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?iu)^Custo\s+Dev\.?$").expect("valid fragment regex"));

/// Whether a line is pagination or banner noise.
pub fn is_noise(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return true;
    }
    NOISE_PATTERNS.iter().any(|p| p.is_match(line))
}

/// Whether a line is left over from a repeated or wrapped header.
///
/// Only label-only lines qualify: anything with a date token is data.
pub fn is_header_residue(line: &str, min_labels: usize) -> bool {
    let line = line.trim();
    if line.is_empty() || has_date(line) {
        return false;
    }
    CUSTO_DEV_FRAGMENT.is_match(line) || count_header_labels(line) >= min_labels
}
