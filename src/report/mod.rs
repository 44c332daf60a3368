//! Venda X Cliente report extraction
//!
//! Rebuilds per-customer sales records from the raw text of the report.
//! The text has no delimiters and carries pagination noise, so every line
//! goes through the same stages:
//!
//! ```text
//! line ─► classifier ─► header detector ─► reassembler ─► parser ─► SalesRecord
//!          (noise)       (first match)       (join rows)
//! ```
//!
//! Processing is a pure function of the input text. Nothing here fails:
//! a line that cannot be used is skipped and the next one is processed.

pub mod classifier;
pub mod header;
pub mod parser;
pub mod reassembler;
pub mod record;
pub mod tokenizer;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};

pub use classifier::{is_header_residue, is_noise};
pub use header::{try_detect_header, ColumnField, ColumnMapping};
pub use parser::parse_line;
pub use reassembler::{is_line_complete, Assembly, Leftover, Reassembler};
pub use record::{is_valid_customer_name, SalesRecord};

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\n|\r").expect("valid line break regex"));

/// Extract every sales record from a report's text, in document order.
///
/// # Examples
/// ```
/// use vendas::report::extract;
///
/// let text = "Página 1 de 1\n\
///             Beta Ltd\n\
///             02/02/2024 10/10/2024 100,00 5 500,00 400,00 0,00 0,00 600,00 450,00 100,00 20%\n";
/// let records = extract(text);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].customer, "Beta Ltd");
/// ```
pub fn extract(text: &str) -> Vec<SalesRecord> {
    ReportExtractor::default().run(text).records
}

/// Split on `\r\n`, `\n` or `\r`.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    LINE_BREAK.split(text)
}

/// How the pipeline handled one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Blank,
    Noise,
    Header,
    HeaderResidue,
    /// Held back waiting for the rest of its row
    Buffered,
    Record,
    /// Complete row without a usable customer name
    Rejected,
    /// Incomplete trailing text dropped at end of document
    Fragment,
}

/// One entry of the per-line trace.
///
/// For `Record` and `Rejected` the text is the joined row. End-of-document
/// events carry the index one past the last line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineEvent {
    pub index: usize,
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub total_lines: usize,
    pub blank_lines: usize,
    pub noise_lines: usize,
    pub residue_lines: usize,
    pub rows_parsed: usize,
    pub rows_rejected: usize,
    pub fragments_discarded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedHeader {
    pub line_index: usize,
    pub mapping: ColumnMapping,
}

/// Outcome of running the pipeline over one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub records: Vec<SalesRecord>,
    pub header: Option<DetectedHeader>,
    pub stats: ExtractionStats,
    /// Filled only when tracing is enabled on the extractor
    pub trace: Vec<LineEvent>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records, or [`ExtractError::NothingFound`] when there are none.
    pub fn require_records(self, source_name: &str) -> Result<Vec<SalesRecord>> {
        if self.records.is_empty() {
            return Err(ExtractError::NothingFound {
                source_name: source_name.to_string(),
            }
            .into());
        }
        Ok(self.records)
    }
}

/// Runs the extraction pipeline with a given configuration.
///
/// Holds no per-document state: each [`run`](Self::run) starts from an
/// empty buffer and no header, so one extractor can serve many documents
/// (and threads).
#[derive(Debug, Clone, Default)]
pub struct ReportExtractor {
    config: ExtractorConfig,
    trace: bool,
}

impl ReportExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            trace: false,
        }
    }

    /// Record a [`LineEvent`] for every line.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn run(&self, text: &str) -> Extraction {
        let text: String = text.nfc().collect();
        let mut state = DocumentState::new(&self.config, self.trace);

        for (index, raw) in split_lines(&text).enumerate() {
            state.feed(index, raw);
        }

        state.finish()
    }
}

/// Mutable state for one document.
struct DocumentState<'c> {
    config: &'c ExtractorConfig,
    reassembler: Reassembler,
    extraction: Extraction,
    trace: bool,
}

impl<'c> DocumentState<'c> {
    fn new(config: &'c ExtractorConfig, trace: bool) -> Self {
        Self {
            config,
            reassembler: Reassembler::new(config.min_dates, config.min_numbers),
            extraction: Extraction::default(),
            trace,
        }
    }

    fn feed(&mut self, index: usize, raw: &str) {
        self.extraction.stats.total_lines += 1;
        let line = raw.trim();

        if line.is_empty() {
            self.extraction.stats.blank_lines += 1;
            self.record_event(index, LineKind::Blank, line);
            return;
        }

        if is_noise(line) {
            debug!("Line {}: noise", index);
            self.extraction.stats.noise_lines += 1;
            self.record_event(index, LineKind::Noise, line);
            return;
        }

        if self.extraction.header.is_none() {
            if let Some(mapping) = header::try_detect_header_with(line, self.config.header_min_labels)
            {
                info!(
                    "Header found on line {} with {} of 11 labels",
                    index,
                    mapping.len()
                );
                self.extraction.header = Some(DetectedHeader {
                    line_index: index,
                    mapping,
                });
                self.record_event(index, LineKind::Header, line);
                return;
            }
        }

        if self.config.drop_header_residue
            && is_header_residue(line, self.config.residue_min_labels)
        {
            debug!("Line {}: header residue", index);
            self.extraction.stats.residue_lines += 1;
            self.record_event(index, LineKind::HeaderResidue, line);
            return;
        }

        match self.reassembler.push(line) {
            Assembly::Buffered => {
                debug!("Line {}: buffered", index);
                self.record_event(index, LineKind::Buffered, line);
            }
            Assembly::Complete(row) => self.parse_row(index, row),
        }
    }

    fn parse_row(&mut self, index: usize, row: String) {
        let mapping = self.extraction.header.as_ref().map(|h| &h.mapping);

        match parse_line(&row, mapping).filter(SalesRecord::is_valid) {
            Some(record) => {
                debug!("Line {}: record for '{}'", index, record.customer);
                self.extraction.stats.rows_parsed += 1;
                self.extraction.records.push(record);
                self.record_event(index, LineKind::Record, &row);
            }
            None => {
                debug!("Line {}: rejected row '{}'", index, row);
                self.extraction.stats.rows_rejected += 1;
                self.record_event(index, LineKind::Rejected, &row);
            }
        }
    }

    fn finish(mut self) -> Extraction {
        let end = self.extraction.stats.total_lines;
        let reassembler = std::mem::take(&mut self.reassembler);

        match reassembler.finish() {
            Leftover::Nothing => {}
            Leftover::Complete(row) => self.parse_row(end, row),
            Leftover::Fragment(fragment) => {
                debug!("Discarding trailing fragment '{}'", fragment);
                self.extraction.stats.fragments_discarded += 1;
                self.record_event(end, LineKind::Fragment, &fragment);
            }
        }

        let stats = &self.extraction.stats;
        info!(
            "Extracted {} records from {} lines ({} noise, {} rejected)",
            self.extraction.records.len(),
            stats.total_lines,
            stats.noise_lines,
            stats.rows_rejected
        );
        if self.extraction.records.is_empty() && stats.total_lines > stats.blank_lines {
            warn!("No sales records found in non-empty text");
        }

        self.extraction
    }

    fn record_event(&mut self, index: usize, kind: LineKind, text: &str) {
        if self.trace {
            self.extraction.trace.push(LineEvent {
                index,
                kind,
                text: text.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Cliente Primeira Venda Última Venda Vl Vnd Médio Qtd. Total Venda \
                          Custo Venda Total Devolução Custo Dev. Total Total Custo Lucro (R$) Lucro (%)";
    const ACME: &str = "Acme Corp 01/01/2024 15/06/2024 120,50 30 3.500,00 2.000,00 \
                        -150,00 -50,00 5.200,00 4.000,00 800,00 15,5%";
    const BETA_FIGURES: &str =
        "02/02/2024 10/10/2024 100,00 5 500,00 400,00 0,00 0,00 600,00 450,00 100,00 20%";

    #[test]
    fn test_split_lines_accepts_all_breaks() {
        let lines: Vec<&str> = split_lines("a\r\nb\nc\rd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_and_noise_only_input() {
        assert!(extract("").is_empty());
        assert!(extract("Página 3 de 10").is_empty());
        assert!(extract("\n\n  \r\n").is_empty());
    }

    #[test]
    fn test_extract_single_row() {
        let records = extract(&format!("{}\n{}\n", HEADER, ACME));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].customer, "Acme Corp");
        assert_eq!(records[0].return_total, Some(dec!(150.00)));
    }

    #[test]
    fn test_split_row_is_reassembled() {
        let records = extract(&format!("Beta Ltd\n{}", BETA_FIGURES));
        assert_eq!(records.len(), 1);
        let beta = &records[0];
        assert_eq!(beta.customer, "Beta Ltd");
        assert_eq!(beta.first_sale_date, NaiveDate::from_ymd_opt(2024, 2, 2));
        assert_eq!(beta.last_sale_date, NaiveDate::from_ymd_opt(2024, 10, 10));
        assert_eq!(beta.profit_percent, Some(dec!(20)));
        assert_eq!(beta.profit_amount, Some(dec!(100.00)));
    }

    #[test]
    fn test_header_detected_once() {
        let later = "Total Custo Cliente Primeira Venda Última Venda Vl Vnd Médio Qtd. \
                     Custo Venda Devolução Lucro (R$) Lucro (%) 01/01/2024";
        let extraction = ReportExtractor::default()
            .with_trace(true)
            .run(&format!("{}\n{}\n{}", HEADER, ACME, later));

        let header = extraction.header.expect("header");
        assert_eq!(header.line_index, 0);
        assert!(header.mapping.is_complete());
        let header_events = extraction
            .trace
            .iter()
            .filter(|e| e.kind == LineKind::Header)
            .count();
        assert_eq!(header_events, 1);
    }

    #[test]
    fn test_repeated_header_is_residue() {
        let text = format!("{}\n{}\nPágina 1 de 2\n{}\nBeta Ltd\n{}", HEADER, ACME, HEADER, BETA_FIGURES);
        let extraction = ReportExtractor::default().run(&text);

        let customers: Vec<&str> = extraction.records.iter().map(|r| r.customer.as_str()).collect();
        assert_eq!(customers, vec!["Acme Corp", "Beta Ltd"]);
        assert_eq!(extraction.stats.residue_lines, 1);
        assert_eq!(extraction.stats.noise_lines, 1);
    }

    #[test]
    fn test_residue_kept_when_disabled() {
        let config = ExtractorConfig {
            drop_header_residue: false,
            ..ExtractorConfig::default()
        };
        let text = format!("Custo Dev.\nBeta Ltd\n{}", BETA_FIGURES);
        let records = ReportExtractor::new(config).run(&text).records;
        // The fragment's dot ends the customer span, leaving "Custo Dev"
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].customer, "Custo Dev");

        let records = extract(&text);
        assert_eq!(records[0].customer, "Beta Ltd");
    }

    #[test]
    fn test_trailing_fragment_discarded() {
        let extraction = ReportExtractor::default()
            .with_trace(true)
            .run(&format!("{}\nOmega Ltda 01/01/2024", ACME));

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.stats.fragments_discarded, 1);
        let last = extraction.trace.last().expect("trace");
        assert_eq!(last.kind, LineKind::Fragment);
        assert_eq!(last.index, 2);
    }

    #[test]
    fn test_rejected_row_does_not_stop_processing() {
        let bad = "01/01/2024 15/06/2024 120,50 30 3.500,00 2.000,00 5.200,00";
        let extraction = ReportExtractor::default().run(&format!("{}\n{}", bad, ACME));
        assert_eq!(extraction.stats.rows_rejected, 1);
        assert_eq!(extraction.records.len(), 1);
    }

    #[test]
    fn test_decomposed_accents_are_normalized() {
        let footer = "Pa\u{301}gina 2 de 5";
        let extraction = ReportExtractor::default().run(footer);
        assert_eq!(extraction.stats.noise_lines, 1);
    }

    #[test]
    fn test_require_records() {
        let empty = ReportExtractor::default().run("Página 1 de 1");
        let err = empty.require_records("vazio.txt").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::NothingFound { .. })
        ));

        let full = ReportExtractor::default().run(ACME);
        assert_eq!(full.require_records("acme.txt").unwrap().len(), 1);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = format!("{}\n{}\nBeta Ltd\n{}", HEADER, ACME, BETA_FIGURES);
        assert_eq!(extract(&text), extract(&text));
    }
}
