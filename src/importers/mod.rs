// Import module - report text acquisition
//
// The report arrives either as the original PDF or as text already pulled
// out of it. Both end up as one string handed to the extraction pipeline.

mod file_detector;
pub mod report_pdf;

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::ExtractorConfig;
use crate::report::{Extraction, ReportExtractor};

pub use file_detector::{detect_file_type, FileType};

/// Read the report text from a PDF or text file.
pub fn load_report_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let file_type = detect_file_type(path)?;
    info!("Loading report text from {:?} ({:?})", path, file_type);

    match file_type {
        FileType::Pdf => report_pdf::extract_pdf_text(path),
        FileType::Text => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read text file {}", path.display()))?;
            Ok(decode_text(&bytes))
        }
    }
}

/// Load a report and run the extraction pipeline over it.
pub fn import_report<P: AsRef<Path>>(path: P, config: &ExtractorConfig) -> Result<Extraction> {
    let path = path.as_ref();
    let text = load_report_text(path)?;
    let extraction = ReportExtractor::new(config.clone()).run(&text);

    if extraction.is_empty() {
        warn!("No sales records found in {:?}", path);
    } else {
        info!(
            "Extracted {} sales records from {:?}",
            extraction.records.len(),
            path
        );
    }

    Ok(extraction)
}

/// Decode text file contents: UTF-8 when valid, Windows-1252 otherwise.
///
/// Older report exports are saved by Windows tools in the legacy code page.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}
