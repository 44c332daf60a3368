use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::ExtractError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Kind of report source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
}

/// Detect the report source type.
///
/// Detection strategy:
/// - `.pdf` → PDF
/// - `.txt` / `.text` → text
/// - anything else → sniff the first bytes for the `%PDF-` signature;
///   binary content without it is rejected
pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("pdf") => return Ok(FileType::Pdf),
        Some("txt") | Some("text") => return Ok(FileType::Text),
        _ => {}
    }

    let mut head = [0u8; 512];
    let read = File::open(path)
        .and_then(|mut f| f.read(&mut head))
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let head = &head[..read];

    if head.starts_with(PDF_MAGIC) {
        debug!("Detected PDF signature in {:?}", path);
        return Ok(FileType::Pdf);
    }
    if head.contains(&0) {
        return Err(ExtractError::UnsupportedFormat(format!(
            "{} is neither a PDF nor a text file",
            path.display()
        ))
        .into());
    }

    Ok(FileType::Text)
}
