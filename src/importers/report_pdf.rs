// Report PDF reader - text extraction for Venda X Cliente PDFs
//
// pdf-extract returns the page text in reading order with one physical
// line per text row, which is what the extraction pipeline expects.

use anyhow::Result;
use pdf_extract::extract_text;
use std::path::Path;
use tracing::{debug, info};

use crate::error::ExtractError;

/// Extract the raw text of a report PDF.
pub fn extract_pdf_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    info!("Extracting text from PDF: {:?}", path);

    if !path.exists() {
        return Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        ))
        .into());
    }

    let text = extract_text(path).map_err(|e| ExtractError::PdfText(e.to_string()))?;
    debug!("Extracted {} bytes of text", text.len());

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_pdf_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = extract_pdf_text(dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::Io(_))
        ));
    }
}
