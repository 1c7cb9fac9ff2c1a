//! Text Extractor — turns an uploaded resume into plain text.
//!
//! PDFs are parsed with `lopdf` and read page by page. A page whose text cannot be
//! recovered contributes an empty string; only a document that cannot be parsed at
//! all is rejected. Plain-text uploads must be valid UTF-8.

use thiserror::Error;
use tracing::debug;

use crate::screening::document::{Document, DocumentFormat, ExtractedText};

/// Why a single document was excluded from a batch.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF is encrypted")]
    EncryptedPdf,

    #[error("file is not valid UTF-8 text: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Extracts the text of one document.
pub fn extract(document: &Document) -> Result<ExtractedText, ExtractionError> {
    let content = match document.format {
        DocumentFormat::Pdf => extract_pdf(&document.name, &document.raw)?,
        DocumentFormat::PlainText => String::from_utf8(document.raw.to_vec())?,
    };

    Ok(ExtractedText {
        source_name: document.name.clone(),
        content,
    })
}

fn extract_pdf(name: &str, raw: &[u8]) -> Result<String, ExtractionError> {
    let pdf = lopdf::Document::load_mem(raw)?;
    if pdf.is_encrypted() {
        return Err(ExtractionError::EncryptedPdf);
    }

    let mut text = String::new();
    // get_pages() is a BTreeMap keyed by page number, so iteration is in page order.
    for page_number in pdf.get_pages().keys() {
        match pdf.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => debug!("{name}: no text on page {page_number}: {e}"),
        }
    }
    Ok(text)
}
