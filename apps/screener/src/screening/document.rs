use bytes::Bytes;

/// How an uploaded resume is decoded. Inferred from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    /// `.pdf` (any case) is a PDF; everything else is read as UTF-8 text.
    pub fn from_filename(name: &str) -> Self {
        let is_pdf = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            DocumentFormat::Pdf
        } else {
            DocumentFormat::PlainText
        }
    }
}

/// One uploaded resume, consumed once by the extractor.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub format: DocumentFormat,
    pub raw: Bytes,
}

impl Document {
    pub fn new(name: impl Into<String>, raw: impl Into<Bytes>) -> Self {
        let name = name.into();
        let format = DocumentFormat::from_filename(&name);
        Self {
            name,
            format,
            raw: raw.into(),
        }
    }
}

/// Text recovered from a [`Document`]. `content` may be empty but is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub source_name: String,
    pub content: String,
}
