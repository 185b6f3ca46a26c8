pub mod pdftotext;
pub mod table;

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ConvertError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// A table recovered from the document. The header row is kept apart
/// from the data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything a parser may look at for one source document.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// File name (or other label) of the source, used for type detection.
    pub name: String,
    pub bytes: Vec<u8>,
    /// Page texts joined by newline.
    pub text: String,
    pub tables: Vec<RawTable>,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, text: String, tables: Vec<RawTable>) -> Self {
        RawDocument {
            name: name.into(),
            bytes,
            text,
            tables,
        }
    }

    /// Assemble a document from extracted pages, detecting layout tables.
    pub fn from_pages(name: impl Into<String>, bytes: Vec<u8>, pages: &[PageContent]) -> Self {
        let text = pages
            .iter()
            .map(|p| p.lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n");
        let tables = table::detect_tables(pages);
        RawDocument::new(name, bytes, text, tables)
    }

    /// Run the extractor over `bytes` and assemble the document.
    pub fn extract(
        name: impl Into<String>,
        bytes: Vec<u8>,
        extractor: &dyn PdfExtractor,
    ) -> Result<Self, ConvertError> {
        let name = name.into();
        let pages = extractor.extract_pages(&bytes)?;
        log::debug!(
            "{}: {} page(s) extracted with {}",
            name,
            pages.len(),
            extractor.backend_name()
        );
        Ok(RawDocument::from_pages(name, bytes, &pages))
    }
}
