pub mod classify;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod profile;
pub mod report;

use std::path::{Path, PathBuf};

use error::ConvertError;
use extraction::{PdfExtractor, RawDocument};
use model::{DocumentType, ParsedDocument, ParsedRecords};
use profile::Profile;
use report::{ReportOptions, Workbook};

/// Main API entry point: extract and classify one PDF.
///
/// The document type is detected from content and file name unless
/// `doc_type` forces it. A document that yields no records is an error.
pub fn parse_pdf(
    name: &str,
    pdf_bytes: Vec<u8>,
    extractor: &dyn PdfExtractor,
    doc_type: Option<DocumentType>,
    profile: &Profile,
) -> Result<ParsedDocument, ConvertError> {
    let doc_type = doc_type.unwrap_or_else(|| classify::detect_document_type(&pdf_bytes, name));
    log::info!("{name}: processing as {doc_type}");

    let raw = RawDocument::extract(name, pdf_bytes, extractor)?;
    let parsed = parsing::parse_document(&raw, doc_type, profile);

    if parsed.is_empty() {
        log::warn!("{name}: no data extracted from PDF");
        return Err(ConvertError::EmptyExtraction {
            doc_type: doc_type.to_string(),
        });
    }

    log::info!("{name}: extracted {} record(s)", parsed.len());
    Ok(parsed)
}

/// Read a PDF from disk and parse it.
pub fn parse_file(
    input: &Path,
    extractor: &dyn PdfExtractor,
    doc_type: Option<DocumentType>,
    profile: &Profile,
) -> Result<ParsedDocument, ConvertError> {
    let bytes = read_input(input)?;
    parse_pdf(&display_name(input), bytes, extractor, doc_type, profile)
}

/// Convert one PDF into an .xlsx workbook at `output`.
pub fn convert_file(
    input: &Path,
    output: &Path,
    extractor: &dyn PdfExtractor,
    doc_type: Option<DocumentType>,
    profile: &Profile,
    options: &ReportOptions,
) -> Result<ParsedDocument, ConvertError> {
    let parsed = parse_file(input, extractor, doc_type, profile)?;
    let workbook = report::build_workbook(&parsed, options)?;
    report::xlsx::save(&workbook, output)?;
    log::info!("{}: saved {}", parsed.source, output.display());
    Ok(parsed)
}

/// Parse each input as a spec sheet and write one Comparison workbook.
///
/// Products are numbered in input order.
pub fn compare_files(
    inputs: &[PathBuf],
    output: &Path,
    extractor: &dyn PdfExtractor,
    profile: &Profile,
    options: &ReportOptions,
) -> Result<Workbook, ConvertError> {
    let mut products = Vec::with_capacity(inputs.len());
    for input in inputs {
        let parsed = parse_file(input, extractor, Some(DocumentType::Spec), profile)?;
        if let ParsedRecords::Spec { records } = parsed.records {
            products.push(records);
        }
    }

    let mut workbook = Workbook::new();
    workbook.push(report::spec::comparison_sheet(&products, options));
    report::xlsx::save(&workbook, output)?;
    log::info!("compared {} product(s) into {}", products.len(), output.display());
    Ok(workbook)
}

fn read_input(path: &Path) -> Result<Vec<u8>, ConvertError> {
    if !path.is_file() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
