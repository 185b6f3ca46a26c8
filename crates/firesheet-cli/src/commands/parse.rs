use firesheet_core::error::ConvertError;
use firesheet_core::extraction::pdftotext::PdftotextExtractor;
use std::path::{Path, PathBuf};

use super::{doc_type_arg, resolve_profile};
use crate::output;

pub fn run(
    pdf_file: &Path,
    doc_type: &str,
    output_format: &str,
    profile_file: Option<PathBuf>,
) -> Result<(), ConvertError> {
    let profile = resolve_profile(profile_file.as_deref())?;
    let extractor = PdftotextExtractor::new();
    let parsed = firesheet_core::parse_file(pdf_file, &extractor, doc_type_arg(doc_type), &profile)?;

    match output_format {
        "json" => output::json::print(&parsed)?,
        _ => output::table::print_parsed(&parsed),
    }
    Ok(())
}
