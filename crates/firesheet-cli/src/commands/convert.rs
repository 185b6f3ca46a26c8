use firesheet_core::error::ConvertError;
use firesheet_core::extraction::pdftotext::PdftotextExtractor;
use firesheet_core::model::DocumentType;
use firesheet_core::report::ReportOptions;
use std::path::{Path, PathBuf};

use super::{doc_type_arg, resolve_profile};

pub fn run(
    input_file: &Path,
    output_file: &Path,
    doc_type: &str,
    profile_file: Option<PathBuf>,
    sheet_name: Option<String>,
) -> Result<(), ConvertError> {
    let profile = resolve_profile(profile_file.as_deref())?;
    let extractor = PdftotextExtractor::new();

    let mut options = ReportOptions::default();
    if let Some(name) = sheet_name {
        options.boq_sheet_name = name.clone();
        options.spec_sheet_name = name;
    }

    let parsed = firesheet_core::convert_file(
        input_file,
        output_file,
        &extractor,
        doc_type_arg(doc_type),
        &profile,
        &options,
    )?;

    let noun = match parsed.doc_type() {
        DocumentType::Boq => "line item(s)",
        DocumentType::Spec => "specification(s)",
    };
    println!(
        "Converted {} ({}): {} {} written to {}",
        parsed.source,
        parsed.doc_type(),
        parsed.len(),
        noun,
        output_file.display()
    );
    Ok(())
}
