use firesheet_core::error::ConvertError;
use firesheet_core::extraction::pdftotext::PdftotextExtractor;
use firesheet_core::report::ReportOptions;
use std::path::{Path, PathBuf};

use super::resolve_profile;

pub fn run(
    input_files: &[PathBuf],
    output_file: &Path,
    profile_file: Option<PathBuf>,
) -> Result<(), ConvertError> {
    let profile = resolve_profile(profile_file.as_deref())?;
    let extractor = PdftotextExtractor::new();
    firesheet_core::compare_files(
        input_files,
        output_file,
        &extractor,
        &profile,
        &ReportOptions::default(),
    )?;

    println!(
        "Compared {} product(s), written to {}",
        input_files.len(),
        output_file.display()
    );
    Ok(())
}
