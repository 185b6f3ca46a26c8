use firesheet_core::error::ConvertError;
use firesheet_core::extraction::pdftotext::PdftotextExtractor;
use firesheet_core::extraction::PdfExtractor;
use firesheet_core::model::DocumentType;
use firesheet_core::profile::Profile;
use firesheet_core::report::ReportOptions;
use std::path::{Path, PathBuf};

use super::{doc_type_arg, error_chain, resolve_profile};

pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    doc_type: &str,
    profile_file: Option<PathBuf>,
) -> Result<(), ConvertError> {
    let profile = resolve_profile(profile_file.as_deref())?;
    let extractor = PdftotextExtractor::new();
    let (succeeded, total) = convert_dir(
        input_dir,
        output_dir,
        &extractor,
        doc_type_arg(doc_type),
        &profile,
        &ReportOptions::default(),
    )?;

    if total > 0 {
        println!("Conversion complete: {succeeded}/{total} files successful");
    }
    Ok(())
}

/// Convert every PDF in `input_dir`, one after the other, returning
/// `(succeeded, total)`.
///
/// A failing file is logged and counted; it never stops the batch. Only
/// setup problems (unreadable directory, output directory not creatable)
/// are returned as errors.
pub fn convert_dir(
    input_dir: &Path,
    output_dir: &Path,
    extractor: &dyn PdfExtractor,
    doc_type: Option<DocumentType>,
    profile: &Profile,
    options: &ReportOptions,
) -> Result<(usize, usize), ConvertError> {
    let inputs = pdf_files(input_dir)?;
    if inputs.is_empty() {
        log::warn!("No PDF files found in {}", input_dir.display());
        return Ok((0, 0));
    }
    std::fs::create_dir_all(output_dir)?;
    log::info!("found {} PDF file(s) in {}", inputs.len(), input_dir.display());

    let mut succeeded = 0;
    for input in &inputs {
        let output = output_path(input, output_dir);
        match firesheet_core::convert_file(input, &output, extractor, doc_type, profile, options) {
            Ok(_) => succeeded += 1,
            Err(e) => log::error!("{}: {}", input.display(), error_chain(&e)),
        }
    }
    Ok((succeeded, inputs.len()))
}

/// Regular files with a `.pdf` extension (any case), sorted by name.
pub fn pdf_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    if !dir.is_dir() {
        return Err(ConvertError::InputNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `<output_dir>/<stem>.xlsx`
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".xlsx");
    output_dir.join(name)
}
