use firesheet_core::error::ConvertError;
use firesheet_core::report::reader::read_priced_boq_file;
use std::path::Path;

use crate::output;

pub fn run(workbook: &Path, sheet: &str, output_format: &str) -> Result<(), ConvertError> {
    let boq = read_priced_boq_file(workbook, sheet)?;
    match output_format {
        "json" => output::json::print(&boq)?,
        _ => output::table::print_totals(&boq),
    }
    Ok(())
}
