use super::{CellStyle, ReportOptions, Sheet, FIRST_DATA_ROW};
use crate::model::{SpecCategory, SpecRecord};

pub const SPEC_TITLE: &str = "PRODUCT SPECIFICATIONS - SMOKE DETECTION EQUIPMENT";
pub const SPEC_HEADERS: [&str; 3] = ["Category", "Specification", "Value"];

pub const COMPARISON_SHEET: &str = "Comparison";
pub const COMPARISON_TITLE: &str = "PRODUCT COMPARISON - SMOKE DETECTION EQUIPMENT";
pub const COMPARISON_HEADERS: [&str; 4] = ["Product", "Category", "Specification", "Value"];

/// Category label for each record: the name on the first row of every
/// contiguous run, `None` on the rows that follow it.
pub fn run_labels(records: &[SpecRecord]) -> Vec<Option<SpecCategory>> {
    let mut previous = None;
    records
        .iter()
        .map(|r| {
            if previous == Some(r.category) {
                None
            } else {
                previous = Some(r.category);
                Some(r.category)
            }
        })
        .collect()
}

pub fn spec_sheet(records: &[SpecRecord], options: &ReportOptions) -> Sheet {
    let mut sheet = Sheet::new(options.spec_sheet_name.clone());
    sheet.write_banner(SPEC_TITLE, 3, options);
    sheet.write_header(&SPEC_HEADERS, CellStyle::SpecHeader);

    for ((row, record), label) in (FIRST_DATA_ROW..).zip(records).zip(run_labels(records)) {
        match label {
            Some(category) => sheet.set_text(row, 1, category.to_string(), CellStyle::CategoryLabel),
            None => sheet.set_text(row, 1, "", CellStyle::Wrapped),
        }
        sheet.set_text(row, 2, &record.specification, CellStyle::Wrapped);
        sheet.set_text(row, 3, &record.value, CellStyle::Wrapped);
    }

    sheet.set_column_widths(&[25.0, 30.0, 40.0]);
    sheet
}

/// Side-by-side listing of several spec sheets, one "Product N" block per
/// input in the given order.
pub fn comparison_sheet(products: &[Vec<SpecRecord>], options: &ReportOptions) -> Sheet {
    let mut sheet = Sheet::new(COMPARISON_SHEET);
    sheet.write_banner(COMPARISON_TITLE, 4, options);
    sheet.write_header(&COMPARISON_HEADERS, CellStyle::SpecHeader);

    let rows = products.iter().enumerate().flat_map(|(i, records)| {
        records.iter().map(move |r| (format!("Product {}", i + 1), r))
    });
    for (row, (product, record)) in (FIRST_DATA_ROW..).zip(rows) {
        sheet.set_text(row, 1, product, CellStyle::Bordered);
        sheet.set_text(row, 2, record.category.to_string(), CellStyle::Bordered);
        sheet.set_text(row, 3, &record.specification, CellStyle::Wrapped);
        sheet.set_text(row, 4, &record.value, CellStyle::Wrapped);
    }

    sheet.set_column_widths(&[14.0, 25.0, 30.0, 40.0]);
    sheet
}
