use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ConvertError;
use crate::model::PricedLine;
use crate::parsing::values::parse_quantity;
use crate::report::boq::{line_amount, sum_amounts};

/// Line items of a BOQ sheet with the prices found in the workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedBoq {
    pub lines: Vec<PricedLine>,
    /// Sum of quantity times unit price over all lines.
    pub grand_total: Decimal,
}

pub fn read_priced_boq_file(path: &Path, sheet: &str) -> Result<PricedBoq, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    read_priced_boq(&bytes, sheet)
}

/// Read a BOQ sheet back from workbook bytes.
///
/// The header row is located by its "Item No" cell, so rows inserted above
/// it by hand do not matter. Data ends at the first row with neither an
/// item number nor a description. Totals are recomputed from quantity and
/// unit price rather than taken from cached formula results; a total too
/// large for a decimal is an error.
pub fn read_priced_boq(bytes: &[u8], sheet: &str) -> Result<PricedBoq, ConvertError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| ConvertError::Workbook(format!("failed to open xlsx: {e}")))?;

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| ConvertError::Workbook(format!("sheet '{sheet}' not found: {e}")))?;

    let (start_row, end_row) = match (range.start(), range.end()) {
        (Some((r0, _)), Some((r1, _))) => (r0, r1),
        _ => return Err(ConvertError::Workbook(format!("sheet '{sheet}' is empty"))),
    };

    let header_row = (start_row..=end_row)
        .find(|&r| text_at(&range, r, 0).as_deref() == Some("Item No"))
        .ok_or_else(|| ConvertError::Workbook(format!("no 'Item No' header in sheet '{sheet}'")))?;
    let columns = Columns::locate(&range, header_row)?;

    let mut lines = Vec::new();
    for row in header_row + 1..=end_row {
        let item_no = text_at(&range, row, columns.item_no).unwrap_or_default();
        let description = text_at(&range, row, columns.description).unwrap_or_default();
        if item_no.is_empty() && description.is_empty() {
            break;
        }

        let quantity = decimal_at(&range, row, columns.quantity);
        let unit_price = decimal_at(&range, row, columns.unit_price).unwrap_or_default();
        let total = line_amount(quantity, unit_price)
            .map_err(|_| ConvertError::Workbook(format!("row {}: line total overflows", row + 1)))?;
        lines.push(PricedLine {
            item_no,
            description,
            category: text_at(&range, row, columns.category).unwrap_or_default(),
            quantity,
            unit_price,
            total,
        });
    }

    let grand_total = sum_amounts(lines.iter().map(|l| l.total))?;
    log::debug!("read {} priced line(s) from sheet '{}'", lines.len(), sheet);
    Ok(PricedBoq { lines, grand_total })
}

struct Columns {
    item_no: u32,
    description: u32,
    quantity: u32,
    category: u32,
    unit_price: u32,
}

impl Columns {
    fn locate(range: &Range<Data>, header_row: u32) -> Result<Self, ConvertError> {
        let width = range.end().map(|(_, c)| c + 1).unwrap_or(0);
        let find = |name: &str| {
            (0..width)
                .find(|&c| text_at(range, header_row, c).as_deref() == Some(name))
                .ok_or_else(|| ConvertError::Workbook(format!("missing '{name}' column")))
        };
        Ok(Columns {
            item_no: find("Item No")?,
            description: find("Description")?,
            quantity: find("Quantity")?,
            category: find("Category")?,
            unit_price: find("Unit Price")?,
        })
    }
}

fn text_at(range: &Range<Data>, row: u32, col: u32) -> Option<String> {
    range.get_value((row, col)).and_then(cell_as_string)
}

fn decimal_at(range: &Range<Data>, row: u32, col: u32) -> Option<Decimal> {
    match range.get_value((row, col))? {
        Data::Float(f) => Some(f64_to_decimal(*f)),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => parse_quantity(s),
        _ => None,
    }
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        // Item numbers typed as numbers come back as floats.
        Data::Float(f) => Some(f64_to_decimal(*f).normalize().to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}

/// Convert through the shortest decimal representation so that 2.5 stays
/// 2.5 and not 2.4999999.
fn f64_to_decimal(f: f64) -> Decimal {
    format!("{f}")
        .parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineItem;
    use crate::report::boq::{BoqView, BOQ_HEADERS};
    use crate::report::{boq_workbook, xlsx, CellStyle, CellValue, ReportOptions, Sheet, Workbook};
    use rust_decimal_macros::dec;

    fn line(no: &str, qty: Option<Decimal>) -> LineItem {
        LineItem {
            item_no: no.into(),
            description: format!("Smoke detector type {no}"),
            quantity: qty,
            unit: "NOS".into(),
            category: "Smoke Detectors".into(),
        }
    }

    fn priced_bytes() -> Vec<u8> {
        let mut view = BoqView::new(vec![line("1", Some(dec!(4))), line("2", Some(dec!(10)))]);
        view.set_unit_price(0, dec!(2.50));
        view.set_unit_price(1, dec!(1.00));
        xlsx::to_bytes(&boq_workbook(&view, &ReportOptions::default()).unwrap()).unwrap()
    }

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(2.5), dec!(2.5));
        assert_eq!(f64_to_decimal(0.1), dec!(0.1));
        assert_eq!(f64_to_decimal(10.0), dec!(10));
    }

    #[test]
    fn round_trip_priced_lines() {
        let boq = read_priced_boq(&priced_bytes(), "BOQ").unwrap();
        assert_eq!(boq.lines.len(), 2);
        assert_eq!(boq.lines[0].item_no, "1");
        assert_eq!(boq.lines[0].category, "Smoke Detectors");
        assert_eq!(boq.lines[0].quantity, Some(dec!(4)));
        assert_eq!(boq.lines[0].unit_price, dec!(2.5));
        assert_eq!(boq.lines[0].total, dec!(10));
        assert_eq!(boq.grand_total, dec!(20.00));
    }

    #[test]
    fn formulas_survive_round_trip() {
        let bytes = priced_bytes();
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let formulas = workbook.worksheet_formula("BOQ").unwrap();
        assert_eq!(formulas.get_value((4, 6)).map(String::as_str), Some("C5*F5"));
        assert_eq!(formulas.get_value((7, 6)).map(String::as_str), Some("SUM(G5:G6)"));

        let values = workbook.worksheet_range("BOQ").unwrap();
        assert_eq!(values.get_value((7, 6)), Some(&Data::Float(20.0)));
        assert_eq!(values.get_value((7, 5)), Some(&Data::String("TOTAL:".into())));
    }

    #[test]
    fn missing_quantity_reads_as_none() {
        let view = BoqView::new(vec![line("1", None)]);
        let bytes = xlsx::to_bytes(&boq_workbook(&view, &ReportOptions::default()).unwrap()).unwrap();
        let boq = read_priced_boq(&bytes, "BOQ").unwrap();
        assert_eq!(boq.lines[0].quantity, None);
        assert_eq!(boq.grand_total, Decimal::ZERO);
    }

    /// A hand-edited BOQ sheet with one row per (quantity, unit price).
    fn edited_bytes(rows: &[(Decimal, Decimal)]) -> Vec<u8> {
        let mut sheet = Sheet::new("BOQ");
        sheet.write_header(&BOQ_HEADERS, CellStyle::BoqHeader);
        for (i, (qty, price)) in rows.iter().enumerate() {
            let row = 5 + i as u32;
            sheet.set_text(row, 1, (i + 1).to_string(), CellStyle::Bordered);
            sheet.set_text(row, 2, "Cable drum", CellStyle::Bordered);
            sheet.set(row, 3, CellValue::Number(*qty), CellStyle::Bordered);
            sheet.set_text(row, 4, "M", CellStyle::Bordered);
            sheet.set_text(row, 5, "Installation Materials", CellStyle::Bordered);
            sheet.set(row, 6, CellValue::Number(*price), CellStyle::PriceInput);
        }
        let mut workbook = Workbook::new();
        workbook.push(sheet);
        xlsx::to_bytes(&workbook).unwrap()
    }

    #[test]
    fn huge_price_times_quantity_is_an_error() {
        let bytes = edited_bytes(&[(dec!(100000000000000000000), dec!(10000000000))]);
        let err = read_priced_boq(&bytes, "BOQ").unwrap_err();
        assert!(matches!(err, ConvertError::Workbook(_)));
        assert!(err.to_string().contains("row 5"));
    }

    #[test]
    fn huge_grand_total_is_an_error() {
        let big = dec!(50000000000000000000000000000);
        let bytes = edited_bytes(&[(big, Decimal::ONE), (big, Decimal::ONE)]);
        let err = read_priced_boq(&bytes, "BOQ").unwrap_err();
        assert!(err.to_string().contains("grand total overflows"));
    }

    #[test]
    fn summary_sheet_is_not_a_boq() {
        let err = read_priced_boq(&priced_bytes(), "Summary").unwrap_err();
        assert!(matches!(err, ConvertError::Workbook(_)));
    }

    #[test]
    fn unknown_sheet_is_an_error() {
        let err = read_priced_boq(&priced_bytes(), "Nope").unwrap_err();
        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(matches!(
            read_priced_boq(b"not a zip", "BOQ"),
            Err(ConvertError::Workbook(_))
        ));
    }
}
