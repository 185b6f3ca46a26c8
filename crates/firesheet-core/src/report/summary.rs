use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{CellStyle, CellValue, Sheet, HEADER_ROW};
use crate::model::LineItem;

pub const SUMMARY_SHEET: &str = "Summary";
pub const SUMMARY_TITLE: &str = "PROJECT SUMMARY - SMOKE DETECTION SYSTEM";

/// Number of line items per category, categories in lexicographic order.
pub fn category_counts(items: &[LineItem]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.category.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Category breakdown sheet. It carries no timestamp row.
pub fn summary_sheet(items: &[LineItem]) -> Sheet {
    let mut sheet = Sheet::new(SUMMARY_SHEET);
    sheet.set_text(1, 1, SUMMARY_TITLE, CellStyle::Title);
    sheet.merge("A1:D1");
    sheet.set_text(3, 1, "Category Breakdown", CellStyle::Heading);
    sheet.set_text(HEADER_ROW, 1, "Category", CellStyle::Bold);
    sheet.set_text(HEADER_ROW, 2, "Item Count", CellStyle::Bold);

    for (row, (category, count)) in (HEADER_ROW + 1..).zip(category_counts(items)) {
        sheet.set_text(row, 1, category, CellStyle::Plain);
        sheet.set(row, 2, CellValue::Number(Decimal::from(count)), CellStyle::Plain);
    }

    sheet.set_column_widths(&[30.0, 15.0]);
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: &str) -> LineItem {
        LineItem {
            item_no: "1".into(),
            description: "x".into(),
            quantity: None,
            unit: "NOS".into(),
            category: category.into(),
        }
    }

    #[test]
    fn counts_sorted_by_category() {
        let items = vec![
            item("Smoke Detectors"),
            item("Control Panels"),
            item("Smoke Detectors"),
            item("Other"),
        ];
        let counts: Vec<_> = category_counts(&items).into_iter().collect();
        assert_eq!(
            counts,
            vec![("Control Panels", 1), ("Other", 1), ("Smoke Detectors", 2)]
        );
    }

    #[test]
    fn sheet_rows_follow_header() {
        let items = vec![item("Smoke Detectors"), item("Accessories")];
        let sheet = summary_sheet(&items);
        assert_eq!(sheet.name, "Summary");
        assert_eq!(sheet.get(5, 1).unwrap().value, CellValue::Text("Accessories".into()));
        assert_eq!(sheet.get(6, 2).unwrap().value, CellValue::Number(Decimal::ONE));
        assert!(sheet.get(7, 1).is_none());
    }
}
