pub mod boq;
pub mod reader;
pub mod spec;
pub mod summary;
pub mod xlsx;

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;

use crate::error::ConvertError;
use crate::model::{ParsedDocument, ParsedRecords};
use boq::BoqView;

/// Row of the column headers on every generated sheet.
pub const HEADER_ROW: u32 = 4;

/// First data row below the headers.
pub const FIRST_DATA_ROW: u32 = HEADER_ROW + 1;

/// Knobs for report generation.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub boq_sheet_name: String,
    pub spec_sheet_name: String,
    /// Shown as "Generated: ..." under each title.
    pub generated: DateTime<Local>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            boq_sheet_name: "BOQ".into(),
            spec_sheet_name: "Specifications".into(),
            generated: Local::now(),
        }
    }
}

impl ReportOptions {
    pub fn generated_label(&self) -> String {
        format!("Generated: {}", self.generated.format("%Y-%m-%d %H:%M"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(Decimal),
    /// A formula (without the leading `=`) and the value it evaluates to
    /// when the workbook is written.
    Formula { expr: String, cached: Decimal },
}

/// Named cell formats. Each maps to one entry of the styles part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    Plain,
    Title,
    Timestamp,
    BoqHeader,
    SpecHeader,
    Bordered,
    PriceInput,
    Price,
    TotalLabel,
    GrandTotal,
    CategoryLabel,
    Wrapped,
    Bold,
    Heading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

/// One worksheet. Rows and columns are 1-based, as in A1 references.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    cells: BTreeMap<u32, BTreeMap<u32, Cell>>,
    merges: Vec<String>,
    column_widths: Vec<(u32, f64)>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            column_widths: Vec::new(),
        }
    }

    pub fn set(&mut self, row: u32, col: u32, value: CellValue, style: CellStyle) {
        self.cells
            .entry(row)
            .or_default()
            .insert(col, Cell { value, style });
    }

    pub fn set_text(&mut self, row: u32, col: u32, text: impl Into<String>, style: CellStyle) {
        self.set(row, col, CellValue::Text(text.into()), style);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&row).and_then(|r| r.get(&col))
    }

    /// Non-empty rows in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &BTreeMap<u32, Cell>)> {
        self.cells.iter().map(|(r, cells)| (*r, cells))
    }

    pub fn merge(&mut self, range: impl Into<String>) {
        self.merges.push(range.into());
    }

    pub fn merges(&self) -> &[String] {
        &self.merges
    }

    pub fn set_column_widths(&mut self, widths: &[f64]) {
        self.column_widths = widths
            .iter()
            .enumerate()
            .map(|(i, w)| (i as u32 + 1, *w))
            .collect();
    }

    pub fn column_widths(&self) -> &[(u32, f64)] {
        &self.column_widths
    }

    /// Title in A1 merged across `span` columns, timestamp in A2.
    pub(crate) fn write_banner(&mut self, title: &str, span: u32, options: &ReportOptions) {
        self.set_text(1, 1, title, CellStyle::Title);
        self.merge(format!("A1:{}", cell_ref(1, span)));
        self.set_text(2, 1, options.generated_label(), CellStyle::Timestamp);
    }

    pub(crate) fn write_header(&mut self, headers: &[&str], style: CellStyle) {
        for (i, header) in headers.iter().enumerate() {
            self.set_text(HEADER_ROW, i as u32 + 1, *header, style);
        }
    }
}

/// Ordered collection of sheets.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn insert(&mut self, index: usize, sheet: Sheet) {
        self.sheets.insert(index.min(self.sheets.len()), sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Column letters for a 1-based column index: 1 -> A, 27 -> AA.
pub fn column_letter(col: u32) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row)
}

/// Build the workbook for one parsed document.
///
/// BOQs get a Summary sheet in front of the line-item sheet, with all unit
/// prices at zero. Spec sheets get a single Specifications sheet.
pub fn build_workbook(
    doc: &ParsedDocument,
    options: &ReportOptions,
) -> Result<Workbook, ConvertError> {
    match &doc.records {
        ParsedRecords::Boq { items } => boq_workbook(&BoqView::new(items.clone()), options),
        ParsedRecords::Spec { records } => {
            let mut workbook = Workbook::new();
            workbook.push(spec::spec_sheet(records, options));
            Ok(workbook)
        }
    }
}

/// BOQ sheet plus Summary, for a view that may already carry prices.
pub fn boq_workbook(view: &BoqView, options: &ReportOptions) -> Result<Workbook, ConvertError> {
    let mut workbook = Workbook::new();
    workbook.push(boq::boq_sheet(view, options)?);
    workbook.insert(0, summary::summary_sheet(view.items()));
    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItem, SpecCategory, SpecRecord};

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(7), "G");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(cell_ref(5, 3), "C5");
    }

    #[test]
    fn boq_workbook_puts_summary_first() {
        let doc = ParsedDocument {
            source: "boq.pdf".into(),
            records: ParsedRecords::Boq {
                items: vec![LineItem {
                    item_no: "1".into(),
                    description: "FACP".into(),
                    quantity: None,
                    unit: "NOS".into(),
                    category: "Control Panels".into(),
                }],
            },
        };
        let workbook = build_workbook(&doc, &ReportOptions::default()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Summary", "BOQ"]);
    }

    #[test]
    fn spec_workbook_uses_configured_name() {
        let doc = ParsedDocument {
            source: "sd.pdf".into(),
            records: ParsedRecords::Spec {
                records: vec![SpecRecord::new(SpecCategory::ProductInformation, "Model Number", "X")],
            },
        };
        let options = ReportOptions {
            spec_sheet_name: "Detector".into(),
            ..Default::default()
        };
        let workbook = build_workbook(&doc, &options).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Detector"]);
    }

    #[test]
    fn later_cell_overwrites_earlier() {
        let mut sheet = Sheet::new("S");
        sheet.set_text(1, 1, "a", CellStyle::Plain);
        sheet.set_text(1, 1, "b", CellStyle::Bold);
        let cell = sheet.get(1, 1).unwrap();
        assert_eq!(cell.value, CellValue::Text("b".into()));
        assert_eq!(cell.style, CellStyle::Bold);
        assert!(sheet.get(2, 1).is_none());
    }
}
