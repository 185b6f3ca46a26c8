use crate::classify::{categorize, infer_unit};
use crate::extraction::{RawDocument, RawTable};
use crate::model::LineItem;
use crate::parsing::normalize::clean_cell;
use crate::parsing::values::parse_quantity;
use crate::profile::Profile;
use regex::Regex;
use std::sync::LazyLock;

/// How line items are pulled out of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Rows of the detected tables.
    Table,
    /// Numbered lines of the full text.
    Text,
}

impl ExtractionMode {
    /// Structured tables are preferred whenever any were found.
    pub fn select(doc: &RawDocument) -> ExtractionMode {
        if doc.tables.is_empty() {
            ExtractionMode::Text
        } else {
            ExtractionMode::Table
        }
    }
}

/// Extract BOQ line items from a document.
pub fn extract_line_items(doc: &RawDocument, profile: &Profile) -> Vec<LineItem> {
    let mode = ExtractionMode::select(doc);
    log::debug!("{}: extracting line items in {:?} mode", doc.name, mode);
    match mode {
        ExtractionMode::Table => items_from_tables(&doc.tables, profile),
        ExtractionMode::Text => items_from_text(&doc.text, profile),
    }
}

/// Item number, description, optional trailing quantity.
static LINE_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.?\d*)\s+(.+?)(?:\s+(\d+(?:\.\d+)?))?\s*$").expect("valid line item regex")
});

/// Parse numbered lines such as `1.2  Heat Detector  25`.
///
/// Lines that do not look like an item are skipped.
pub fn items_from_text(text: &str, profile: &Profile) -> Vec<LineItem> {
    text.lines()
        .filter_map(|line| {
            let caps = LINE_ITEM_RE.captures(line.trim())?;
            let description = caps[2].to_string();
            Some(LineItem {
                item_no: caps[1].to_string(),
                quantity: caps.get(3).and_then(|m| parse_quantity(m.as_str())),
                unit: infer_unit(&description, profile),
                category: categorize(&description, profile),
                description,
            })
        })
        .collect()
}

/// Concatenate the data rows of every table into line items.
///
/// The category always comes from the second column, whatever its header
/// says. The other fields are located by header name and fall back to
/// their usual position.
pub fn items_from_tables(tables: &[RawTable], profile: &Profile) -> Vec<LineItem> {
    let mut items = Vec::new();

    for table in tables {
        let columns = ColumnMap::from_header(&table.header);

        for row in &table.rows {
            let cell = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .map(|c| clean_cell(c))
                    .unwrap_or_default()
            };

            if row.iter().all(|c| c.trim().is_empty()) {
                continue;
            }

            let description = cell(columns.description);
            let category_source = cell(Some(1));
            let unit = match cell(columns.unit) {
                u if u.is_empty() => infer_unit(&description, profile),
                u => u.to_uppercase(),
            };

            items.push(LineItem {
                item_no: cell(columns.item_no),
                quantity: parse_quantity(&cell(columns.quantity)),
                unit,
                category: categorize(&category_source, profile),
                description,
            });
        }
    }

    items
}

/// Column positions of the line item fields within one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    item_no: Option<usize>,
    description: Option<usize>,
    quantity: Option<usize>,
    unit: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Self {
        let find = |names: &[&str]| {
            header.iter().position(|h| {
                let h = h.trim().to_lowercase();
                let h = h.trim_end_matches('.');
                names.iter().any(|n| h == *n)
            })
        };

        let named = [
            find(&["item", "item no", "no", "s/n", "sl", "sl no", "sr", "sr no"]),
            find(&["description", "item description", "particulars", "details"]),
            find(&["qty", "quantity"]),
            find(&["unit", "uom", "units"]),
        ];

        // Unnamed fields keep their conventional position (item no,
        // description, quantity, unit) unless a named field sits there.
        let mut resolved = named;
        for (pos, field) in resolved.iter_mut().enumerate() {
            if field.is_none() && pos < header.len() && !named.contains(&Some(pos)) {
                *field = Some(pos);
            }
        }

        let [item_no, description, quantity, unit] = resolved;
        ColumnMap {
            item_no,
            description,
            quantity,
            unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin::default_profile;
    use rust_decimal_macros::dec;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn text_line_with_quantity() {
        let profile = default_profile().unwrap();
        let items = items_from_text("1 Addressable Smoke Detector 50", &profile);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_no, "1");
        assert_eq!(items[0].description, "Addressable Smoke Detector");
        assert_eq!(items[0].quantity, Some(dec!(50)));
        assert_eq!(items[0].unit, "NOS");
        assert_eq!(items[0].category, "Smoke Detectors");
    }

    #[test]
    fn text_line_keeps_decimal_item_number() {
        let profile = default_profile().unwrap();
        let items = items_from_text("  1.2   FPLR wire 1000 ft  ", &profile);
        assert_eq!(items[0].item_no, "1.2");
        assert_eq!(items[0].description, "FPLR wire 1000 ft");
        assert_eq!(items[0].quantity, None);
        assert_eq!(items[0].unit, "FT");
        assert_eq!(items[0].category, "Installation Materials");
    }

    #[test]
    fn text_line_without_quantity() {
        let profile = default_profile().unwrap();
        let items = items_from_text("3 Testing and commissioning", &profile);
        assert_eq!(items[0].quantity, None);
        assert_eq!(items[0].category, "Other");
        assert_eq!(items[0].unit, "NOS");
    }

    #[test]
    fn non_item_lines_skipped() {
        let profile = default_profile().unwrap();
        let text = "BILL OF QUANTITIES\nProject: Tower A\n\n1 FACP 1\nTotal carried forward\n";
        let items = items_from_text(text, &profile);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "FACP");
    }

    #[test]
    fn table_rows_mapped_by_header() {
        let profile = default_profile().unwrap();
        let tables = vec![RawTable {
            header: strings(&["Item No.", "Description", "Unit", "Qty"]),
            rows: vec![
                strings(&["1", "Heat Detector, Fixed Temp", "pcs", "25"]),
                strings(&["2", "Horn/Strobe", "", "1,200"]),
            ],
        }];
        let items = items_from_tables(&tables, &profile);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit, "PCS");
        assert_eq!(items[0].quantity, Some(dec!(25)));
        assert_eq!(items[0].category, "Smoke Detectors");
        assert_eq!(items[1].unit, "NOS");
        assert_eq!(items[1].quantity, Some(dec!(1200)));
        assert_eq!(items[1].category, "Notification Devices");
    }

    #[test]
    fn table_rows_fall_back_to_positions() {
        let profile = default_profile().unwrap();
        let tables = vec![RawTable {
            header: strings(&["#", "Equipment", "Count"]),
            rows: vec![strings(&["7", "Duct Detector", "5"])],
        }];
        let items = items_from_tables(&tables, &profile);
        assert_eq!(items[0].item_no, "7");
        assert_eq!(items[0].description, "Duct Detector");
        assert_eq!(items[0].quantity, Some(dec!(5)));
        assert_eq!(items[0].category, "System Components");
    }

    #[test]
    fn category_comes_from_second_column() {
        let profile = default_profile().unwrap();
        let tables = vec![RawTable {
            header: strings(&["Qty", "Type", "Description"]),
            rows: vec![strings(&["4", "Battery", "12V 7Ah sealed lead acid"])],
        }];
        let items = items_from_tables(&tables, &profile);
        assert_eq!(items[0].description, "12V 7Ah sealed lead acid");
        assert_eq!(items[0].category, "Accessories");
    }

    #[test]
    fn tables_concatenated_in_order() {
        let profile = default_profile().unwrap();
        let tables = vec![
            RawTable {
                header: strings(&["Item", "Description"]),
                rows: vec![strings(&["1", "FACP"])],
            },
            RawTable {
                header: strings(&["Item", "Description"]),
                rows: vec![strings(&["", ""]), strings(&["2", "Conduit"])],
            },
        ];
        let items = items_from_tables(&tables, &profile);
        let numbers: Vec<&str> = items.iter().map(|i| i.item_no.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[test]
    fn mode_prefers_tables() {
        let with_table = RawDocument::new(
            "a.pdf",
            vec![],
            "1 FACP 1".into(),
            vec![RawTable {
                header: strings(&["Item", "Description"]),
                rows: vec![strings(&["1", "Conduit"])],
            }],
        );
        assert_eq!(ExtractionMode::select(&with_table), ExtractionMode::Table);

        let profile = default_profile().unwrap();
        let items = extract_line_items(&with_table, &profile);
        assert_eq!(items[0].description, "Conduit");

        let text_only = RawDocument::new("b.pdf", vec![], "1 FACP 1".into(), vec![]);
        assert_eq!(ExtractionMode::select(&text_only), ExtractionMode::Text);
    }
}
