use rust_decimal::Decimal;

use super::{cell_ref, CellStyle, CellValue, ReportOptions, Sheet, FIRST_DATA_ROW};
use crate::error::ConvertError;
use crate::model::LineItem;

pub const BOQ_TITLE: &str = "BILL OF QUANTITIES - SMOKE DETECTION SYSTEM";

pub const BOQ_HEADERS: [&str; 7] = [
    "Item No",
    "Description",
    "Quantity",
    "Unit",
    "Category",
    "Unit Price",
    "Total Price",
];

const QUANTITY_COL: u32 = 3;
const UNIT_PRICE_COL: u32 = 6;
const TOTAL_COL: u32 = 7;

/// Quantity times unit price. A missing quantity counts as zero, like an
/// empty cell in the formula.
pub fn line_amount(quantity: Option<Decimal>, unit_price: Decimal) -> Result<Decimal, ConvertError> {
    let quantity = quantity.unwrap_or(Decimal::ZERO);
    quantity.checked_mul(unit_price).ok_or_else(|| {
        ConvertError::Workbook(format!(
            "line total overflows: {quantity} x {unit_price}"
        ))
    })
}

/// Sum of line totals.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, ConvertError> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| ConvertError::Workbook("grand total overflows".into()))
    })
}

/// Line items with an editable unit price per row.
///
/// Totals are always derived from quantity and unit price, so changing a
/// price never requires re-extracting the document.
#[derive(Debug, Clone, Default)]
pub struct BoqView {
    items: Vec<LineItem>,
    unit_prices: Vec<Decimal>,
}

impl BoqView {
    /// All unit prices start at zero.
    pub fn new(items: Vec<LineItem>) -> Self {
        let unit_prices = vec![Decimal::ZERO; items.len()];
        BoqView { items, unit_prices }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns false when `index` is out of range.
    pub fn set_unit_price(&mut self, index: usize, price: Decimal) -> bool {
        match self.unit_prices.get_mut(index) {
            Some(slot) => {
                *slot = price;
                true
            }
            None => false,
        }
    }

    pub fn unit_price(&self, index: usize) -> Option<Decimal> {
        self.unit_prices.get(index).copied()
    }

    /// Total of item `index`; `None` when out of range.
    pub fn line_total(&self, index: usize) -> Option<Result<Decimal, ConvertError>> {
        let item = self.items.get(index)?;
        Some(line_amount(item.quantity, self.unit_prices[index]))
    }

    pub fn grand_total(&self) -> Result<Decimal, ConvertError> {
        let totals = self
            .items
            .iter()
            .zip(&self.unit_prices)
            .map(|(item, price)| line_amount(item.quantity, *price))
            .collect::<Result<Vec<_>, _>>()?;
        sum_amounts(totals)
    }

    /// Sheet row holding item `index`.
    pub fn row_of(index: usize) -> u32 {
        FIRST_DATA_ROW + index as u32
    }

    /// Sheet row of the grand total, one blank row below the data.
    pub fn grand_total_row(&self) -> u32 {
        self.last_data_row() + 2
    }

    fn last_data_row(&self) -> u32 {
        Self::row_of(self.items.len().max(1) - 1)
    }
}

/// Line-item sheet with live total formulas and a grand total row.
///
/// Fails when a cached total does not fit in a decimal.
pub fn boq_sheet(view: &BoqView, options: &ReportOptions) -> Result<Sheet, ConvertError> {
    let mut sheet = Sheet::new(options.boq_sheet_name.clone());
    sheet.write_banner(BOQ_TITLE, 6, options);
    sheet.write_header(&BOQ_HEADERS, CellStyle::BoqHeader);

    for (i, (item, &price)) in view.items.iter().zip(&view.unit_prices).enumerate() {
        let row = BoqView::row_of(i);
        let total = line_amount(item.quantity, price)?;

        sheet.set_text(row, 1, &item.item_no, CellStyle::Bordered);
        sheet.set_text(row, 2, &item.description, CellStyle::Bordered);
        match item.quantity {
            Some(q) => sheet.set(row, QUANTITY_COL, CellValue::Number(q), CellStyle::Bordered),
            None => sheet.set_text(row, QUANTITY_COL, "", CellStyle::Bordered),
        }
        sheet.set_text(row, 4, &item.unit, CellStyle::Bordered);
        sheet.set_text(row, 5, &item.category, CellStyle::Bordered);
        sheet.set(row, UNIT_PRICE_COL, CellValue::Number(price), CellStyle::PriceInput);
        sheet.set(
            row,
            TOTAL_COL,
            CellValue::Formula {
                expr: format!(
                    "{}*{}",
                    cell_ref(row, QUANTITY_COL),
                    cell_ref(row, UNIT_PRICE_COL)
                ),
                cached: total,
            },
            CellStyle::Price,
        );
    }

    let total_row = view.grand_total_row();
    sheet.set_text(total_row, UNIT_PRICE_COL, "TOTAL:", CellStyle::TotalLabel);
    sheet.set(
        total_row,
        TOTAL_COL,
        CellValue::Formula {
            expr: format!(
                "SUM({}:{})",
                cell_ref(FIRST_DATA_ROW, TOTAL_COL),
                cell_ref(view.last_data_row(), TOTAL_COL)
            ),
            cached: view.grand_total()?,
        },
        CellStyle::GrandTotal,
    );

    sheet.set_column_widths(&[10.0, 50.0, 12.0, 10.0, 20.0, 15.0, 15.0]);
    Ok(sheet)
}
