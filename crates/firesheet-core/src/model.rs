use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit assigned when no unit token is found in a description.
pub const DEFAULT_UNIT: &str = "NOS";

/// Category assigned when no category keyword matches.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Value emitted for product identity fields that could not be found.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Boq,
    Spec,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Boq => write!(f, "BOQ"),
            DocumentType::Spec => write!(f, "SPEC"),
        }
    }
}

impl DocumentType {
    pub fn from_str_loose(s: &str) -> Option<DocumentType> {
        match s.trim().to_lowercase().as_str() {
            "boq" | "bill" | "bill of quantities" => Some(DocumentType::Boq),
            "spec" | "specification" | "spec sheet" => Some(DocumentType::Spec),
            _ => None,
        }
    }
}

/// A single row of a bill of quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item number as printed, e.g. "12" or "1.2".
    pub item_no: String,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecCategory {
    #[serde(rename = "Product Information")]
    ProductInformation,
    #[serde(rename = "Technical Specifications")]
    TechnicalSpecifications,
    #[serde(rename = "Compliance")]
    Compliance,
    #[serde(rename = "Features")]
    Features,
}

impl fmt::Display for SpecCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecCategory::ProductInformation => write!(f, "Product Information"),
            SpecCategory::TechnicalSpecifications => write!(f, "Technical Specifications"),
            SpecCategory::Compliance => write!(f, "Compliance"),
            SpecCategory::Features => write!(f, "Features"),
        }
    }
}

/// One (category, field, value) row of a specification sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecRecord {
    pub category: SpecCategory,
    pub specification: String,
    pub value: String,
}

impl SpecRecord {
    pub fn new(category: SpecCategory, specification: &str, value: impl Into<String>) -> Self {
        SpecRecord {
            category,
            specification: specification.to_string(),
            value: value.into(),
        }
    }
}

/// Records extracted from one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParsedRecords {
    Boq { items: Vec<LineItem> },
    Spec { records: Vec<SpecRecord> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub source: String,
    #[serde(flatten)]
    pub records: ParsedRecords,
}

impl ParsedDocument {
    pub fn doc_type(&self) -> DocumentType {
        match self.records {
            ParsedRecords::Boq { .. } => DocumentType::Boq,
            ParsedRecords::Spec { .. } => DocumentType::Spec,
        }
    }

    pub fn len(&self) -> usize {
        match &self.records {
            ParsedRecords::Boq { items } => items.len(),
            ParsedRecords::Spec { records } => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A BOQ row read back from a workbook, with the prices a user entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub item_no: String,
    pub description: String,
    pub category: String,
    pub quantity: Option<Decimal>,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_from_loose_string() {
        assert_eq!(DocumentType::from_str_loose(" BOQ "), Some(DocumentType::Boq));
        assert_eq!(DocumentType::from_str_loose("spec"), Some(DocumentType::Spec));
        assert_eq!(DocumentType::from_str_loose("auto"), None);
    }

    #[test]
    fn spec_category_serializes_as_display_label() {
        let json = serde_json::to_string(&SpecCategory::TechnicalSpecifications).unwrap();
        assert_eq!(json, "\"Technical Specifications\"");
        assert_eq!(
            SpecCategory::ProductInformation.to_string(),
            "Product Information"
        );
    }
}
