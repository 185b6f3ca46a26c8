use serde::{Deserialize, Serialize};

/// A profile: the ordered keyword and pattern tables that drive
/// classification and extraction.
///
/// Every table is a JSON array. Order is significant: the first entry
/// that matches wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Ordered category rules for BOQ descriptions.
    pub categories: Vec<CategoryDef>,
    /// Ordered unit tokens, most specific first.
    pub units: Vec<String>,
    /// Ordered model number patterns; capture group 1 is the model.
    pub model_patterns: Vec<String>,
    /// Ordered product type phrases.
    pub product_types: Vec<String>,
    pub technical_specs: Vec<TechnicalSpecDef>,
    /// Compliance standard patterns (find-all).
    pub standards: Vec<String>,
    /// Feature keywords (presence only).
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub keywords: Vec<String>,
}

/// One named technical field and the pattern that captures it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSpecDef {
    pub field: String,
    pub pattern: String,
    #[serde(default = "default_group")]
    pub group: usize,
}

fn default_group() -> usize {
    1
}
