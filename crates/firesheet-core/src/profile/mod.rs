pub mod builtin;
pub mod schema;

use crate::error::ConvertError;
use regex::{Regex, RegexBuilder};
use schema::ProfileDef;
use std::path::Path;

/// A validated profile with its patterns compiled.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub version: String,
    pub categories: Vec<CategoryRule>,
    /// Lower-case unit tokens, in scan order.
    pub units: Vec<String>,
    pub model_patterns: Vec<Regex>,
    /// Lower-case product type phrases, in scan order.
    pub product_types: Vec<String>,
    pub technical_specs: Vec<TechnicalSpec>,
    pub standards: Vec<Regex>,
    /// Lower-case feature keywords, in scan order.
    pub features: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub name: String,
    /// Lower-case keywords.
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TechnicalSpec {
    pub field: String,
    pub pattern: Regex,
    pub group: usize,
}

/// Load a profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<Profile, ConvertError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConvertError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let def: ProfileDef = serde_json::from_str(&content).map_err(|e| ConvertError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    compile(def)
}

/// Parse a profile from a JSON string (no file path context).
pub fn parse_profile_str(json: &str) -> Result<Profile, ConvertError> {
    let def: ProfileDef = serde_json::from_str(json)?;
    compile(def)
}

/// Validate a profile definition and compile its patterns.
pub fn compile(def: ProfileDef) -> Result<Profile, ConvertError> {
    validate_profile(&def)?;

    let categories = def
        .categories
        .iter()
        .map(|c| CategoryRule {
            name: c.name.clone(),
            keywords: lowercase_all(&c.keywords),
        })
        .collect();

    let model_patterns = def
        .model_patterns
        .iter()
        .map(|p| build_regex(p))
        .collect::<Result<Vec<_>, _>>()?;

    let technical_specs = def
        .technical_specs
        .iter()
        .map(|t| {
            let pattern = build_regex(&t.pattern)?;
            if t.group >= pattern.captures_len() {
                return Err(ConvertError::ProfileInvalid(format!(
                    "technical spec '{}' uses group {} but its pattern has {} group(s)",
                    t.field,
                    t.group,
                    pattern.captures_len() - 1
                )));
            }
            Ok(TechnicalSpec {
                field: t.field.clone(),
                pattern,
                group: t.group,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let standards = def
        .standards
        .iter()
        .map(|p| build_regex(p))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Profile {
        name: def.name,
        version: def.version,
        categories,
        units: lowercase_all(&def.units),
        model_patterns,
        product_types: lowercase_all(&def.product_types),
        technical_specs,
        standards,
        features: lowercase_all(&def.features),
    })
}

/// Validate that a profile definition is well-formed.
pub fn validate_profile(def: &ProfileDef) -> Result<(), ConvertError> {
    if def.categories.is_empty() {
        return Err(ConvertError::ProfileInvalid(
            "categories must not be empty".into(),
        ));
    }

    for category in &def.categories {
        if category.name.trim().is_empty() {
            return Err(ConvertError::ProfileInvalid(
                "category name must not be empty".into(),
            ));
        }
        if category.keywords.is_empty() {
            return Err(ConvertError::ProfileInvalid(format!(
                "category '{}' has no keywords",
                category.name
            )));
        }
        if category.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConvertError::ProfileInvalid(format!(
                "category '{}' has an empty keyword",
                category.name
            )));
        }
    }

    if def.units.iter().any(|u| u.trim().is_empty()) {
        return Err(ConvertError::ProfileInvalid(
            "unit tokens must not be empty".into(),
        ));
    }

    if def.model_patterns.is_empty() {
        return Err(ConvertError::ProfileInvalid(
            "model_patterns must not be empty".into(),
        ));
    }

    for spec in &def.technical_specs {
        if spec.field.trim().is_empty() {
            return Err(ConvertError::ProfileInvalid(
                "technical spec field name must not be empty".into(),
            ));
        }
    }

    Ok(())
}

fn build_regex(pattern: &str) -> Result<Regex, ConvertError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConvertError::ProfileInvalid(format!("bad pattern '{}': {}", pattern, e)))
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}
