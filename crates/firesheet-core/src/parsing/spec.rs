use crate::model::{SpecCategory, SpecRecord, NOT_AVAILABLE};
use crate::parsing::normalize::title_case;
use crate::profile::Profile;

/// Extract specification records from spec sheet text.
///
/// Records come out in a fixed order: model number, product type, every
/// technical field that matched (profile order), the joined compliance
/// standards and the joined feature list. The last two are omitted when
/// nothing was found.
pub fn extract_spec_records(text: &str, profile: &Profile) -> Vec<SpecRecord> {
    let mut records = vec![
        SpecRecord::new(
            SpecCategory::ProductInformation,
            "Model Number",
            model_number(text, profile).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        SpecRecord::new(
            SpecCategory::ProductInformation,
            "Product Type",
            product_type(text, profile).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    ];

    for (field, value) in technical_specs(text, profile) {
        records.push(SpecRecord::new(
            SpecCategory::TechnicalSpecifications,
            &field,
            value,
        ));
    }

    let standards = compliance_standards(text, profile);
    if !standards.is_empty() {
        records.push(SpecRecord::new(
            SpecCategory::Compliance,
            "Standards",
            standards.join(", "),
        ));
    }

    let features = features(text, profile);
    if !features.is_empty() {
        records.push(SpecRecord::new(
            SpecCategory::Features,
            "Key Features",
            features.join(", "),
        ));
    }

    records
}

/// First model pattern that matches wins.
pub fn model_number(text: &str, profile: &Profile) -> Option<String> {
    profile.model_patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// First product type phrase present in the text, title-cased.
pub fn product_type(text: &str, profile: &Profile) -> Option<String> {
    let lower = text.to_lowercase();
    profile
        .product_types
        .iter()
        .find(|t| lower.contains(t.as_str()))
        .map(|t| title_case(t))
}

/// Every technical field whose pattern matches, with the captured text
/// kept verbatim.
pub fn technical_specs(text: &str, profile: &Profile) -> Vec<(String, String)> {
    profile
        .technical_specs
        .iter()
        .filter_map(|spec| {
            let caps = spec.pattern.captures(text)?;
            let value = caps.get(spec.group)?.as_str().trim();
            Some((spec.field.clone(), value.to_string()))
        })
        .collect()
}

/// All standard codes found, upper-cased, without duplicates, in the order
/// they were first seen (pattern by pattern, then by position).
pub fn compliance_standards(text: &str, profile: &Profile) -> Vec<String> {
    let mut standards: Vec<String> = Vec::new();
    for re in &profile.standards {
        for m in re.find_iter(text) {
            let code = m.as_str().to_uppercase();
            if !standards.contains(&code) {
                standards.push(code);
            }
        }
    }
    standards
}

/// Feature keywords present anywhere in the text, title-cased.
pub fn features(text: &str, profile: &Profile) -> Vec<String> {
    let lower = text.to_lowercase();
    profile
        .features
        .iter()
        .filter(|kw| lower.contains(kw.as_str()))
        .map(|kw| title_case(kw))
        .collect()
}
