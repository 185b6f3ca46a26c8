use crate::model::DEFAULT_CATEGORY;
use crate::profile::Profile;

/// Assign a category to a BOQ description.
///
/// Categories are tried in profile order and the first one with a keyword
/// contained in the description wins, so "addressable heat detector" lands
/// in Smoke Detectors even though "addressable" is a System Components
/// keyword further down.
pub fn categorize(description: &str, profile: &Profile) -> String {
    let lower = description.to_lowercase();
    profile
        .categories
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw.as_str())))
        .map(|rule| rule.name.clone())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}
