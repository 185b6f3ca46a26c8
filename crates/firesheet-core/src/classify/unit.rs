use crate::model::DEFAULT_UNIT;
use crate::profile::Profile;

/// Infer the unit of measure from a BOQ description.
///
/// Unit tokens are scanned in profile order and the first one present
/// wins, upper-cased. A token only counts when it is not glued to letters
/// on either side: "200m" and "10 nos." match, the "m" inside "smoke" does
/// not. A single plural "s" is allowed, so "2 sets" is a SET. Falls back to
/// "NOS".
pub fn infer_unit(description: &str, profile: &Profile) -> String {
    let lower = description.to_lowercase();
    profile
        .units
        .iter()
        .find(|unit| contains_token(&lower, unit))
        .map(|unit| unit.to_uppercase())
        .unwrap_or_else(|| DEFAULT_UNIT.to_string())
}

fn contains_token(haystack: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    haystack.match_indices(token).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let mut rest = haystack[start + matched.len()..].chars();
        let after = match rest.next() {
            Some('s') => rest.next(),
            other => other,
        };
        !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
    })
}
