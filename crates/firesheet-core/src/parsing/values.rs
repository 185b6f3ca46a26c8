use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a quantity cell from a BOQ.
///
/// Handles formats like:
/// - "50" -> Some(50)
/// - "1.5" -> Some(1.5)
/// - "1,000" -> Some(1000) (thousands separator)
/// - "", "-", "N/A", "LS" -> None
pub fn parse_quantity(s: &str) -> Option<Decimal> {
    let s = s.trim();

    if s.is_empty() || s == "-" || s == "—" || s.eq_ignore_ascii_case("n/a") {
        return None;
    }

    let normalized = s.replace(',', "");
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_integer() {
        assert_eq!(parse_quantity("50"), Some(dec!(50)));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(parse_quantity("2.5"), Some(dec!(2.5)));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_quantity("1,000"), Some(dec!(1000)));
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(parse_quantity("  25  "), Some(dec!(25)));
    }

    #[test]
    fn test_placeholders_return_none() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("-"), None);
        assert_eq!(parse_quantity("N/A"), None);
    }

    #[test]
    fn test_text_returns_none() {
        assert_eq!(parse_quantity("LS"), None);
        assert_eq!(parse_quantity("50 nos"), None);
    }
}
