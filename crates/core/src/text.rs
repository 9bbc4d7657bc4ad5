//! String helpers used by blocks when rendering catalog data.

/// Capitalise the first letter of every space separated word.
///
/// The rest of each word is lower-cased, so `"BUILDING WIRE"` becomes
/// `"Building Wire"`.
#[must_use]
pub fn title_case(input: &str) -> String {
    input
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numeric coercion for values that arrive as either text or numbers.
///
/// Blank input is zero; anything that does not parse as a float is `None`.
#[must_use]
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("BUILDING WIRE"), "Building Wire");
        assert_eq!(title_case("wire & cable"), "Wire & Cable");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_keeps_repeated_spaces() {
        assert_eq!(title_case("a  b"), "A  B");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("  "), Some(0.0));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("12 feet"), None);
        assert_eq!(parse_number("NaN"), None);
    }
}
