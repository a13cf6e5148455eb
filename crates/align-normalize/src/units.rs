//! Unit-abbreviation <-> spelled-out-unit equivalence table.
//!
//! A dictated "5 km" and a hand-typed "5 kilometers" must compare equal at
//! the token-sequence level once the leading numeral has already matched.

const UNIT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("ft", "feet"),
    ("in", "inches"),
    ("yd", "yards"),
    ("mi", "miles"),
    ("mm", "millimeters"),
    ("cm", "centimeters"),
    ("m", "meters"),
    ("km", "kilometers"),
    ("lb", "pounds"),
    ("lbs", "pounds"),
    ("oz", "ounces"),
    ("kg", "kilograms"),
    ("g", "grams"),
    ("mg", "milligrams"),
    ("sec", "seconds"),
    ("secs", "seconds"),
    ("min", "minutes"),
    ("mins", "minutes"),
    ("hr", "hours"),
    ("hrs", "hours"),
    ("mph", "miles per hour"),
    ("kph", "kilometers per hour"),
    ("gb", "gigabytes"),
    ("mb", "megabytes"),
    ("kb", "kilobytes"),
    ("tb", "terabytes"),
    ("pt", "pints"),
    ("qt", "quarts"),
    ("gal", "gallons"),
    ("tbsp", "tablespoons"),
    ("tsp", "teaspoons"),
];

/// Expands a unit abbreviation into its spelled-out plural form, if known.
pub fn expand(token: &str) -> Option<&'static str> {
    UNIT_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == token)
        .map(|(_, full)| *full)
}

/// True when `a` and `b` are an abbreviation/spelled-out pair of the same
/// unit, in either direction.
pub fn unit_equivalent(a: &str, b: &str) -> bool {
    if let Some(full) = expand(a) {
        if full == b {
            return true;
        }
    }
    if let Some(full) = expand(b) {
        if full == a {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_unit() {
        assert_eq!(expand("km"), Some("kilometers"));
    }

    #[test]
    fn equivalence_is_symmetric() {
        assert!(unit_equivalent("km", "kilometers"));
        assert!(unit_equivalent("kilometers", "km"));
    }

    #[test]
    fn multi_word_expansion_matches() {
        assert!(unit_equivalent("mph", "miles per hour"));
    }

    #[test]
    fn unrelated_not_equivalent() {
        assert!(!unit_equivalent("km", "pounds"));
    }
}
