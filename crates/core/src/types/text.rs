//! Fitting free text into fixed-width columns.

/// Result of [`truncate_chars`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    /// The value, at most `max` characters long.
    pub value: String,
    /// Whether characters were dropped.
    pub was_truncated: bool,
}

/// Cut `value` down to at most `max` characters.
///
/// Counts Unicode scalar values rather than bytes, so multi-byte text is never
/// split inside a character and the result fits a `VARCHAR(max)` column.
///
/// ```
/// use hotspots_core::truncate_chars;
///
/// let t = truncate_chars("Salvelinus", 5);
/// assert_eq!(t.value, "Salve");
/// assert!(t.was_truncated);
/// ```
#[must_use]
pub fn truncate_chars(value: &str, max: usize) -> Truncated {
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => Truncated {
            value: value.get(..byte_idx).unwrap_or(value).to_owned(),
            was_truncated: true,
        },
        None => Truncated {
            value: value.to_owned(),
            was_truncated: false,
        },
    }
}

/// Whether `value` fits in a column of `max` characters.
#[must_use]
pub fn fits(value: &str, max: usize) -> bool {
    value.chars().nth(max).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_value_untouched() {
        let t = truncate_chars("Pike", 100);
        assert_eq!(t.value, "Pike");
        assert!(!t.was_truncated);
    }

    #[test]
    fn test_exact_length_untouched() {
        let name = "x".repeat(100);
        let t = truncate_chars(&name, 100);
        assert_eq!(t.value.len(), 100);
        assert!(!t.was_truncated);
    }

    #[test]
    fn test_truncates_to_exact_length() {
        let name = "x".repeat(150);
        let t = truncate_chars(&name, 100);
        assert_eq!(t.value.chars().count(), 100);
        assert!(t.was_truncated);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let name = "ü".repeat(5);
        let t = truncate_chars(&name, 3);
        assert_eq!(t.value, "üüü");
        assert!(fits(&name, 5));
        assert!(!fits(&name, 4));
    }
}
