use crate::{BookwormError, Result};

/// The configured search pattern, prepared for case-insensitive matching.
///
/// A line matches when the lowercase form of its text contains the lowercase form
/// of the pattern as a contiguous substring. The pattern is lowered once, here,
/// so the per-line test only lowers the line itself.
#[derive(Debug)]
pub struct PatternMatcher {
    /// the pattern exactly as configured, used when printing reports
    original: String,
    /// the lowercase form used for matching
    lowered: String,
}

impl PatternMatcher {
    /// builds a matcher for `pattern`
    ///
    /// # Errors
    /// returns [`BookwormError::Parsing`] if `pattern` is empty
    pub fn new(pattern: &str) -> Result<PatternMatcher> {
        if pattern.is_empty() {
            return Err(BookwormError::Parsing(
                "the search pattern must not be empty".to_string(),
            ));
        }
        Ok(PatternMatcher {
            original: pattern.to_string(),
            lowered: pattern.to_lowercase(),
        })
    }

    /// tests `text` for a case-insensitive occurrence of the pattern
    pub fn is_match(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.lowered)
    }

    /// the pattern as it was configured, original case preserved
    pub fn pattern(&self) -> &str {
        &self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_substring() {
        let matcher = PatternMatcher::new("cat").unwrap();
        assert!(matcher.is_match("a cat sat"));
        assert!(!matcher.is_match("a dog sat"));
    }

    #[test]
    fn matching_ignores_case_on_both_sides() {
        let matcher = PatternMatcher::new("CaT").unwrap();
        assert!(matcher.is_match("a Cat sat"));
        assert!(matcher.is_match("CATALOG"));
        assert!(matcher.is_match("bobcat"));
        assert!(!matcher.is_match("c a t"));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(PatternMatcher::new("").is_err());
    }

    #[test]
    fn original_case_is_kept_for_reports() {
        let matcher = PatternMatcher::new("CaT").unwrap();
        assert_eq!(matcher.pattern(), "CaT");
    }
}
