use crate::pattern::PatternMatcher;
use std::sync::Arc;

/// One decoded line of an ingested book.
///
/// A record is created by the connection handler that received the line, immediately
/// after decoding, and is never mutated afterwards. The pattern test runs exactly once,
/// at creation, and its result is cached in the record. Records are shared by reference:
/// the same `Arc<LineRecord>` is linked into both the [`SharedLog`] and the owning
/// [`BookEntry`].
///
/// [`SharedLog`]: crate::SharedLog
/// [`BookEntry`]: crate::BookEntry
#[derive(Debug)]
pub struct LineRecord {
    text: String,
    matches_pattern: bool,
}

impl LineRecord {
    /// creates a record for `text`, running the pattern test and caching its result
    pub fn classify(text: String, matcher: &PatternMatcher) -> Arc<LineRecord> {
        let matches_pattern = matcher.is_match(&text);
        Arc::new(LineRecord {
            text,
            matches_pattern,
        })
    }

    /// the decoded, sanitized line text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// whether this line contained the configured pattern at creation time
    pub fn matches_pattern(&self) -> bool {
        self.matches_pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_caches_the_match_flag() {
        let matcher = PatternMatcher::new("cat").unwrap();
        let hit = LineRecord::classify("a Cat sat".to_string(), &matcher);
        let miss = LineRecord::classify("no match".to_string(), &matcher);
        assert!(hit.matches_pattern());
        assert!(!miss.matches_pattern());
        assert_eq!(hit.text(), "a Cat sat");
    }
}
