//! Tag CSV processing.

use std::collections::BTreeSet;

/// Parses a comma-separated tag string into a normalized tag set.
///
/// Each entry is trimmed and inner whitespace runs become `-`, so
/// `"machine learning, rust"` yields `["machine-learning", "rust"]`. Empty
/// entries are dropped and duplicates collapse. Case is preserved.
pub fn parse_tags_csv(csv: &str) -> Vec<String> {
    normalize_tags(csv.split(','))
}

/// Normalizes and deduplicates already-split tag values.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag.as_ref()) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

/// Normalizes one tag value, returning `None` when nothing is left.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.split_whitespace().collect::<Vec<_>>().join("-"))
}

#[cfg(test)]
mod tests {
    use super::{normalize_tags, parse_tags_csv};

    #[test]
    fn empty_input_yields_no_tags() {
        assert!(parse_tags_csv("").is_empty());
        assert!(parse_tags_csv("  ,  , ").is_empty());
    }

    #[test]
    fn spaces_become_dashes_and_entries_are_trimmed() {
        assert_eq!(
            parse_tags_csv(" machine learning ,rust"),
            vec!["machine-learning".to_string(), "rust".to_string()]
        );
    }

    #[test]
    fn duplicates_collapse_but_case_is_kept() {
        assert_eq!(
            normalize_tags(["Go", "go", "Go "]),
            vec!["Go".to_string(), "go".to_string()]
        );
    }
}
