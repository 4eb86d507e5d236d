//! Plain-text cleanup shared by every stage that touches raw feed or page
//! text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAGS: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s\s+").unwrap();
}

/// Strips markup (titles often carry `<b>` or `<img>` tags) and collapses
/// runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let stripped = TAGS.replace_all(text, "");
    SPACES.replace_all(&stripped, " ").trim().to_string()
}

/// Category names are compared case-insensitively and trimmed.
pub fn normalize_category(category: &str) -> String {
    clean_text(category).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags() {
        assert_eq!(clean_text("<b>Hi</b>"), "Hi");
        assert_eq!(clean_text("a <img src=\"x.png\"> b"), "a b");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_text("a  b\n\n  c"), "a b c");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn normalizes_categories() {
        assert_eq!(normalize_category(" POLITICS "), "politics");
        assert_eq!(normalize_category("<i>Sports</i>"), "sports");
    }
}
