//! Category-based exclusion, a content-policy decision applied before an
//! item enters the pipeline.

use nr_core::text::normalize_category;

/// True when any of the item's categories matches the source's exclusion
/// list. Comparison is case-insensitive and whitespace-trimmed on both
/// sides; an empty exclusion list never excludes.
pub fn should_exclude(categories: &[String], exclude: &[String]) -> bool {
    if exclude.is_empty() || categories.is_empty() {
        return false;
    }
    let excluded: Vec<String> = exclude.iter().map(|c| normalize_category(c)).collect();
    categories
        .iter()
        .map(|c| normalize_category(c))
        .any(|c| excluded.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn excludes_regardless_of_case_and_whitespace() {
        let exclude = strings(&["politics"]);
        assert!(should_exclude(&strings(&["Politics", " POLITICS "]), &exclude));
        assert!(should_exclude(&strings(&["politics"]), &exclude));
    }

    #[test]
    fn includes_non_matching_categories() {
        let exclude = strings(&["politics"]);
        assert!(!should_exclude(&strings(&["sports"]), &exclude));
    }

    #[test]
    fn empty_exclusion_list_never_excludes() {
        assert!(!should_exclude(&strings(&["politics"]), &[]));
    }

    #[test]
    fn item_without_categories_is_kept() {
        assert!(!should_exclude(&[], &strings(&["politics"])));
    }

    #[test]
    fn markup_in_categories_is_ignored() {
        let exclude = strings(&["english"]);
        assert!(should_exclude(&strings(&["<i>English</i>"]), &exclude));
    }
}
