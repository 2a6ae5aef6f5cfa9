use core_types::SalesRecord;
use std::collections::HashSet;

/// Distinct categories in the order they first appear.
pub fn categories(records: &[SalesRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.category.as_str()))
}

/// Distinct sub-categories of `category` in the order they first appear.
/// Empty when the category does not occur.
pub fn sub_categories(records: &[SalesRecord], category: &str) -> Vec<String> {
    distinct(
        records
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.sub_category.as_str()),
    )
}

fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}
