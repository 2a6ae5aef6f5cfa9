use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single line of the sales ledger. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub order_date: NaiveDate,
    pub category: String,
    /// Always belongs to exactly one `category`.
    pub sub_category: String,
    pub sales: Decimal,
    pub profit: Decimal,
    pub discount: Decimal,
}

impl SalesRecord {
    pub fn new(
        order_date: NaiveDate,
        category: impl Into<String>,
        sub_category: impl Into<String>,
        sales: Decimal,
        profit: Decimal,
        discount: Decimal,
    ) -> Self {
        Self {
            order_date,
            category: category.into(),
            sub_category: sub_category.into(),
            sales,
            profit,
            discount,
        }
    }
}

/// A category together with the sub-categories picked inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub category: String,
    pub sub_categories: BTreeSet<String>,
}

impl Selection {
    pub fn new<I, S>(category: impl Into<String>, sub_categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category: category.into(),
            sub_categories: sub_categories.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the record falls inside this selection.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        record.category == self.category && self.sub_categories.contains(&record.sub_category)
    }

    /// Returns the selected subset of `records`, preserving input order.
    pub fn filter(&self, records: &[SalesRecord]) -> Vec<SalesRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// Checks the selection against a record set.
    ///
    /// The category must occur in `records`, and every selected sub-category must
    /// occur under that category. An empty sub-category set is valid.
    pub fn validate(&self, records: &[SalesRecord]) -> Result<(), CoreError> {
        let known: BTreeSet<&str> = records
            .iter()
            .filter(|r| r.category == self.category)
            .map(|r| r.sub_category.as_str())
            .collect();

        if known.is_empty() {
            return Err(CoreError::InvalidSelection(format!(
                "unknown category '{}'",
                self.category
            )));
        }

        let unknown: Vec<&str> = self
            .sub_categories
            .iter()
            .map(String::as_str)
            .filter(|s| !known.contains(s))
            .collect();

        if !unknown.is_empty() {
            return Err(CoreError::InvalidSelection(format!(
                "sub-categories not in category '{}': {}",
                self.category,
                unknown.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(category: &str, sub_category: &str) -> SalesRecord {
        SalesRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            category,
            sub_category,
            dec!(10),
            dec!(2),
            dec!(0),
        )
    }

    fn ledger() -> Vec<SalesRecord> {
        vec![
            record("Furniture", "Chairs"),
            record("Furniture", "Tables"),
            record("Technology", "Phones"),
            record("Furniture", "Chairs"),
        ]
    }

    #[test]
    fn filter_keeps_only_selected_sub_categories() {
        let selection = Selection::new("Furniture", ["Chairs"]);
        let picked = selection.filter(&ledger());
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|r| r.sub_category == "Chairs"));
    }

    #[test]
    fn sub_category_must_match_its_category() {
        // Same label under a different category is not a match.
        let selection = Selection::new("Technology", ["Chairs"]);
        assert!(selection.filter(&ledger()).is_empty());
    }

    #[test]
    fn validate_accepts_consistent_selection() {
        assert!(Selection::new("Furniture", ["Chairs", "Tables"]).validate(&ledger()).is_ok());
        assert!(Selection::new("Furniture", Vec::<String>::new()).validate(&ledger()).is_ok());
    }

    #[test]
    fn validate_rejects_unknown_category() {
        let err = Selection::new("Office Supplies", ["Paper"]).validate(&ledger()).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidSelection("unknown category 'Office Supplies'".to_string())
        );
    }

    #[test]
    fn validate_rejects_foreign_sub_category() {
        let selection = Selection::new("Furniture", ["Chairs", "Phones"]);
        let err = selection.validate(&ledger()).unwrap_err();
        assert!(err.to_string().contains("Phones"));
        assert!(!err.to_string().contains("Chairs"));
    }
}
