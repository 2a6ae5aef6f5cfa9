use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which day of a calendar month is used as the nominal date of a monthly bucket.
///
/// Every date inside the same year and month collapses to the same bucket either way;
/// the label only decides what date the bucket is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLabel {
    /// First day of the month.
    Start,
    /// Last day of the month.
    #[default]
    End,
}

impl MonthLabel {
    /// Returns the bucket date of the month containing `date`.
    pub fn bucket(&self, date: NaiveDate) -> NaiveDate {
        let start = first_of_month(date);
        match self {
            MonthLabel::Start => start,
            MonthLabel::End => start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Returns the bucket date of the month following the month containing `date`,
    /// or `None` past the last representable month.
    pub fn next_bucket(&self, date: NaiveDate) -> Option<NaiveDate> {
        first_of_month(date)
            .checked_add_months(Months::new(1))
            .map(|next| self.bucket(next))
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthLabel::Start => write!(f, "start"),
            MonthLabel::End => write!(f, "end"),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_label_uses_last_day_of_month() {
        assert_eq!(MonthLabel::End.bucket(ymd(2024, 2, 10)), ymd(2024, 2, 29));
        assert_eq!(MonthLabel::End.bucket(ymd(2023, 2, 1)), ymd(2023, 2, 28));
        assert_eq!(MonthLabel::End.bucket(ymd(2023, 12, 31)), ymd(2023, 12, 31));
    }

    #[test]
    fn start_label_uses_first_day_of_month() {
        assert_eq!(MonthLabel::Start.bucket(ymd(2024, 2, 10)), ymd(2024, 2, 1));
        assert_eq!(MonthLabel::Start.bucket(ymd(2024, 1, 1)), ymd(2024, 1, 1));
    }

    #[test]
    fn dates_in_the_same_month_share_a_bucket() {
        for label in [MonthLabel::Start, MonthLabel::End] {
            assert_eq!(label.bucket(ymd(2022, 7, 1)), label.bucket(ymd(2022, 7, 31)));
            assert_ne!(label.bucket(ymd(2022, 7, 31)), label.bucket(ymd(2022, 8, 1)));
        }
    }

    #[test]
    fn next_bucket_crosses_year_boundary() {
        assert_eq!(MonthLabel::End.next_bucket(ymd(2023, 12, 31)), Some(ymd(2024, 1, 31)));
        assert_eq!(MonthLabel::Start.next_bucket(ymd(2023, 12, 1)), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn label_deserializes_from_lowercase() {
        let label: MonthLabel = serde_json::from_str("\"start\"").unwrap();
        assert_eq!(label, MonthLabel::Start);
        assert_eq!(MonthLabel::default(), MonthLabel::End);
    }
}
