use crate::error::DatasetError;
use chrono::NaiveDate;
use configuration::DatasetSettings;
use core_types::SalesRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// The columns of the sales export this crate reads. Any other column is ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Order_Date", alias = "Order Date")]
    order_date: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Sub_Category", alias = "Sub-Category", alias = "Sub Category")]
    sub_category: String,
    #[serde(rename = "Sales")]
    sales: String,
    #[serde(rename = "Profit")]
    profit: String,
    #[serde(rename = "Discount", default)]
    discount: String,
}

/// Loads every record of the file configured in `settings`.
pub fn load_records(settings: &DatasetSettings) -> Result<Vec<SalesRecord>, DatasetError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&settings.path)
        .map_err(|source| DatasetError::Open {
            path: settings.path.clone(),
            source,
        })?;

    let records = collect_records(reader, &settings.date_formats)?;
    tracing::info!(
        path = %settings.path.display(),
        records = records.len(),
        "Loaded sales records."
    );
    Ok(records)
}

/// Reads records from CSV text with a header row.
pub fn read_records<R: Read>(
    input: R,
    date_formats: &[String],
) -> Result<Vec<SalesRecord>, DatasetError> {
    let reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    collect_records(reader, date_formats)
}

/// Parses an order date with the first matching format.
///
/// A trailing time part (`2024-01-05 00:00:00`, `2024-01-05T10:00`) is ignored when the
/// full text matches no format.
pub fn parse_order_date(raw: &str, date_formats: &[String]) -> Option<NaiveDate> {
    let raw = raw.trim();
    let parse = |text: &str| {
        date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    };

    parse(raw).or_else(|| {
        raw.split_once([' ', 'T'])
            .and_then(|(date_part, _)| parse(date_part))
    })
}

fn collect_records<R: Read>(
    mut reader: csv::Reader<R>,
    date_formats: &[String],
) -> Result<Vec<SalesRecord>, DatasetError> {
    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<RawRow>().enumerate() {
        records.push(into_record(row?, index + 1, date_formats)?);
    }
    Ok(records)
}

/// `row` is the 1-based data row, not counting the header.
fn into_record(
    raw: RawRow,
    row: usize,
    date_formats: &[String],
) -> Result<SalesRecord, DatasetError> {
    let order_date = parse_order_date(&raw.order_date, date_formats).ok_or_else(|| {
        DatasetError::InvalidDate {
            row,
            value: raw.order_date.clone(),
        }
    })?;

    if raw.category.is_empty() {
        return Err(DatasetError::MissingField { row, column: "Category" });
    }
    if raw.sub_category.is_empty() {
        return Err(DatasetError::MissingField { row, column: "Sub_Category" });
    }

    Ok(SalesRecord {
        order_date,
        sales: parse_number(&raw.sales, row, "Sales")?,
        profit: parse_number(&raw.profit, row, "Profit")?,
        // Exports without a discount column count as undiscounted.
        discount: if raw.discount.is_empty() {
            Decimal::ZERO
        } else {
            parse_number(&raw.discount, row, "Discount")?
        },
        category: raw.category,
        sub_category: raw.sub_category,
    })
}

fn parse_number(value: &str, row: usize, column: &'static str) -> Result<Decimal, DatasetError> {
    if value.is_empty() {
        return Err(DatasetError::MissingField { row, column });
    }

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| DatasetError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<String> {
        vec!["%Y-%m-%d".to_string(), "%m/%d/%Y".to_string()]
    }

    #[test]
    fn dates_try_each_format_in_order() {
        let expected = NaiveDate::from_ymd_opt(2017, 11, 8);
        assert_eq!(parse_order_date("2017-11-08", &formats()), expected);
        assert_eq!(parse_order_date("11/8/2017", &formats()), expected);
        assert_eq!(parse_order_date(" 2017-11-08 00:00:00", &formats()), expected);
        assert_eq!(parse_order_date("2017-11-08T13:45:00", &formats()), expected);
        assert_eq!(parse_order_date("8 Nov 2017", &formats()), None);
    }

    #[test]
    fn numbers_accept_plain_and_scientific_notation() {
        assert_eq!(parse_number("261.96", 1, "Sales").unwrap(), Decimal::new(26196, 2));
        assert_eq!(parse_number("-3.8", 1, "Profit").unwrap(), Decimal::new(-38, 1));
        assert_eq!(parse_number("1.5e2", 1, "Sales").unwrap(), Decimal::new(150, 0));
        assert!(matches!(
            parse_number("n/a", 7, "Sales"),
            Err(DatasetError::InvalidNumber { row: 7, column: "Sales", .. })
        ));
    }
}
