use chrono::NaiveDate;
use configuration::DatasetSettings;
use dataset::{DatasetError, load_records, read_records};
use rust_decimal_macros::dec;
use std::io::Write;

const SUPERSTORE_SAMPLE: &str = "\
Row_ID,Order_ID,Order_Date,Ship_Date,Customer_Name,Segment,Category,Sub_Category,Product_Name,Sales,Quantity,Discount,Profit
1,CA-2016-152156,11/8/2016,11/11/2016,Claire Gute,Consumer,Furniture,Bookcases,Bush Somerset Collection Bookcase,261.96,2,0,41.9136
2,CA-2016-152156,11/8/2016,11/11/2016,Claire Gute,Consumer,Furniture,Chairs,\"Hon Deluxe Fabric Upholstered Stacking Chairs, Rounded Back\",731.94,3,0,219.582
3,CA-2016-138688,6/12/2016,6/16/2016,Darrin Van Huff,Corporate,Office Supplies,Labels,Self-Adhesive Address Labels,14.62,2,0,6.8714
4,US-2015-108966,10/11/2015,10/18/2015,Sean O'Donnell,Consumer,Furniture,Tables,Bretford CR4500 Series Slim Rectangular Table,957.5775,5,0.45,-383.031
";

fn settings_for(file: &tempfile::NamedTempFile) -> DatasetSettings {
    DatasetSettings {
        path: file.path().to_path_buf(),
        ..DatasetSettings::default()
    }
}

#[test]
fn loads_superstore_export_ignoring_extra_columns() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SUPERSTORE_SAMPLE.as_bytes()).unwrap();

    let records = load_records(&settings_for(&file)).unwrap();

    assert_eq!(records.len(), 4);
    let chairs = &records[1];
    assert_eq!(chairs.order_date, NaiveDate::from_ymd_opt(2016, 11, 8).unwrap());
    assert_eq!(chairs.category, "Furniture");
    assert_eq!(chairs.sub_category, "Chairs");
    assert_eq!(chairs.sales, dec!(731.94));
    assert_eq!(chairs.profit, dec!(219.582));
    assert_eq!(records[3].discount, dec!(0.45));
    assert_eq!(records[3].profit, dec!(-383.031));
}

#[test]
fn accepts_spaced_headers_and_missing_discount() {
    let csv =
        "Order Date,Category,Sub-Category,Sales,Profit\n2024-02-01,Technology,Phones,99.5,12\n";
    let records = read_records(csv.as_bytes(), &DatasetSettings::default().date_formats).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sub_category, "Phones");
    assert_eq!(records[0].discount, dec!(0));
}

#[test]
fn empty_file_with_header_has_no_records() {
    let csv = "Order_Date,Category,Sub_Category,Sales,Profit,Discount\n";
    let records = read_records(csv.as_bytes(), &DatasetSettings::default().date_formats).unwrap();
    assert!(records.is_empty());
}

#[test]
fn bad_date_reports_its_row() {
    let csv = "Order_Date,Category,Sub_Category,Sales,Profit,Discount\n\
               2024-01-01,Furniture,Chairs,1,1,0\n\
               yesterday,Furniture,Chairs,1,1,0\n";
    let err = read_records(csv.as_bytes(), &DatasetSettings::default().date_formats).unwrap_err();

    assert!(matches!(err, DatasetError::InvalidDate { row: 2, ref value } if value == "yesterday"));
}

#[test]
fn blank_category_is_rejected() {
    let csv = "Order_Date,Category,Sub_Category,Sales,Profit,Discount\n2024-01-01,,Chairs,1,1,0\n";
    let err = read_records(csv.as_bytes(), &DatasetSettings::default().date_formats).unwrap_err();

    assert!(matches!(err, DatasetError::MissingField { row: 1, column: "Category" }));
}

#[test]
fn missing_required_column_is_a_csv_error() {
    let csv = "Order_Date,Category,Sales,Profit\n2024-01-01,Furniture,1,1\n";
    let err = read_records(csv.as_bytes(), &DatasetSettings::default().date_formats).unwrap_err();

    assert!(matches!(err, DatasetError::Csv(_)));
}

#[test]
fn missing_file_names_the_path() {
    let settings = DatasetSettings {
        path: "/no/such/dir/sales.csv".into(),
        ..DatasetSettings::default()
    };

    let err = load_records(&settings).unwrap_err();
    assert!(matches!(err, DatasetError::Open { .. }));
    assert!(err.to_string().contains("/no/such/dir/sales.csv"));
}
