use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open sales file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: unparseable order date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Row {row}: column '{column}' is empty")]
    MissingField { row: usize, column: &'static str },
}
