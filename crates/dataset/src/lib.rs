//! # Salesboard Dataset Crate
//!
//! Loads the sales ledger from a CSV export into memory. This is the only place in
//! the system that touches the file system for data.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** hides the CSV layout (header names, date formats, number parsing)
//!   behind a function returning plain `SalesRecord`s.
//! - **Load once:** the ledger is read in full and handed out as an immutable
//!   collection. Nothing here is written back.
//!
//! ## Public API
//!
//! - `load_records`: reads the file named by `DatasetSettings`.
//! - `read_records`: the same over any `std::io::Read`.
//! - `parse_order_date`: the date parser used for the order date column.
//! - `DatasetError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod reader;

pub use error::DatasetError;
pub use reader::{load_records, parse_order_date, read_records};
