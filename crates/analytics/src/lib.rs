//! # Salesboard Analytics
//!
//! This crate turns a ledger of sales records into the views a sales dashboard
//! displays: totals per category, sales per month, per-sub-category monthly series for
//! a selection, and the profit metrics of that selection.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no knowledge of where records come from. It depends only
//!   on `core-types`.
//! - **Stateless calculation:** `SalesAggregator` carries configuration only. The same
//!   input always yields the same output.
//! - **No silent NaN:** values are `Decimal`, and a profit margin over zero sales is an
//!   explicit `AnalyticsError::UndefinedMetric`.
//!
//! ## Public API
//!
//! - `SalesAggregator`: the aggregation and metric operations.
//! - `categories` / `sub_categories`: the choices offered to a selection control.
//! - `fill_month_gaps`: opt-in zero filling of a monthly series.
//! - Result types in `report`, errors in `error`.

pub mod engine;
pub mod error;
pub mod options;
pub mod report;

pub use engine::{SalesAggregator, fill_month_gaps};
pub use error::AnalyticsError;
pub use options::{categories, sub_categories};
pub use report::{
    CategoryTotals, DashboardReport, FieldSums, MonthlySales, SalesMetrics, SalesTotals,
    SubCategoryMonth,
};
