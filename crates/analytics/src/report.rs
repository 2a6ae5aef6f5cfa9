use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{MonthLabel, SalesRecord, Selection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summed numeric fields of one group of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldSums {
    pub sales: Decimal,
    pub profit: Decimal,
    pub discount: Decimal,
}

impl FieldSums {
    /// Adds one record's fields. Fails without modifying `self` if any sum would
    /// exceed the `Decimal` range.
    pub fn add(&mut self, record: &SalesRecord) -> Result<(), AnalyticsError> {
        let sales = checked_sum(self.sales, record.sales, "sales")?;
        let profit = checked_sum(self.profit, record.profit, "profit")?;
        let discount = checked_sum(self.discount, record.discount, "discount")?;
        *self = Self { sales, profit, discount };
        Ok(())
    }
}

pub(crate) fn checked_sum(
    total: Decimal,
    value: Decimal,
    field: &str,
) -> Result<Decimal, AnalyticsError> {
    total
        .checked_add(value)
        .ok_or_else(|| AnalyticsError::Calculation(format!("sum of {} overflows", field)))
}

/// Category name to summed fields. Keys iterate in lexical order.
pub type CategoryTotals = BTreeMap<String, FieldSums>;

/// Total sales of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    /// Bucket date, labelled by the aggregator's `MonthLabel`.
    pub month: NaiveDate,
    pub sales: Decimal,
}

/// One point of a per-sub-category monthly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategoryMonth {
    pub sub_category: String,
    pub month: NaiveDate,
    pub sales: Decimal,
    pub profit: Decimal,
    pub discount: Decimal,
}

/// Sales and profit totals of a record set. Always defined, even for empty input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesTotals {
    pub total_sales: Decimal,
    pub total_profit: Decimal,
}

impl SalesTotals {
    /// Profit as a percentage of sales.
    ///
    /// Returns `AnalyticsError::UndefinedMetric` when total sales is zero.
    pub fn profit_margin(&self) -> Result<Decimal, AnalyticsError> {
        if self.total_sales.is_zero() {
            return Err(AnalyticsError::UndefinedMetric("profit_margin".to_string()));
        }

        self.total_profit
            .checked_div(self.total_sales)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| {
                AnalyticsError::Calculation(format!(
                    "profit margin overflows for profit {} over sales {}",
                    self.total_profit, self.total_sales
                ))
            })
    }

    pub fn into_metrics(self) -> Result<SalesMetrics, AnalyticsError> {
        let profit_margin = self.profit_margin()?;
        Ok(SalesMetrics {
            total_sales: self.total_sales,
            total_profit: self.total_profit,
            profit_margin,
        })
    }
}

/// The scalar metrics shown for a record set. Only exists when the margin is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesMetrics {
    pub total_sales: Decimal,
    pub total_profit: Decimal,
    /// Percent, e.g. `23.33` for a 23.33% margin.
    pub profit_margin: Decimal,
}

/// Every view of the dashboard for one selection.
///
/// Margins are `None` where they are undefined; a presentation layer renders them as
/// "N/A".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub month_label: MonthLabel,
    pub record_count: usize,
    pub category_totals: CategoryTotals,
    pub monthly_sales: Vec<MonthlySales>,
    pub selection: Selection,
    pub sub_category_monthly: Vec<SubCategoryMonth>,
    pub selection_totals: SalesTotals,
    pub profit_margin: Option<Decimal>,
    pub dataset_profit_margin: Option<Decimal>,
    pub margin_delta: Option<Decimal>,
}
