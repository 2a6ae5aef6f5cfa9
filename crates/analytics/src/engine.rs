use crate::error::AnalyticsError;
use crate::report::{
    checked_sum, CategoryTotals, DashboardReport, FieldSums, MonthlySales, SalesMetrics,
    SalesTotals, SubCategoryMonth,
};
use chrono::NaiveDate;
use core_types::{MonthLabel, SalesRecord, Selection};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// A stateless calculator for the dashboard's aggregated views and metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesAggregator {
    month_label: MonthLabel,
    fill_month_gaps: bool,
}

impl SalesAggregator {
    pub fn new(month_label: MonthLabel) -> Self {
        Self {
            month_label,
            fill_month_gaps: false,
        }
    }

    /// Makes `build_report` zero-fill months without records. The individual
    /// aggregation methods never fill gaps.
    pub fn with_gap_filling(mut self, enabled: bool) -> Self {
        self.fill_month_gaps = enabled;
        self
    }

    /// Sums sales, profit and discount per category.
    ///
    /// Returns `AnalyticsError::Calculation` if a sum exceeds the `Decimal` range.
    pub fn aggregate_by_category(
        &self,
        records: &[SalesRecord],
    ) -> Result<CategoryTotals, AnalyticsError> {
        let mut totals = CategoryTotals::new();
        for record in records {
            totals.entry(record.category.clone()).or_default().add(record)?;
        }

        tracing::debug!(
            records = records.len(),
            groups = totals.len(),
            "Aggregated sales by category."
        );
        Ok(totals)
    }

    /// Sums sales per calendar month, oldest month first.
    ///
    /// Months without records are absent from the output. Use `fill_month_gaps` for a
    /// continuous series.
    pub fn aggregate_by_month(
        &self,
        records: &[SalesRecord],
    ) -> Result<Vec<MonthlySales>, AnalyticsError> {
        let mut buckets: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for record in records {
            let sales = buckets.entry(self.month_label.bucket(record.order_date)).or_default();
            *sales = checked_sum(*sales, record.sales, "sales")?;
        }

        tracing::debug!(
            records = records.len(),
            months = buckets.len(),
            "Aggregated sales by month."
        );
        Ok(buckets
            .into_iter()
            .map(|(month, sales)| MonthlySales { month, sales })
            .collect())
    }

    /// Monthly sums for the chosen sub-categories of one category.
    ///
    /// The output is ordered by sub-category name (lexical), then chronologically, so
    /// every series is contiguous and time-ordered. An unknown `category` or an empty
    /// `sub_categories` set yields an empty result.
    ///
    /// Callers are expected to pass sub-categories that belong to `category`; labels
    /// from other categories simply match nothing.
    pub fn aggregate_sub_category_by_month(
        &self,
        records: &[SalesRecord],
        category: &str,
        sub_categories: &BTreeSet<String>,
    ) -> Result<Vec<SubCategoryMonth>, AnalyticsError> {
        if sub_categories.is_empty() {
            return Ok(Vec::new());
        }

        let mut groups: BTreeMap<(&str, NaiveDate), FieldSums> = BTreeMap::new();
        for record in records
            .iter()
            .filter(|r| r.category == category && sub_categories.contains(&r.sub_category))
        {
            let month = self.month_label.bucket(record.order_date);
            groups.entry((record.sub_category.as_str(), month)).or_default().add(record)?;
        }

        tracing::debug!(category, points = groups.len(), "Aggregated sub-categories by month.");
        Ok(groups
            .into_iter()
            .map(|((sub_category, month), sums)| SubCategoryMonth {
                sub_category: sub_category.to_string(),
                month,
                sales: sums.sales,
                profit: sums.profit,
                discount: sums.discount,
            })
            .collect())
    }

    /// Total sales and profit. Zero for empty input.
    ///
    /// Returns `AnalyticsError::Calculation` if a total exceeds the `Decimal` range.
    pub fn compute_totals(&self, records: &[SalesRecord]) -> Result<SalesTotals, AnalyticsError> {
        records.iter().try_fold(SalesTotals::default(), |totals, r| {
            Ok(SalesTotals {
                total_sales: checked_sum(totals.total_sales, r.sales, "sales")?,
                total_profit: checked_sum(totals.total_profit, r.profit, "profit")?,
            })
        })
    }

    /// Totals plus profit margin.
    ///
    /// Returns `AnalyticsError::UndefinedMetric` when total sales is zero, including for
    /// an empty record set.
    pub fn compute_metrics(
        &self,
        records: &[SalesRecord],
    ) -> Result<SalesMetrics, AnalyticsError> {
        self.compute_totals(records)?.into_metrics()
    }

    /// Margin of `subset` minus margin of `whole`, in percentage points.
    pub fn compute_margin_delta(
        &self,
        subset: &SalesTotals,
        whole: &SalesTotals,
    ) -> Result<Decimal, AnalyticsError> {
        let subset_margin = subset.profit_margin()?;
        let whole_margin = whole.profit_margin()?;
        subset_margin
            .checked_sub(whole_margin)
            .ok_or_else(|| AnalyticsError::Calculation("margin delta overflows".to_string()))
    }

    /// Builds every dashboard view for `selection`.
    ///
    /// Undefined margins become `None`; any other calculation error is returned.
    pub fn build_report(
        &self,
        records: &[SalesRecord],
        selection: &Selection,
    ) -> Result<DashboardReport, AnalyticsError> {
        let mut monthly_sales = self.aggregate_by_month(records)?;
        if self.fill_month_gaps {
            monthly_sales = fill_month_gaps(&monthly_sales, self.month_label);
        }

        let selected = selection.filter(records);
        let selection_totals = self.compute_totals(&selected)?;
        let dataset_totals = self.compute_totals(records)?;
        let margin_delta = self.compute_margin_delta(&selection_totals, &dataset_totals);

        let report = DashboardReport {
            month_label: self.month_label,
            record_count: records.len(),
            category_totals: self.aggregate_by_category(records)?,
            monthly_sales,
            sub_category_monthly: self.aggregate_sub_category_by_month(
                records,
                &selection.category,
                &selection.sub_categories,
            )?,
            selection: selection.clone(),
            selection_totals,
            profit_margin: defined(selection_totals.profit_margin())?,
            dataset_profit_margin: defined(dataset_totals.profit_margin())?,
            margin_delta: defined(margin_delta)?,
        };

        tracing::debug!(
            category = %selection.category,
            selected = selected.len(),
            "Built dashboard report."
        );
        Ok(report)
    }
}

/// Inserts a zero-sales entry for every month missing between the first and last
/// entry of `series`. The series must be chronological and labelled with `label`.
pub fn fill_month_gaps(series: &[MonthlySales], label: MonthLabel) -> Vec<MonthlySales> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Vec::new();
    };

    let known: BTreeMap<NaiveDate, Decimal> = series.iter().map(|m| (m.month, m.sales)).collect();
    let mut filled = Vec::with_capacity(series.len());
    let mut month = Some(first.month);
    while let Some(current) = month.filter(|m| *m <= last.month) {
        filled.push(MonthlySales {
            month: current,
            sales: known.get(&current).copied().unwrap_or_default(),
        });
        month = label.next_bucket(current);
    }
    filled
}

fn defined(result: Result<Decimal, AnalyticsError>) -> Result<Option<Decimal>, AnalyticsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AnalyticsError::UndefinedMetric(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
