use crate::{error::AppError, AppState};
use analytics::{
    categories, sub_categories, CategoryTotals, DashboardReport, MonthlySales, SalesMetrics,
    SubCategoryMonth,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use core_types::{SalesRecord, Selection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}
fn default_page() -> usize { 1 }
fn default_limit() -> usize { 100 }

/// `?category=Furniture&sub=Chairs,Tables`. A missing or empty `sub` selects nothing.
#[derive(Debug, Deserialize)]
pub struct SelectionQuery {
    category: String,
    #[serde(default)]
    sub: String,
}

impl SelectionQuery {
    fn into_selection(self) -> Selection {
        let subs: Vec<&str> = self
            .sub
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        Selection::new(self.category.as_str(), subs)
    }
}

/// Same as `SelectionQuery`, but without a category the whole ledger is measured.
#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    category: Option<String>,
    #[serde(default)]
    sub: String,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: SalesMetrics,
    /// Margin minus the whole ledger's margin, in percentage points.
    pub margin_delta: Decimal,
}

/// Parses and validates a selection against the loaded records.
fn checked_selection(state: &AppState, query: SelectionQuery) -> Result<Selection, AppError> {
    let selection = query.into_selection();
    selection.validate(&state.records)?;
    Ok(selection)
}

/// # GET /api/records
/// One page of the raw ledger, in file order.
pub async fn get_records(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Json<Vec<SalesRecord>> {
    let start = pagination.page.saturating_sub(1).saturating_mul(pagination.limit);
    let page = state
        .records
        .iter()
        .skip(start)
        .take(pagination.limit)
        .cloned()
        .collect();
    Json(page)
}

/// # GET /api/categories
pub async fn get_categories(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(categories(&state.records))
}

/// # GET /api/categories/:category/sub-categories
pub async fn get_sub_categories(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    let options = sub_categories(&state.records, &category);
    if options.is_empty() {
        return Err(AppError::NotFound(format!("Category '{}' not found", category)));
    }
    Ok(Json(options))
}

/// # GET /api/sales/by-category
pub async fn get_sales_by_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoryTotals>, AppError> {
    Ok(Json(state.aggregator.aggregate_by_category(&state.records)?))
}

/// # GET /api/sales/by-month
pub async fn get_sales_by_month(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlySales>>, AppError> {
    Ok(Json(state.aggregator.aggregate_by_month(&state.records)?))
}

/// # GET /api/sales/sub-category-monthly
pub async fn get_sub_category_monthly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Vec<SubCategoryMonth>>, AppError> {
    let selection = checked_selection(&state, query)?;
    let points = state.aggregator.aggregate_sub_category_by_month(
        &state.records,
        &selection.category,
        &selection.sub_categories,
    )?;
    Ok(Json(points))
}

/// # GET /api/metrics
/// Responds 422 when the selected records have no sales.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>, AppError> {
    let aggregator = &state.aggregator;
    let whole = aggregator.compute_totals(&state.records)?;

    let subset = match query.category {
        Some(category) => {
            let query = SelectionQuery { category, sub: query.sub };
            let selection = checked_selection(&state, query)?;
            aggregator.compute_totals(&selection.filter(&state.records))?
        }
        None => whole,
    };

    Ok(Json(MetricsResponse {
        metrics: subset.into_metrics()?,
        margin_delta: aggregator.compute_margin_delta(&subset, &whole)?,
    }))
}

/// # GET /api/dashboard
/// All views for one selection. Undefined margins are `null`.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<DashboardReport>, AppError> {
    let selection = checked_selection(&state, query)?;
    let report = state.aggregator.build_report(&state.records, &selection)?;
    Ok(Json(report))
}
