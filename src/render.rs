//! Terminal tables for the aggregated views.

use analytics::{CategoryTotals, MonthlySales, SalesTotals, SubCategoryMonth};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn amount(value: Decimal) -> Cell {
    Cell::new(value.round_dp(2)).set_alignment(CellAlignment::Right)
}

/// Percent with two decimals, or "N/A" when undefined.
pub fn format_margin(margin: Option<Decimal>) -> String {
    match margin {
        Some(m) => format!("{:.2}%", m),
        None => "N/A".to_string(),
    }
}

/// Signed percentage points, or "N/A" when undefined.
pub fn format_delta(delta: Option<Decimal>) -> String {
    match delta {
        Some(d) if d.is_sign_negative() && !d.is_zero() => format!("{:.2} pp", d),
        Some(d) => format!("+{:.2} pp", d.abs()),
        None => "N/A".to_string(),
    }
}

pub fn category_table(totals: &CategoryTotals) -> Table {
    let mut table = new_table(vec!["Category", "Sales", "Profit", "Discount"]);
    for (category, sums) in totals {
        table.add_row(vec![
            Cell::new(category),
            amount(sums.sales),
            amount(sums.profit),
            amount(sums.discount),
        ]);
    }
    table
}

pub fn monthly_table(series: &[MonthlySales]) -> Table {
    let mut table = new_table(vec!["Month", "Sales"]);
    for point in series {
        table.add_row(vec![Cell::new(point.month), amount(point.sales)]);
    }
    table
}

pub fn sub_category_table(points: &[SubCategoryMonth]) -> Table {
    let mut table = new_table(vec!["Sub-Category", "Month", "Sales", "Profit", "Discount"]);
    for point in points {
        table.add_row(vec![
            Cell::new(&point.sub_category),
            Cell::new(point.month),
            amount(point.sales),
            amount(point.profit),
            amount(point.discount),
        ]);
    }
    table
}

pub fn metrics_table(
    totals: &SalesTotals,
    margin: Option<Decimal>,
    delta: Option<Decimal>,
) -> Table {
    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total Sales"), amount(totals.total_sales)]);
    table.add_row(vec![Cell::new("Total Profit"), amount(totals.total_profit)]);
    table.add_row(vec![
        Cell::new("Profit Margin"),
        Cell::new(format_margin(margin)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("vs. All Sales"),
        Cell::new(format_delta(delta)).set_alignment(CellAlignment::Right),
    ]);
    table
}
