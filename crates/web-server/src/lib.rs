use analytics::SalesAggregator;
use axum::{routing::get, Router};
use core_types::SalesRecord;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// The records are a snapshot taken at start-up and never mutated, so handlers read
/// them concurrently without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    pub records: Arc<[SalesRecord]>,
    pub aggregator: SalesAggregator,
}

impl AppState {
    pub fn new(records: Vec<SalesRecord>, aggregator: SalesAggregator) -> Self {
        Self {
            records: records.into(),
            aggregator,
        }
    }
}

/// Builds the API router over `state`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/records", get(handlers::get_records))
        .route("/api/categories", get(handlers::get_categories))
        .route("/api/categories/:category/sub-categories", get(handlers::get_sub_categories))
        .route("/api/sales/by-category", get(handlers::get_sales_by_category))
        .route("/api/sales/by-month", get(handlers::get_sales_by_month))
        .route("/api/sales/sub-category-monthly", get(handlers::get_sub_category_monthly))
        .route("/api/metrics", get(handlers::get_metrics))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves the API on `addr` until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let records = state.records.len();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, records, "Web server listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
