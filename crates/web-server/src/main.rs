use analytics::SalesAggregator;
use web_server::AppState;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads settings and the ledger, then hands off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config(None)?;
    let _guard = configuration::init_tracing(&config.logging)?;

    let records = dataset::load_records(&config.dataset)?;
    let aggregator = SalesAggregator::new(config.aggregation.month_label)
        .with_gap_filling(config.aggregation.fill_month_gaps);

    web_server::run_server(config.server.socket_addr()?, AppState::new(records, aggregator)).await
}
