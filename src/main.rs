use analytics::{AnalyticsError, SalesAggregator, categories, sub_categories};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use core_types::{SalesRecord, Selection};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod render;

/// The main entry point for the Salesboard application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load SALESBOARD__* overrides and RUST_LOG from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        config.dataset.path = path;
    }
    let _log_guard = configuration::init_tracing(&config.logging)?;

    let records = dataset::load_records(&config.dataset)
        .with_context(|| format!("loading sales data from {}", config.dataset.path.display()))?;
    let aggregator = SalesAggregator::new(config.aggregation.month_label)
        .with_gap_filling(config.aggregation.fill_month_gaps);

    // Execute the appropriate command
    match cli.command {
        Commands::Categories => {
            for category in categories(&records) {
                println!("{}", category);
            }
        }
        Commands::SubCategories { category } => {
            let options = sub_categories(&records, &category);
            if options.is_empty() {
                anyhow::bail!("category '{}' does not occur in the data", category);
            }
            for option in options {
                println!("{}", option);
            }
        }
        Commands::ByCategory => {
            let totals = aggregator.aggregate_by_category(&records)?;
            println!("{}", render::category_table(&totals));
        }
        Commands::ByMonth => {
            let series = aggregator.aggregate_by_month(&records)?;
            println!("{}", render::monthly_table(&series));
        }
        Commands::SubCategoryMonthly(args) => {
            let selection = checked_selection(args, &records)?;
            let points = aggregator.aggregate_sub_category_by_month(
                &records,
                &selection.category,
                &selection.sub_categories,
            )?;
            println!("{}", render::sub_category_table(&points));
        }
        Commands::Metrics(args) => handle_metrics(args, &records, &aggregator)?,
        Commands::Report { selection, json } => {
            let selection = checked_selection(selection, &records)?;
            let report = aggregator.build_report(&records, &selection)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::category_table(&report.category_totals));
                println!("{}", render::monthly_table(&report.monthly_sales));
                println!("{}", render::sub_category_table(&report.sub_category_monthly));
                let metrics = render::metrics_table(
                    &report.selection_totals,
                    report.profit_margin,
                    report.margin_delta,
                );
                println!("{}", metrics);
            }
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = config.server.socket_addr()?;
            web_server::run_server(addr, web_server::AppState::new(records, aggregator)).await?;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales dashboard: category, monthly and sub-category views of a sales ledger.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./salesboard.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sales CSV, overriding `dataset.path` from the configuration.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the categories in the data.
    Categories,
    /// List the sub-categories of one category.
    SubCategories {
        #[arg(long)]
        category: String,
    },
    /// Sales, profit and discount totals per category.
    ByCategory,
    /// Total sales per calendar month.
    ByMonth,
    /// Monthly totals for selected sub-categories of a category.
    SubCategoryMonthly(SelectionArgs),
    /// Sales, profit and margin of a selection (or of everything), with the margin
    /// delta against all sales.
    Metrics(MetricsArgs),
    /// Every view for one selection.
    Report {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Print the report as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },
    /// Serve the views as a JSON API.
    Serve {
        /// Overrides `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// The selected category (e.g., "Furniture").
    #[arg(long)]
    category: String,

    /// Selected sub-categories, repeated or comma separated (e.g., "Chairs,Tables").
    #[arg(long = "sub", value_delimiter = ',')]
    sub_categories: Vec<String>,
}

#[derive(Args)]
struct MetricsArgs {
    /// Restrict the metrics to this category. Without it, all records are measured.
    #[arg(long)]
    category: Option<String>,

    #[arg(long = "sub", value_delimiter = ',', requires = "category")]
    sub_categories: Vec<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn checked_selection(args: SelectionArgs, records: &[SalesRecord]) -> anyhow::Result<Selection> {
    let selection = Selection::new(args.category, args.sub_categories);
    selection.validate(records)?;
    if selection.sub_categories.is_empty() {
        tracing::warn!(
            category = %selection.category,
            "No sub-categories selected; the selection is empty."
        );
    }
    Ok(selection)
}

fn handle_metrics(
    args: MetricsArgs,
    records: &[SalesRecord],
    aggregator: &SalesAggregator,
) -> anyhow::Result<()> {
    let whole = aggregator.compute_totals(records)?;
    let subset = match args.category {
        Some(category) => {
            let selection = checked_selection(
                SelectionArgs { category, sub_categories: args.sub_categories },
                records,
            )?;
            aggregator.compute_totals(&selection.filter(records))?
        }
        None => whole,
    };

    let margin = defined(subset.profit_margin())?;
    let delta = defined(aggregator.compute_margin_delta(&subset, &whole))?;
    if margin.is_none() {
        tracing::info!("Selection has no sales; profit margin is undefined.");
    }

    println!("{}", render::metrics_table(&subset, margin, delta));
    Ok(())
}

/// An undefined metric is shown as "N/A"; any other failure aborts the command.
fn defined(result: Result<Decimal, AnalyticsError>) -> anyhow::Result<Option<Decimal>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AnalyticsError::UndefinedMetric(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
