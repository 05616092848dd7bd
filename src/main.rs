use anyhow::Context;
use api_client::HyperliquidClient;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use configuration::logging::init_tracing;
use configuration::{load_config, Settings, SettingsOverrides};
use core_types::CorrelationReport;
use engine::{CorrelationOutcome, CorrelationPipeline, PipelineConfig, ReportSource};
use result_cache::{FileStore, ResultCache, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;

/// The main entry point for the hypercorr correlation tool.
#[tokio::main]
async fn main() {
    // Load optional environment overrides from a .env file
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Cross-asset correlation of Hyperliquid perpetuals, ranked by volume.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults to ./config.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: SettingsOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute (or load from cache) the correlation matrix and print it.
    Correlate(CorrelateArgs),
    /// Manage the stored correlation result.
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Parser)]
struct CorrelateArgs {
    /// Ignore a fresh cached result and recompute.
    #[arg(long)]
    refresh: bool,

    /// How many of the strongest pairwise correlations to list.
    #[arg(long, default_value_t = 20)]
    top: usize,
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Delete the stored correlation result.
    Clear,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    settings
        .apply_overrides(&cli.overrides)
        .context("Invalid command-line override")?;

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_tracing(&settings.logging).context("Failed to initialize logging")?;
    tracing::debug!(?settings, "Configuration loaded.");

    match cli.command {
        Commands::Correlate(args) => handle_correlate(args, &settings).await,
        Commands::Cache(CacheCommand::Clear) => handle_cache_clear(&settings),
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn build_cache(settings: &Settings) -> anyhow::Result<Option<ResultCache>> {
    if !settings.cache.enabled {
        return Ok(None);
    }
    let store = FileStore::new(&settings.cache.directory).with_context(|| {
        format!(
            "Failed to open cache directory {}",
            settings.cache.directory.display()
        )
    })?;
    Ok(Some(ResultCache::new(
        Arc::new(store),
        Arc::new(SystemClock),
        settings.cache.key.clone(),
        settings.cache.ttl,
    )))
}

async fn handle_correlate(args: CorrelateArgs, settings: &Settings) -> anyhow::Result<()> {
    let client = HyperliquidClient::new(&settings.api).context("Failed to build HTTP client")?;
    let config = PipelineConfig::from_settings(settings);
    let mut pipeline = CorrelationPipeline::new(Arc::new(client), config);
    if let Some(cache) = build_cache(settings)? {
        pipeline = pipeline.with_cache(cache);
    }

    let outcome = if args.refresh {
        pipeline.refresh().await
    } else {
        pipeline.run().await
    };

    match outcome {
        CorrelationOutcome::Ready { report, source } => {
            match source {
                ReportSource::Cache { cached_at } => {
                    let stamp = DateTime::<Utc>::from_timestamp_millis(cached_at)
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| cached_at.to_string());
                    println!("Loaded cached result from {stamp}.");
                }
                ReportSource::Computed => println!("Computed a fresh correlation matrix."),
            }
            println!("{}", ranking_table(&report));
            println!("{}", pairs_table(&report, args.top));
            Ok(())
        }
        CorrelationOutcome::NoSurvivors => {
            println!("No asset had enough price history to correlate.");
            Ok(())
        }
        CorrelationOutcome::Unavailable(e) => Err(e).context("Correlation cycle failed"),
    }
}

fn handle_cache_clear(settings: &Settings) -> anyhow::Result<()> {
    let store = FileStore::new(&settings.cache.directory)?;
    let cache = ResultCache::new(
        Arc::new(store),
        Arc::new(SystemClock),
        settings.cache.key.clone(),
        settings.cache.ttl,
    );
    cache.clear().context("Failed to clear the result cache")?;
    println!("Cleared cache slot '{}'.", cache.key());
    Ok(())
}

// ==============================================================================
// Rendering
// ==============================================================================

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn ranking_table(report: &CorrelationReport) -> Table {
    let mut table = new_table(vec!["#", "Asset", "Open Interest", "Mark Price"]);
    for (rank, asset) in report.sorted_assets.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(&asset.name),
            Cell::new(asset.open_interest).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", asset.current_price)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// The `top` distinct pairs with the largest absolute correlation.
fn top_pairs(report: &CorrelationReport, top: usize) -> Vec<(&str, &str, f64)> {
    let names: Vec<&str> = report.sorted_assets.iter().map(|a| a.name.as_str()).collect();
    let mut pairs = Vec::new();
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            if let Some(corr) = report.matrix.get(a, b).and_then(|cell| cell.value()) {
                pairs.push((*a, *b, corr));
            }
        }
    }
    pairs.sort_by(|x, y| y.2.abs().total_cmp(&x.2.abs()));
    pairs.truncate(top);
    pairs
}

fn pairs_table(report: &CorrelationReport, top: usize) -> Table {
    let mut table = new_table(vec!["Asset A", "Asset B", "Correlation (%)"]);
    for (a, b, corr) in top_pairs(report, top) {
        table.add_row(vec![
            Cell::new(a),
            Cell::new(b),
            Cell::new(format!("{corr:+.2}")).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
