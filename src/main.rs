// Strikeout prop slate runner entry point.
//
// Run sequence:
// 1. Initialize tracing (log to stderr; stdout carries the report)
// 2. Load config
// 3. Load season stat exports and build the providers
// 4. Fetch the day's probable starters
// 5. Score the slate
// 6. Print the report and export the full slate CSV

use strikeout_props::config;
use strikeout_props::engine;
use strikeout_props::export;
use strikeout_props::providers::lines_csv::CsvLineProvider;
use strikeout_props::providers::mlb_api::MlbApiClient;
use strikeout_props::providers::stats_csv::CsvStatsProvider;

use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("strikeout props runner starting up");

    // Slate date: first CLI argument, defaulting to today.
    let date = match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("invalid slate date '{}', expected YYYY-MM-DD", arg))?,
        None => chrono::Local::now().date_naive(),
    };

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: alpha={}, beta={}, gamma={}",
        config.projection.alpha, config.projection.beta, config.projection.gamma
    );

    // 3. Load season stat exports and build the providers
    let stats = CsvStatsProvider::from_paths(
        date.year(),
        Path::new(&config.data.pitcher_stats),
        Path::new(&config.data.batter_stats),
    )
    .context("failed to load season stat exports")?;

    let schedule = MlbApiClient::new(config.api.base_url.clone());
    let lines = CsvLineProvider::new(&config.data.betting_lines);

    // 4. Fetch the day's probable starters
    let starts = schedule
        .probable_starts(date)
        .await
        .context("failed to fetch the day's schedule")?;
    if starts.is_empty() {
        println!("No probable starters listed for {}.", date);
        return Ok(());
    }
    info!("{} probable starters listed for {}", starts.len(), date);

    // 5. Score the slate
    let params = config.projection.model_params();
    let report = engine::run_slate(&starts, &stats, &schedule, &lines, &params, date)
        .await
        .context("slate run failed")?;

    // 6. Print the report and export the full slate CSV
    let bets = export::filter_bets(&report.rows, &export::FilterThresholds::default(), None);
    let summary = export::summarize_bets(&bets);
    print!("{}", export::render_report(&report, &bets, &summary));

    if report.is_empty() {
        warn!("no starts scored for {}; skipping the CSV export", date);
        return Ok(());
    }

    let path = export::export_csv(&report, Path::new(&config.data.export_dir))
        .context("failed to write the slate CSV")?;
    println!("\nFull slate written to {}", path.display());

    Ok(())
}

/// Initialize tracing to stderr. Stdout is reserved for the printed report
/// so it can be piped or redirected cleanly.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("strikeout_props=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
