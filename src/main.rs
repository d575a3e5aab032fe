use portfolio_insights::config::PortfolioConfig;
use portfolio_insights::source::{JsonFileSource, fetch_or_empty};
use portfolio_insights::{AnalyticsRun, AssetSeries, run_analytics};

use anyhow::Result;
use futures::future::join_all;
use log::{error, info};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG not set
    if std::env::var("RUST_LOG").is_err() {
        unsafe { std::env::set_var("RUST_LOG", "info"); }
    }
    env_logger::init();
    info!("Starting Portfolio Insights");

    // Get config file from command line argument or use default
    let args: Vec<String> = env::args().collect();
    let config_file = if args.len() > 1 {
        &args[1]
    } else {
        "config.json"
    };

    info!("Loading configuration from: {}", config_file);
    let config = PortfolioConfig::load_from_file(config_file)?;
    let definition = config.portfolio_definition()?;

    // Fetch every symbol concurrently; alignment waits for all of them
    let source = Arc::new(JsonFileSource::new(&config.data_dir));
    let tasks = definition.symbols().into_iter().map(|symbol| {
        let source = Arc::clone(&source);
        tokio::task::spawn_blocking(move || fetch_or_empty(source.as_ref(), &symbol))
    });

    let mut series: Vec<AssetSeries> = Vec::with_capacity(definition.len());
    for joined in join_all(tasks).await {
        series.push(joined??);
    }

    match run_analytics(&definition, &series) {
        Ok(run) => {
            print_report(&run, config.recent_returns_window);
            Ok(())
        }
        Err(e) => {
            error!("Analytics run failed: {}", e);
            Err(e.into())
        }
    }
}

fn print_report(run: &AnalyticsRun, window: usize) {
    let insights = run.insights(window);

    println!("Portfolio Insights");
    println!("Total Portfolio Value: ${:.2}", insights.latest_total_value);

    println!();
    println!("Daily Returns (last {} days):", insights.recent_returns.len());
    println!("{:<12} {}", "date", insights.return_columns.join("  "));
    for row in &insights.recent_returns {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| match c {
                Some(r) => format!("{:+.4}", r),
                None => "n/a".to_string(),
            })
            .collect();
        println!("{:<12} {}", row.date, cells.join("  "));
    }

    println!();
    match insights.average_volatility.value() {
        Some(v) => println!("Annualized Volatility: {:.2}%", v * 100.0),
        None => println!("Annualized Volatility: {}", insights.average_volatility),
    }

    println!();
    println!("Risk by asset (annualized mean / volatility / sharpe):");
    for asset in &run.report.assets {
        println!(
            "  {:<8} {} / {} / {}",
            asset.symbol,
            asset.stats.annualized_mean_return,
            asset.stats.annualized_volatility,
            asset.stats.sharpe_ratio
        );
    }
    let total = &run.report.portfolio;
    println!(
        "  {:<8} {} / {} / {}",
        "Total", total.annualized_mean_return, total.annualized_volatility, total.sharpe_ratio
    );

    println!();
    println!("Correlation Matrix:");
    let correlation = &run.report.correlation;
    println!("  {:<8} {}", "", correlation.labels().join("  "));
    for (i, label) in correlation.labels().iter().enumerate() {
        let cells: Vec<String> = (0..correlation.len())
            .map(|j| match correlation.get_by_index(i, j).and_then(|s| s.value()) {
                Some(c) => format!("{:+.3}", c),
                None => "n/a".to_string(),
            })
            .collect();
        println!("  {:<8} {}", label, cells.join("  "));
    }

    println!();
    println!("Stocks with the Highest Sharpe Ratios:");
    for rank in &run.recommendation.by_sharpe {
        println!("  {:<8} {}", rank.symbol, rank.sharpe_ratio);
    }

    println!();
    println!("Stocks with Low Correlation to Current Portfolio:");
    for rank in &run.recommendation.by_diversification {
        println!("  {:<8} {:+.4}", rank.symbol, rank.mean_correlation);
    }

    if !run.diagnostics.is_empty() {
        println!();
        println!("Warnings:");
        for diagnostic in &run.diagnostics {
            println!("  {}", diagnostic);
        }
    }
}
