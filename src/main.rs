//! # Gainer Sentiment
//!
//! Ranks the day's top gaining US stocks by the sentiment of their news.
//!
//! ## Usage
//!
//! ```sh
//! gainer_sentiment                      # top 10 gainers, hosted FinBERT
//! gainer_sentiment ticker NVDA          # a single ticker
//! gainer_sentiment --classifier lexicon # no inference endpoint needed
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Listing**: scrape the market-movers page for the top gainers
//! 2. **Fetching**: for each gainer, try news sources in priority order until
//!    enough articles are collected
//! 3. **Scoring**: classify every article with one shared sentiment model
//! 4. **Output**: print per-ticker details, then the ranked summary
//!
//! Logs go to stderr (`RUST_LOG` controls verbosity); stdout carries only the report.

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use std::io;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod error;
mod gainers;
mod models;
mod outputs;
mod report;
mod scrapers;
mod sentiment;
mod utils;

use aggregator::NewsAggregator;
use cli::{Cli, Command};
use config::ScanConfig;
use gainers::GainerLister;
use models::Gainer;
use outputs::{OutputFormat, json, text};
use report::{ReportDriver, rank};
use sentiment::{ClassifierKind, SentimentScorer};
use utils::resolve_symbol;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("gainer_sentiment starting up");

    let args = Cli::parse();
    debug!(command = ?args.command, format = ?args.format, "Parsed CLI arguments");

    let mut config = ScanConfig::load(args.config.as_deref())?;
    config.apply_cli(&args)?;
    debug!(?config, "Effective configuration");

    // ---- Shared components, built once ----
    let client = scrapers::build_client(&config)?;

    let adapters = scrapers::build_adapters(&config, &client, args.newsapi_key.as_deref());
    if adapters.is_empty() {
        error!(sources = ?config.sources, "None of the configured news sources is usable");
        return Err("no usable news sources".into());
    }
    let aggregator = NewsAggregator::new(adapters, config.source_delay(), config.dedup);
    info!(sources = ?aggregator.source_names(), "News sources ready");

    if config.classifier == ClassifierKind::Finbert && args.hf_token.is_none() {
        warn!("HF_TOKEN is not set; hosted inference requests may be rejected or throttled");
    }
    let scorer = SentimentScorer::new(sentiment::build_model(
        &config,
        &client,
        args.hf_token.as_deref(),
    ));

    // ---- Work list ----
    let gainers = match args.command.clone().unwrap_or(Command::Gainers) {
        Command::Gainers => {
            let lister = GainerLister::new(client.clone(), &config.gainers_url);
            lister.top_gainers(config.gainer_limit).await
        }
        Command::Ticker { symbol, name } => {
            // prompt on stderr: stdout carries only the report
            let symbol =
                resolve_symbol(symbol.as_deref(), &mut io::stdin().lock(), &mut io::stderr())?;
            let Some(symbol) = symbol else {
                error!("No ticker symbol given");
                return Err("no ticker symbol given".into());
            };
            vec![Gainer {
                name: name.unwrap_or_else(|| symbol.clone()),
                ticker: symbol,
                change_percent: "n/a".to_string(),
            }]
        }
    };
    if gainers.is_empty() {
        warn!("Nothing to analyze");
    }

    // ---- Analyze ----
    let driver = ReportDriver::new(&aggregator, &scorer, config.max_articles);
    let format = args.format;
    let reports = driver
        .run(&gainers, |report| {
            if format == OutputFormat::Text {
                print!("{}", text::ticker_detail(report));
            }
        })
        .await;
    let ranked = rank(reports);

    // ---- Output ----
    match format {
        OutputFormat::Text => print!("{}", text::summary(&ranked, Local::now())),
        OutputFormat::Json => {
            let sources = aggregator.source_names();
            let rendered = json::render(&json::RunSummary {
                generated_at: Utc::now(),
                classifier: scorer.model_name(),
                sources: &sources,
                reports: &ranked,
            })?;
            println!("{rendered}");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        gainers = gainers.len(),
        ranked = ranked.len(),
        "Execution complete"
    );

    Ok(())
}
