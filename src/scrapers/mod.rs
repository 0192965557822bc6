//! News source adapters.
//!
//! Every adapter answers the same question, "what is being written about this
//! ticker right now?", from a different place:
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Google News | [`google`] | HTML scraping | Search results; strips `/url?` redirect wrappers |
//! | FinViz | [`finviz`] | HTML scraping | Quote page news table; no summaries |
//! | Yahoo Finance | [`yahoo`] | HTML scraping | Quote news stream |
//! | Benzinga | [`benzinga`] | HTML scraping | Stock page news list |
//! | NewsAPI | [`newsapi`] | JSON API | Requires an API key |
//!
//! # Common Patterns
//!
//! Each adapter:
//! - builds one GET request through the shared [`reqwest::Client`] (browser
//!   user agent, fixed timeout)
//! - parses its markup in a pure `parse_*` function that tests call directly
//! - keeps at most [`MAX_ARTICLES_PER_SOURCE`] entries
//! - never fails: errors are logged and turned into an empty list

pub mod benzinga;
pub mod finviz;
pub mod google;
pub mod newsapi;
pub mod yahoo;

use crate::config::ScanConfig;
use crate::error::NewsError;
use crate::models::Article;
use clap::ValueEnum;
use futures::future::BoxFuture;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};
use url::Url;

pub use benzinga::BenzingaAdapter;
pub use finviz::FinvizAdapter;
pub use google::GoogleNewsAdapter;
pub use newsapi::NewsApiAdapter;
pub use yahoo::YahooFinanceAdapter;

/// Upper bound on entries taken from a single source per call.
pub const MAX_ARTICLES_PER_SOURCE: usize = 5;

/// Capability shared by every news source.
pub trait SourceAdapter: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Fetch up to [`MAX_ARTICLES_PER_SOURCE`] articles about `ticker`.
    ///
    /// Returns an empty list on any failure.
    fn fetch_articles<'a>(
        &'a self,
        ticker: &'a str,
        company_name: &'a str,
    ) -> BoxFuture<'a, Vec<Article>>;
}

/// Identifier of a news source, as written in config files and `--sources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Google,
    Finviz,
    Yahoo,
    Benzinga,
    #[value(name = "newsapi")]
    NewsApi,
}

impl SourceKind {
    /// Scraping sources, most structurally reliable first.
    pub fn default_order() -> Vec<SourceKind> {
        vec![
            SourceKind::Google,
            SourceKind::Finviz,
            SourceKind::Yahoo,
            SourceKind::Benzinga,
        ]
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Google => "google",
            SourceKind::Finviz => "finviz",
            SourceKind::Yahoo => "yahoo",
            SourceKind::Benzinga => "benzinga",
            SourceKind::NewsApi => "newsapi",
        };
        f.write_str(s)
    }
}

/// Build the HTTP client shared by every adapter, the gainer lister and the
/// hosted classifier.
///
/// The configured user agent and request timeout apply to every request made
/// through it, so no outbound call can hang past the timeout.
///
/// # Returns
///
/// The client, or [`NewsError::Http`] if the TLS backend cannot be initialized.
pub fn build_client(config: &ScanConfig) -> Result<reqwest::Client, NewsError> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

/// Instantiate adapters in the configured priority order.
///
/// `newsapi` is dropped with a warning when no key is available.
///
/// # Arguments
///
/// * `config` - Source order and per-source base URLs
/// * `client` - Shared HTTP client, cloned into each adapter
/// * `newsapi_key` - NewsAPI key from the CLI or environment, if any
///
/// # Returns
///
/// Boxed adapters ready to hand to [`crate::aggregator::NewsAggregator`]. May
/// be empty if only `newsapi` was requested and no key was given.
pub fn build_adapters(
    config: &ScanConfig,
    client: &reqwest::Client,
    newsapi_key: Option<&str>,
) -> Vec<Box<dyn SourceAdapter>> {
    let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::with_capacity(config.sources.len());
    for kind in &config.sources {
        match kind {
            SourceKind::Google => adapters.push(Box::new(
                GoogleNewsAdapter::new(client.clone()).with_base_url(&config.google_base_url),
            )),
            SourceKind::Finviz => adapters.push(Box::new(
                FinvizAdapter::new(client.clone()).with_base_url(&config.finviz_base_url),
            )),
            SourceKind::Yahoo => adapters.push(Box::new(
                YahooFinanceAdapter::new(client.clone()).with_base_url(&config.yahoo_base_url),
            )),
            SourceKind::Benzinga => adapters.push(Box::new(
                BenzingaAdapter::new(client.clone()).with_base_url(&config.benzinga_base_url),
            )),
            SourceKind::NewsApi => match newsapi_key {
                Some(key) if !key.trim().is_empty() => adapters.push(Box::new(
                    NewsApiAdapter::new(client.clone(), key)
                        .with_base_url(&config.newsapi_base_url),
                )),
                _ => warn!("newsapi source requested but no NEWSAPI_KEY is set; skipping it"),
            },
        }
    }
    adapters
}

/// GET `url` and return the body, treating non-2xx statuses as errors.
#[instrument(level = "debug", skip(client))]
pub(crate) async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, NewsError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(NewsError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let body = response.text().await?;
    debug!(bytes = body.len(), "Fetched page");
    Ok(body)
}

/// Collapse an adapter result to the never-failing contract, logging failures.
pub(crate) fn articles_or_empty(
    source: &str,
    ticker: &str,
    result: Result<Vec<Article>, NewsError>,
) -> Vec<Article> {
    match result {
        Ok(articles) => {
            debug!(source, ticker, count = articles.len(), "Source returned articles");
            articles
        }
        Err(e) => {
            warn!(source, ticker, error = %e, "Source failed; treating as no articles");
            Vec::new()
        }
    }
}

/// Compile a CSS selector, mapping failures to [`NewsError::Parse`].
pub(crate) fn selector(css: &str) -> Result<Selector, NewsError> {
    Selector::parse(css).map_err(|e| NewsError::Parse(format!("bad selector '{css}': {e}")))
}

/// Element text with runs of whitespace collapsed to single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve `href` against a source's known origin. Absolute links pass through.
pub(crate) fn absolutize(origin: &str, href: &str) -> Option<String> {
    let base = Url::parse(origin).ok()?;
    base.join(href.trim()).ok().map(|u| u.to_string())
}
