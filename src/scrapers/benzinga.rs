//! Benzinga stock page scraper.
//!
//! Reads the `div.news-right` blocks on `https://www.benzinga.com/stock/<TICKER>`.
//! Headline links are site-relative and are resolved against the Benzinga origin.

use super::{
    MAX_ARTICLES_PER_SOURCE, SourceAdapter, absolutize, articles_or_empty, element_text,
    fetch_page, selector,
};
use crate::error::NewsError;
use crate::models::Article;
use futures::future::{BoxFuture, FutureExt};
use scraper::Html;
use tracing::{info, instrument};

const BENZINGA_ORIGIN: &str = "https://www.benzinga.com";
const SOURCE_LABEL: &str = "Benzinga";

/// News adapter for Benzinga.
#[derive(Debug, Clone)]
pub struct BenzingaAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl BenzingaAdapter {
    /// Create an adapter pointed at the public Benzinga site.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: BENZINGA_ORIGIN.to_string(),
        }
    }

    /// Fetch pages from `base_url` instead; links in the markup are still
    /// resolved against the real site origin.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, ticker: &str) -> Result<Vec<Article>, NewsError> {
        let url = format!(
            "{}/stock/{}",
            self.base_url,
            urlencoding::encode(ticker)
        );
        let html = fetch_page(&self.client, &url).await?;
        let articles = parse_stock_page(&html)?;
        info!(count = articles.len(), "Parsed Benzinga stock page");
        Ok(articles)
    }
}

impl SourceAdapter for BenzingaAdapter {
    fn name(&self) -> &'static str {
        "benzinga"
    }

    fn fetch_articles<'a>(
        &'a self,
        ticker: &'a str,
        _company_name: &'a str,
    ) -> BoxFuture<'a, Vec<Article>> {
        async move { articles_or_empty(self.name(), ticker, self.fetch(ticker).await) }.boxed()
    }
}

/// Extract articles from a Benzinga stock page.
///
/// Each `div.news-right` block contributes one article when it carries a
/// headline link under `div.title`. The optional `div.summary` becomes the
/// description.
///
/// # Arguments
///
/// * `html` - Raw page markup
///
/// # Returns
///
/// Up to [`MAX_ARTICLES_PER_SOURCE`] articles in page order, or
/// [`NewsError::Parse`] if a selector is invalid.
pub fn parse_stock_page(html: &str) -> Result<Vec<Article>, NewsError> {
    let document = Html::parse_document(html);
    let item_selector = selector("div.news-right")?;
    let link_selector = selector("div.title a")?;
    let summary_selector = selector("div.summary")?;

    let mut articles = Vec::new();
    for item in document.select(&item_selector).take(MAX_ARTICLES_PER_SOURCE) {
        let Some(link) = item.select(&link_selector).next() else {
            continue;
        };
        let title = element_text(link);
        if title.is_empty() {
            continue;
        }
        let href = link.value().attr("href").unwrap_or_default();
        let url = absolutize(BENZINGA_ORIGIN, href).unwrap_or_else(|| href.to_string());
        let description = item.select(&summary_selector).next().map(element_text);

        articles.push(Article::new(title, description, url, SOURCE_LABEL));
    }
    Ok(articles)
}
