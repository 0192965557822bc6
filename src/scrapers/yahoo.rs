//! Yahoo Finance quote news scraper.
//!
//! Reads the stream items of `https://finance.yahoo.com/quote/<TICKER>/news`.
//! Yahoo uses atomic CSS class names such as `Fz(14px)`, which are matched
//! with attribute word selectors.

use super::{
    MAX_ARTICLES_PER_SOURCE, SourceAdapter, absolutize, articles_or_empty, element_text,
    fetch_page, selector,
};
use crate::error::NewsError;
use crate::models::Article;
use futures::future::{BoxFuture, FutureExt};
use scraper::Html;
use tracing::{info, instrument};

const YAHOO_ORIGIN: &str = "https://finance.yahoo.com";
const SOURCE_LABEL: &str = "Yahoo Finance";

/// News adapter for Yahoo Finance.
#[derive(Debug, Clone)]
pub struct YahooFinanceAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceAdapter {
    /// Create an adapter pointed at the public Yahoo Finance site.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: YAHOO_ORIGIN.to_string(),
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
            "{}/quote/{}/news",
            self.base_url,
            urlencoding::encode(ticker)
        );
        let html = fetch_page(&self.client, &url).await?;
        let articles = parse_news_stream(&html)?;
        info!(count = articles.len(), "Parsed Yahoo Finance news stream");
        Ok(articles)
    }
}

impl SourceAdapter for YahooFinanceAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch_articles<'a>(
        &'a self,
        ticker: &'a str,
        _company_name: &'a str,
    ) -> BoxFuture<'a, Vec<Article>> {
        async move { articles_or_empty(self.name(), ticker, self.fetch(ticker).await) }.boxed()
    }
}

/// Extract articles from a Yahoo Finance news stream page.
///
/// The publisher is read from the grey byline (`"Reuters · 2 hours ago"`);
/// items without one are labelled "Yahoo Finance".
///
/// # Returns
///
/// Up to [`MAX_ARTICLES_PER_SOURCE`] articles in page order.
pub fn parse_news_stream(html: &str) -> Result<Vec<Article>, NewsError> {
    let document = Html::parse_document(html);
    let item_selector = selector("div.js-stream-content")?;
    let title_selector = selector(r#"a[data-test="title"]"#)?;
    let summary_selector = selector(r#"p[class~="Fz(14px)"]"#)?;
    let publisher_selector = selector(r##"div[class~="C(#959595)"]"##)?;

    let mut articles = Vec::new();
    for item in document.select(&item_selector).take(MAX_ARTICLES_PER_SOURCE) {
        let Some(link) = item.select(&title_selector).next() else {
            continue;
        };
        let title = element_text(link);
        if title.is_empty() {
            continue;
        }
        let href = link.value().attr("href").unwrap_or_default();
        let url = absolutize(YAHOO_ORIGIN, href).unwrap_or_else(|| href.to_string());
        let description = item.select(&summary_selector).next().map(element_text);

        // "Reuters · 2 hours ago"
        let source = item
            .select(&publisher_selector)
            .next()
            .map(element_text)
            .and_then(|s| s.split('·').next().map(|p| p.trim().to_string()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| SOURCE_LABEL.to_string());

        articles.push(Article::new(title, description, url, source));
    }
    Ok(articles)
}
