//! FinViz quote page scraper.
//!
//! Reads the news table of `https://finviz.com/quote.ashx?t=<TICKER>`. Each row
//! is `<td>date/time</td><td><a>headline</a> <span>(publisher)</span></td>`.
//! FinViz shows no summaries, so descriptions repeat the headline.

use super::{
    MAX_ARTICLES_PER_SOURCE, SourceAdapter, absolutize, articles_or_empty, element_text,
    fetch_page, selector,
};
use crate::error::NewsError;
use crate::models::Article;
use futures::future::{BoxFuture, FutureExt};
use scraper::Html;
use tracing::{debug, info, instrument};

const FINVIZ_ORIGIN: &str = "https://finviz.com";
const SOURCE_LABEL: &str = "FinViz";

/// News adapter for FinViz.
#[derive(Debug, Clone)]
pub struct FinvizAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl FinvizAdapter {
    /// Create an adapter pointed at the public FinViz site.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: FINVIZ_ORIGIN.to_string(),
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
            "{}/quote.ashx?t={}",
            self.base_url,
            urlencoding::encode(ticker)
        );
        let html = fetch_page(&self.client, &url).await?;
        let articles = parse_news_table(&html)?;
        info!(count = articles.len(), "Parsed FinViz news table");
        Ok(articles)
    }
}

impl SourceAdapter for FinvizAdapter {
    fn name(&self) -> &'static str {
        "finviz"
    }

    fn fetch_articles<'a>(
        &'a self,
        ticker: &'a str,
        _company_name: &'a str,
    ) -> BoxFuture<'a, Vec<Article>> {
        async move { articles_or_empty(self.name(), ticker, self.fetch(ticker).await) }.boxed()
    }
}

/// Extract articles from the FinViz quote page news table.
///
/// Only the first five rows are considered; rows without a headline link are
/// skipped. A page without a news table yields no articles.
pub fn parse_news_table(html: &str) -> Result<Vec<Article>, NewsError> {
    let document = Html::parse_document(html);
    let table_selector = selector("table.fullview-news-outer, table#news-table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;
    let publisher_selector = selector("span.news-link-right")?;
    let span_selector = selector("span")?;

    let Some(table) = document.select(&table_selector).next() else {
        debug!("No FinViz news table in page");
        return Ok(Vec::new());
    };

    let mut articles = Vec::new();
    for row in table.select(&row_selector).take(MAX_ARTICLES_PER_SOURCE) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            continue;
        }
        let Some(link) = cells[1].select(&link_selector).next() else {
            continue;
        };

        let title = element_text(link);
        if title.is_empty() {
            continue;
        }
        let href = link.value().attr("href").unwrap_or_default();
        let url = absolutize(FINVIZ_ORIGIN, href).unwrap_or_else(|| href.to_string());

        let source = cells[1]
            .select(&publisher_selector)
            .next()
            .or_else(|| cells[1].select(&span_selector).next())
            .map(element_text)
            .map(|s| s.trim_matches(|c: char| c == '(' || c == ')').trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| SOURCE_LABEL.to_string());

        let mut article = Article::new(title, None, url, source);
        if let Some(published) = parse_timestamp(&element_text(cells[0])) {
            article = article.with_published(published);
        }
        articles.push(article);
    }
    Ok(articles)
}

/// FinViz prints `Mon-DD-YY HH:MMAM` on the first row of a day and only
/// `HH:MMAM` below it. A bare time is reported as `Today <time>`.
fn parse_timestamp(cell: &str) -> Option<String> {
    let parts: Vec<&str> = cell.split_whitespace().collect();
    match parts.as_slice() {
        [] => None,
        [time] => Some(format!("Today {time}")),
        [date, time, ..] => Some(format!("{date} {time}")),
    }
}
