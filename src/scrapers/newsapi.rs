//! NewsAPI `/v2/everything` client.
//!
//! Searches for `"<company> Stock Recent News"`, English only, by relevancy,
//! five results per call. Articles without a description are dropped. The API
//! key is sent as the `apiKey` query parameter; transport errors are stripped
//! of their URL so the key never reaches the logs.

use super::{MAX_ARTICLES_PER_SOURCE, SourceAdapter, articles_or_empty};
use crate::error::NewsError;
use crate::models::Article;
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::fmt;
use tracing::{info, instrument};

const NEWSAPI_BASE_URL: &str = "https://newsapi.org";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    #[serde(default)]
    source: Option<ApiSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSource {
    name: Option<String>,
}

/// News adapter for the NewsAPI search endpoint. Requires an API key.
#[derive(Clone)]
pub struct NewsApiAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for NewsApiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiAdapter")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewsApiAdapter {
    /// Create an adapter for the public NewsAPI host.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `api_key` - NewsAPI key, sent as the `apiKey` query parameter
    pub fn new(client: reqwest::Client, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: NEWSAPI_BASE_URL.to_string(),
        }
    }

    /// Query `base_url` instead of `https://newsapi.org`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, company_name: &str) -> Result<Vec<Article>, NewsError> {
        let query = format!("{company_name} Stock Recent News");
        let url = format!("{}/v2/everything", self.base_url);
        let page_size = MAX_ARTICLES_PER_SOURCE.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NewsError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NewsError::Http(e.without_url()))?;
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let articles = parse_everything(&body)?;
        info!(count = articles.len(), "Parsed NewsAPI results");
        Ok(articles)
    }
}

impl SourceAdapter for NewsApiAdapter {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    fn fetch_articles<'a>(
        &'a self,
        ticker: &'a str,
        company_name: &'a str,
    ) -> BoxFuture<'a, Vec<Article>> {
        async move { articles_or_empty(self.name(), ticker, self.fetch(company_name).await) }
            .boxed()
    }
}

/// Decode an `/v2/everything` response body.
fn parse_everything(body: &str) -> Result<Vec<Article>, NewsError> {
    let response: EverythingResponse = serde_json::from_str(body)?;
    if response.status != "ok" {
        return Err(NewsError::Parse(format!(
            "NewsAPI returned status '{}': {}",
            response.status,
            response.message.unwrap_or_default()
        )));
    }

    let articles = response
        .articles
        .into_iter()
        .filter_map(|a| {
            let description = a.description.filter(|d| !d.trim().is_empty())?;
            let title = a.title.unwrap_or_default();
            let source = a.source.and_then(|s| s.name).unwrap_or_default();
            Some(Article::new(
                title,
                Some(description),
                a.url.unwrap_or_default(),
                source,
            ))
        })
        .take(MAX_ARTICLES_PER_SOURCE)
        .collect();
    Ok(articles)
}
