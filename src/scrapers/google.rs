//! Google News search scraper.
//!
//! Queries `https://www.google.com/search?q=<ticker company stock news>&tbm=nws`
//! and reads the result cards. Result links are usually wrapped in a
//! `/url?...&url=<target>&...` redirect, which is unwrapped to the target.

use super::{
    MAX_ARTICLES_PER_SOURCE, SourceAdapter, absolutize, articles_or_empty, element_text,
    fetch_page, selector,
};
use crate::error::NewsError;
use crate::models::Article;
use futures::future::{BoxFuture, FutureExt};
use scraper::Html;
use tracing::{info, instrument};
use url::Url;

const GOOGLE_ORIGIN: &str = "https://www.google.com";
const SOURCE_LABEL: &str = "Google News";

/// News adapter for Google News.
#[derive(Debug, Clone)]
pub struct GoogleNewsAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleNewsAdapter {
    /// Create an adapter pointed at the public Google News site.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: GOOGLE_ORIGIN.to_string(),
        }
    }

    /// Search on `base_url` instead; redirect links are still unwrapped and
    /// resolved against the real Google origin.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn search_url(&self, ticker: &str, company_name: &str) -> String {
        let query = format!("{ticker} {company_name} stock news");
        format!(
            "{}/search?q={}&tbm=nws",
            self.base_url,
            urlencoding::encode(&query)
        )
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, ticker: &str, company_name: &str) -> Result<Vec<Article>, NewsError> {
        let url = self.search_url(ticker, company_name);
        let html = fetch_page(&self.client, &url).await?;
        let articles = parse_search_results(&html)?;
        info!(count = articles.len(), "Parsed Google News results");
        Ok(articles)
    }
}

impl SourceAdapter for GoogleNewsAdapter {
    fn name(&self) -> &'static str {
        "google"
    }

    fn fetch_articles<'a>(
        &'a self,
        ticker: &'a str,
        company_name: &'a str,
    ) -> BoxFuture<'a, Vec<Article>> {
        async move { articles_or_empty(self.name(), ticker, self.fetch(ticker, company_name).await) }
            .boxed()
    }
}

/// Extract articles from a Google News search results page.
pub fn parse_search_results(html: &str) -> Result<Vec<Article>, NewsError> {
    let document = Html::parse_document(html);
    let card_selector = selector("div.SoaBEf")?;
    let title_selector = selector("div.mCBkyc")?;
    let link_selector = selector("a[href]")?;
    let desc_selector = selector("div.GI74Re")?;

    let mut articles = Vec::new();
    for card in document.select(&card_selector).take(MAX_ARTICLES_PER_SOURCE) {
        let (Some(title_el), Some(link_el)) = (
            card.select(&title_selector).next(),
            card.select(&link_selector).next(),
        ) else {
            continue;
        };

        let title = element_text(title_el);
        if title.is_empty() {
            continue;
        }
        let href = link_el.value().attr("href").unwrap_or_default();
        let url = unwrap_redirect(href);
        let description = card.select(&desc_selector).next().map(element_text);

        articles.push(Article::new(title, description, url, SOURCE_LABEL));
    }
    Ok(articles)
}

/// Unwrap Google's `/url?` redirect links to their target.
///
/// The `url` parameter is preferred, then `q`. Anything else is resolved
/// against the Google origin unchanged.
pub fn unwrap_redirect(href: &str) -> String {
    let href = href.trim();
    if href.starts_with("/url?") {
        let target = Url::parse(GOOGLE_ORIGIN)
            .and_then(|base| base.join(href))
            .ok()
            .and_then(|u| {
                let pairs: Vec<(String, String)> = u.query_pairs().into_owned().collect();
                pairs
                    .iter()
                    .find(|(k, _)| k == "url")
                    .or_else(|| pairs.iter().find(|(k, _)| k == "q"))
                    .map(|(_, v)| v.clone())
            });
        if let Some(target) = target {
            return target;
        }
    }
    absolutize(GOOGLE_ORIGIN, href).unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS_HTML: &str = r#"
<html><body>
  <div class="SoaBEf">
    <a href="/url?esrc=s&amp;url=https://www.reuters.com/acme-surges&amp;ved=abc">
      <div class="mCBkyc">Acme shares surge on record earnings</div>
      <div class="GI74Re">Acme Corp beat expectations for the third quarter.</div>
    </a>
  </div>
  <div class="SoaBEf">
    <a href="https://www.cnbc.com/acme-guidance">
      <div class="mCBkyc">Acme raises full-year guidance</div>
    </a>
  </div>
  <div class="SoaBEf">
    <a href="/url?q=https://example.com/q-style&amp;sa=U">
      <div class="mCBkyc">Analysts weigh in on Acme</div>
    </a>
  </div>
  <div class="SoaBEf"><span>card without a title</span></div>
</body></html>
"#;

    #[test]
    fn test_parse_search_results() {
        let articles = parse_search_results(RESULTS_HTML).unwrap();
        assert_eq!(articles.len(), 3);

        assert_eq!(articles[0].title, "Acme shares surge on record earnings");
        assert_eq!(articles[0].url, "https://www.reuters.com/acme-surges");
        assert_eq!(
            articles[0].description,
            "Acme Corp beat expectations for the third quarter."
        );
        assert_eq!(articles[0].source, "Google News");

        // no description: title is reused
        assert_eq!(articles[1].description, articles[1].title);
        assert_eq!(articles[1].url, "https://www.cnbc.com/acme-guidance");

        assert_eq!(articles[2].url, "https://example.com/q-style");
    }

    #[test]
    fn test_parse_caps_at_five() {
        let card = r#"<div class="SoaBEf"><a href="https://x.test/a"><div class="mCBkyc">T</div></a></div>"#;
        let html = format!("<html><body>{}</body></html>", card.repeat(8));
        assert_eq!(parse_search_results(&html).unwrap().len(), MAX_ARTICLES_PER_SOURCE);
    }

    #[test]
    fn test_parse_unrelated_markup_is_empty() {
        let articles = parse_search_results("<html><body><p>captcha</p></body></html>").unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_unwrap_redirect() {
        assert_eq!(
            unwrap_redirect("/url?sa=t&url=https%3A%2F%2Fnews.example%2Fa%3Fid%3D1&usg=x"),
            "https://news.example/a?id=1"
        );
        assert_eq!(unwrap_redirect("https://direct.example/b"), "https://direct.example/b");
        assert_eq!(unwrap_redirect("/search?q=acme"), "https://www.google.com/search?q=acme");
    }

    #[tokio::test]
    async fn test_fetch_articles_from_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("tbm", "nws"))
            .and(query_param("q", "ACME Acme Corp stock news"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_HTML))
            .mount(&server)
            .await;

        let adapter = GoogleNewsAdapter::new(reqwest::Client::new()).with_base_url(&server.uri());
        let articles = adapter.fetch_articles("ACME", "Acme Corp").await;
        assert_eq!(articles.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_articles_swallows_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let adapter = GoogleNewsAdapter::new(reqwest::Client::new()).with_base_url(&server.uri());
        assert!(adapter.fetch_articles("ACME", "Acme Corp").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_articles_times_out_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(RESULTS_HTML)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let adapter = GoogleNewsAdapter::new(client).with_base_url(&server.uri());
        assert!(adapter.fetch_articles("ACME", "Acme Corp").await.is_empty());
    }
}
