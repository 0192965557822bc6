//! Top gainers from the TradingView US market-movers page.
//!
//! Each table row must carry both a change cell and a company-name cell to be
//! kept. When the ticker link is missing the symbol is guessed from the name
//! (see [`infer_ticker`]); that guess is best-effort only.

use crate::error::NewsError;
use crate::models::Gainer;
use crate::scrapers::{element_text, fetch_page, selector};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::{debug, error, info, instrument};

static PAREN_TICKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([A-Z]+)\)").expect("valid ticker regex"));

/// Reads the current top gainers from a market-movers page.
#[derive(Debug, Clone)]
pub struct GainerLister {
    client: reqwest::Client,
    url: String,
}

impl GainerLister {
    /// Create a lister for the page at `url`.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client; its timeout bounds the page fetch
    /// * `url` - Market-movers page address
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Up to `limit` gainers in page order. Any failure is logged and yields
    /// an empty list.
    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    pub async fn top_gainers(&self, limit: usize) -> Vec<Gainer> {
        match self.try_top_gainers(limit).await {
            Ok(gainers) => {
                info!(count = gainers.len(), "Fetched top gainers");
                gainers
            }
            Err(e) => {
                error!(error = %e, "Could not fetch top gainers");
                Vec::new()
            }
        }
    }

    async fn try_top_gainers(&self, limit: usize) -> Result<Vec<Gainer>, NewsError> {
        let html = fetch_page(&self.client, &self.url).await?;
        parse_gainers(&html, limit)
    }
}

/// Parse the first `limit` rows of the market-movers table.
///
/// Rows lacking a change cell or a company-name cell are dropped after the
/// `limit` cut, so the result can be shorter than `limit`.
///
/// # Arguments
///
/// * `html` - Raw page markup
/// * `limit` - Number of table rows to consider
///
/// # Returns
///
/// Gainers in page order, or [`NewsError::Parse`] if a selector is invalid.
pub fn parse_gainers(html: &str, limit: usize) -> Result<Vec<Gainer>, NewsError> {
    let document = Html::parse_document(html);
    let row_selector = selector("tr.row-RdUXZpkv.listRow")?;
    let change_selector = selector("td.cell-RLhfr_y4.right-RLhfr_y4")?;
    let name_selector = selector("sup.apply-common-tooltip.tickerDescription-GrtoTeat")?;
    let ticker_selector = selector("a.apply-common-tooltip.tickerName-GrtoTeat")?;

    let mut gainers = Vec::new();
    for (i, row) in document.select(&row_selector).take(limit).enumerate() {
        let (Some(change_cell), Some(name_cell)) = (
            row.select(&change_selector).next(),
            row.select(&name_selector).next(),
        ) else {
            debug!(row = i, "Skipping row without change or name cell");
            continue;
        };

        let name = element_text(name_cell);
        let change_percent = element_text(change_cell);
        let ticker = row
            .select(&ticker_selector)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| infer_ticker(&name));

        gainers.push(Gainer {
            ticker,
            name,
            change_percent,
        });
    }
    Ok(gainers)
}

/// Guess a ticker symbol from a company name.
///
/// Tried in order:
/// 1. an uppercase token in parentheses: `"Acme Corp (ACME)"` → `ACME`
/// 2. for multi-word names, initials of the capitalized words, at most four:
///    `"Global Widget Holdings Inc"` → `GWHI`
/// 3. the first four characters, uppercased, punctuation included:
///    `"X-Ray"` → `X-RA`
///
/// A multi-word name without a single capitalized word falls through to step
/// 3 rather than producing an empty symbol; trailing whitespace is dropped
/// from the truncated result.
///
/// Often wrong for real listings; treat the result as a search hint.
///
/// # Arguments
///
/// * `name` - Company name as displayed in the gainers table
///
/// # Returns
///
/// A best-effort symbol; empty only when `name` is blank.
pub fn infer_ticker(name: &str) -> String {
    if let Some(caps) = PAREN_TICKER.captures(name) {
        return caps[1].to_string();
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() >= 2 {
        let initials: String = words
            .iter()
            .filter_map(|w| w.chars().next())
            .filter(|c| c.is_uppercase())
            .take(4)
            .collect();
        if !initials.is_empty() {
            return initials;
        }
    }

    let prefix: String = name.trim().chars().take(4).collect();
    prefix.trim_end().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::scrapers::build_client;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row(ticker: Option<&str>, name: Option<&str>, change: Option<&str>) -> String {
        let ticker = ticker
            .map(|t| format!(r#"<a class="apply-common-tooltip tickerName-GrtoTeat">{t}</a>"#))
            .unwrap_or_default();
        let name = name
            .map(|n| format!(r#"<sup class="apply-common-tooltip tickerDescription-GrtoTeat">{n}</sup>"#))
            .unwrap_or_default();
        let change = change
            .map(|c| format!(r#"<td class="cell-RLhfr_y4 right-RLhfr_y4">{c}</td>"#))
            .unwrap_or_default();
        format!(
            r#"<tr class="row-RdUXZpkv listRow"><td class="cell-RLhfr_y4 left-RLhfr_y4">{ticker}{name}</td>{change}</tr>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table><tbody>{}</tbody></table></body></html>",
            rows.concat()
        )
    }

    #[test]
    fn test_rows_missing_cells_are_dropped() {
        let rows = vec![
            row(Some("AAA"), Some("Alpha Inc"), Some("+50.1%")),
            row(Some("BBB"), Some("Beta Corp"), Some("+40.2%")),
            row(Some("CCC"), None, Some("+30.3%")),
            row(Some("DDD"), Some("Delta Ltd"), Some("+20.4%")),
            row(Some("EEE"), Some("Echo plc"), None),
        ];
        let gainers = parse_gainers(&page(&rows[..4]), 10).unwrap();
        assert_eq!(gainers.len(), 3);
        let tickers: Vec<_> = gainers.iter().map(|g| g.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAA", "BBB", "DDD"]);

        let gainers = parse_gainers(&page(&rows), 10).unwrap();
        assert_eq!(gainers.len(), 3);
        assert_eq!(gainers[2].change_percent, "+20.4%");
    }

    #[test]
    fn test_limit_applies_to_rows() {
        let rows: Vec<_> = (0..6)
            .map(|i| row(Some(&format!("T{i}")), Some("Name Co"), Some("+1%")))
            .collect();
        assert_eq!(parse_gainers(&page(&rows), 4).unwrap().len(), 4);
        assert!(parse_gainers(&page(&rows), 0).unwrap().is_empty());
    }

    #[test]
    fn test_missing_ticker_is_inferred() {
        let rows = vec![row(None, Some("Quantum Leap Robotics Inc"), Some("+88%"))];
        let gainers = parse_gainers(&page(&rows), 10).unwrap();
        assert_eq!(gainers[0].ticker, "QLRI");
        assert_eq!(gainers[0].name, "Quantum Leap Robotics Inc");
    }

    #[test]
    fn test_infer_ticker_fallback_order() {
        assert_eq!(infer_ticker("Acme Corp (ACME)"), "ACME");
        assert_eq!(infer_ticker("Global Widget Holdings Inc Class A"), "GWHI");
        assert_eq!(infer_ticker("Bio and Pharma"), "BP");
        assert_eq!(infer_ticker("nvidia"), "NVID");
        assert_eq!(infer_ticker("xo"), "XO");
        // no capitalized word: falls through to truncation
        assert_eq!(infer_ticker("the big co"), "THE");
    }

    #[test]
    fn test_infer_ticker_truncation_keeps_punctuation() {
        assert_eq!(infer_ticker("X-Ray"), "X-RA");
        assert_eq!(infer_ticker("a.b.c"), "A.B.");
        assert_eq!(infer_ticker("  e.l.f."), "E.L.");
        assert_eq!(infer_ticker(""), "");
    }

    #[tokio::test]
    async fn test_shared_client_timeout_applies_to_gainers_page() {
        let server = MockServer::start().await;
        let body = page(&[row(Some("ACME"), Some("Acme Corp"), Some("+12.5%"))]);
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ScanConfig {
            request_timeout_secs: 1,
            ..ScanConfig::default()
        };
        let client = build_client(&config).unwrap();
        let lister = GainerLister::new(client, &server.uri());

        let start = std::time::Instant::now();
        assert!(lister.top_gainers(10).await.is_empty());
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_network_failure_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let lister = GainerLister::new(reqwest::Client::new(), &server.uri());
        assert!(lister.top_gainers(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetches_from_page() {
        let server = MockServer::start().await;
        let body = page(&[row(Some("ACME"), Some("Acme Corp"), Some("+12.5%"))]);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let lister = GainerLister::new(reqwest::Client::new(), &server.uri());
        let gainers = lister.top_gainers(10).await;
        assert_eq!(
            gainers,
            vec![Gainer {
                ticker: "ACME".to_string(),
                name: "Acme Corp".to_string(),
                change_percent: "+12.5%".to_string(),
            }]
        );
    }
}
