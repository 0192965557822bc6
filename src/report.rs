//! Per-ticker pipeline and ranking.
//!
//! For each gainer: fetch news → score each article → aggregate into a
//! [`StockReport`]. Gainers with nothing scoreable produce no report at all,
//! so they can never appear in the ranked summary.

use crate::aggregator::NewsAggregator;
use crate::error::NewsError;
use crate::models::{Gainer, ScoredArticle, StockReport};
use crate::sentiment::SentimentScorer;
use tracing::{info, instrument, warn};

/// Drives the fetch → score → aggregate pipeline over a list of gainers.
///
/// Borrows the aggregator and scorer so both are built once per process and
/// shared by every ticker.
pub struct ReportDriver<'a> {
    aggregator: &'a NewsAggregator,
    scorer: &'a SentimentScorer,
    max_articles: usize,
}

impl<'a> ReportDriver<'a> {
    /// Create a driver that scores at most `max_articles` articles per ticker.
    pub fn new(aggregator: &'a NewsAggregator, scorer: &'a SentimentScorer, max_articles: usize) -> Self {
        Self {
            aggregator,
            scorer,
            max_articles,
        }
    }

    /// Run the pipeline for one gainer.
    ///
    /// Articles whose text is empty or whose scoring fails are skipped with a
    /// warning; they never count towards the report.
    ///
    /// # Returns
    ///
    /// The ticker's [`StockReport`], or `None` when no article could be scored.
    #[instrument(level = "info", skip_all, fields(ticker = %gainer.ticker))]
    pub async fn analyze(&self, gainer: &Gainer) -> Option<StockReport> {
        info!(name = %gainer.name, change = %gainer.change_percent, "Processing gainer");
        let articles = self
            .aggregator
            .fetch_news(&gainer.ticker, &gainer.name, self.max_articles)
            .await;

        let mut scored = Vec::with_capacity(articles.len());
        for article in articles {
            if article.description.trim().is_empty() {
                warn!(url = %article.url, "Article has no text to score; skipping");
                continue;
            }
            match self.scorer.score(&article.description).await {
                Ok(sentiment) => scored.push(ScoredArticle { article, sentiment }),
                Err(NewsError::EmptyText) => {
                    warn!(url = %article.url, "Article has no text to score; skipping")
                }
                Err(e) => warn!(url = %article.url, error = %e, "Scoring failed; skipping article"),
            }
        }

        let report = StockReport::from_scored(gainer, scored);
        match &report {
            Some(r) => info!(
                count = r.article_count,
                avg_sentiment = r.avg_sentiment,
                "Scored ticker"
            ),
            None => warn!(name = %gainer.name, "No news found; excluding from summary"),
        }
        report
    }

    /// Process gainers one after another, handing each finished report to
    /// `on_report` as soon as it is ready.
    ///
    /// # Arguments
    ///
    /// * `gainers` - Work list, processed in order
    /// * `on_report` - Called once per produced report, before the next gainer starts
    ///
    /// # Returns
    ///
    /// Reports in processing order, unranked. Gainers without news are absent.
    pub async fn run<F>(&self, gainers: &[Gainer], mut on_report: F) -> Vec<StockReport>
    where
        F: FnMut(&StockReport),
    {
        let mut reports = Vec::with_capacity(gainers.len());
        for gainer in gainers {
            if let Some(report) = self.analyze(gainer).await {
                on_report(&report);
                reports.push(report);
            }
        }
        info!(
            processed = gainers.len(),
            reported = reports.len(),
            "Finished analysis"
        );
        reports
    }
}

/// Order reports by descending average sentiment. Reports without articles
/// are removed rather than sorted last.
///
/// # Arguments
///
/// * `reports` - Reports in processing order
///
/// # Returns
///
/// The same reports, best average sentiment first. Ties keep processing order.
pub fn rank(mut reports: Vec<StockReport>) -> Vec<StockReport> {
    reports.retain(|r| r.article_count > 0);
    reports.sort_by(|a, b| b.avg_sentiment.total_cmp(&a.avg_sentiment));
    reports
}
