//! Data models shared by the scrapers, the scorer and the report driver.
//!
//! - [`Article`]: a raw headline as scraped from one news source
//! - [`SentimentResult`]: one classifier verdict
//! - [`ScoredArticle`]: an article paired with its verdict
//! - [`Gainer`]: one row of the market-movers table
//! - [`StockReport`]: everything gathered for a single ticker in one run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raw news article as scraped from a source.
///
/// `description` always holds text: sources without a summary copy the title
/// into it. Duplicates across sources are kept unless the aggregator is
/// configured with a dedup policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Publisher or source label (e.g. "Google News", "Reuters").
    pub source: String,
    /// Free-form publication timestamp when the source exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

impl Article {
    /// Build an article, substituting `title` when `description` is missing or blank.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let description = description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| title.clone());
        Self {
            title,
            description,
            url: url.into(),
            source: source.into(),
            published: None,
        }
    }

    /// Attach the publication timestamp shown by the source.
    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.published = Some(published.into());
        self
    }
}

/// Three-class sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Sign applied to the confidence when computing net sentiment.
    pub fn polarity(self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Negative => -1.0,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Ok(SentimentLabel::Positive),
            "negative" | "neg" => Ok(SentimentLabel::Negative),
            "neutral" | "neu" => Ok(SentimentLabel::Neutral),
            other => Err(format!("unknown sentiment label '{other}'")),
        }
    }
}

/// A single classifier verdict. `score` is the model's confidence in `label`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
}

/// An [`Article`] together with the verdict for its description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub article: Article,
    pub sentiment: SentimentResult,
}

/// One row of the market-movers table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gainer {
    /// Symbol from the page, or inferred from `name` when the page omits it.
    pub ticker: String,
    pub name: String,
    /// Change as displayed on the page, e.g. `"+41.27%"`.
    pub change_percent: String,
}

/// Per-ticker result of one run.
///
/// Only constructible from a non-empty set of scored articles, so
/// `avg_sentiment` is always a real mean and `article_count` always matches
/// `scored_articles.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReport {
    pub ticker: String,
    pub name: String,
    pub change: String,
    /// Mean classifier confidence over all scored articles, whatever the label.
    pub avg_sentiment: f64,
    /// Mean of confidence signed by label polarity, in `[-1.0, 1.0]`.
    pub net_sentiment: f64,
    pub article_count: usize,
    pub scored_articles: Vec<ScoredArticle>,
}

impl StockReport {
    /// Aggregate scored articles for `gainer`.
    ///
    /// # Arguments
    ///
    /// * `gainer` - Ticker, name and change copied into the report
    /// * `scored_articles` - Every article that was successfully scored
    ///
    /// # Returns
    ///
    /// `None` when `scored_articles` is empty, so no report ever carries an
    /// average over zero articles.
    pub fn from_scored(gainer: &Gainer, scored_articles: Vec<ScoredArticle>) -> Option<Self> {
        if scored_articles.is_empty() {
            return None;
        }
        let n = scored_articles.len() as f64;
        let avg_sentiment = scored_articles
            .iter()
            .map(|s| s.sentiment.score)
            .sum::<f64>()
            / n;
        let net_sentiment = scored_articles
            .iter()
            .map(|s| s.sentiment.label.polarity() * s.sentiment.score)
            .sum::<f64>()
            / n;

        Some(Self {
            ticker: gainer.ticker.clone(),
            name: gainer.name.clone(),
            change: gainer.change_percent.clone(),
            avg_sentiment,
            net_sentiment,
            article_count: scored_articles.len(),
            scored_articles,
        })
    }
}
