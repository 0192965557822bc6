//! JSON rendering of a finished run.

use crate::models::StockReport;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Serializable view of a finished run. Borrows everything from the caller.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub generated_at: DateTime<Utc>,
    /// Name of the sentiment model that scored the articles.
    pub classifier: &'a str,
    /// News sources in priority order.
    pub sources: &'a [&'static str],
    /// Ranked, best average sentiment first.
    pub reports: &'a [StockReport],
}

/// Render a [`RunSummary`] as a pretty-printed JSON document.
///
/// # Arguments
///
/// * `summary` - The run to serialize
///
/// # Returns
///
/// The JSON text, or a [`serde_json::Error`] if serialization fails.
///
/// # Example Output
///
/// ```json
/// {
///   "generated_at": "2026-10-19T14:30:00Z",
///   "classifier": "ProsusAI/finbert",
///   "sources": ["google", "finviz", "yahoo", "benzinga"],
///   "reports": [
///     { "ticker": "ACME", "avg_sentiment": 0.87, "article_count": 3, ... }
///   ]
/// }
/// ```
pub fn render(summary: &RunSummary<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
