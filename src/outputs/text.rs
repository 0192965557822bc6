//! Plain-text rendering.

use crate::models::StockReport;
use crate::utils::truncate_for_log;
use chrono::{DateTime, Local};
use std::fmt::Write;

const RULE_WIDTH: usize = 50;

/// Detail block printed as soon as a ticker has been scored.
///
/// Lists every scored article with its source, publication time when known,
/// description when it differs from the headline, and the verdict.
///
/// # Example Output
///
/// ```text
/// ==================================================
/// Acme Corp (ACME) - Change: +25.00%
/// Found 1 articles with average sentiment: 0.912
///
/// 1. Acme rallies
/// Source: Reuters | Today 09:30AM
/// Sentiment: positive (Score: 0.912)
/// ```
pub fn ticker_detail(report: &StockReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(
        out,
        "{} ({}) - Change: {}",
        report.name, report.ticker, report.change
    );
    let _ = writeln!(
        out,
        "Found {} articles with average sentiment: {:.3}",
        report.article_count, report.avg_sentiment
    );

    for (i, item) in report.scored_articles.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, item.article.title);
        match &item.article.published {
            Some(published) => {
                let _ = writeln!(out, "Source: {} | {}", item.article.source, published);
            }
            None => {
                let _ = writeln!(out, "Source: {}", item.article.source);
            }
        }
        if item.article.description != item.article.title {
            let _ = writeln!(out, "{}", truncate_for_log(&item.article.description, 200));
        }
        let _ = writeln!(
            out,
            "Sentiment: {} (Score: {:.3})",
            item.sentiment.label, item.sentiment.score
        );
    }
    out
}

/// Ranked summary table.
///
/// # Arguments
///
/// * `reports` - Reports already ordered by [`crate::report::rank`]; printed as given
/// * `generated_at` - Timestamp shown under the heading
pub fn summary(reports: &[StockReport], generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out, "\n\n{rule}");
    let _ = writeln!(out, "SENTIMENT ANALYSIS SUMMARY");
    let _ = writeln!(out, "{}", generated_at.format("%Y-%m-%d %H:%M:%S %Z"));
    let _ = writeln!(out, "{rule}");

    if reports.is_empty() {
        let _ = writeln!(out, "No tickers with news to rank.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<4} {:<8} {:>10} {:>7} {:>7} {:>8}  {}",
        "#", "TICKER", "CHANGE", "AVG", "NET", "ARTICLES", "NAME"
    );
    for (i, r) in reports.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<8} {:>10} {:>7.3} {:>7.3} {:>8}  {}",
            i + 1,
            r.ticker,
            r.change,
            r.avg_sentiment,
            r.net_sentiment,
            r.article_count,
            r.name
        );
    }
    out
}
