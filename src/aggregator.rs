//! Priority-ordered news aggregation.
//!
//! [`NewsAggregator`] walks its adapters in order, appending whatever each one
//! returns, until it holds `max_articles` or runs out of adapters. Between two
//! adapter calls it sleeps for a fixed delay; it never sleeps after the last
//! adapter it needed.

use crate::models::Article;
use crate::scrapers::SourceAdapter;
use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// How cross-source duplicates are handled. The first occurrence always wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DedupPolicy {
    /// Keep every article, duplicates included.
    #[default]
    None,
    /// Drop articles whose URL was already seen.
    Url,
    /// Drop articles whose trimmed, lowercased title was already seen.
    Title,
}

impl DedupPolicy {
    fn apply(self, articles: Vec<Article>) -> Vec<Article> {
        match self {
            DedupPolicy::None => articles,
            DedupPolicy::Url => articles.into_iter().unique_by(|a| a.url.clone()).collect(),
            DedupPolicy::Title => articles
                .into_iter()
                .unique_by(|a| a.title.trim().to_lowercase())
                .collect(),
        }
    }
}

/// Ordered set of news sources queried one after another for each ticker.
///
/// The adapter order is the priority order: earlier adapters fill the
/// article budget first, and later ones are only called while it is short.
pub struct NewsAggregator {
    adapters: Vec<Box<dyn SourceAdapter>>,
    delay: Duration,
    dedup: DedupPolicy,
}

impl NewsAggregator {
    /// Create an aggregator.
    ///
    /// # Arguments
    ///
    /// * `adapters` - News sources, highest priority first
    /// * `delay` - Pause inserted before every adapter after the first one tried
    /// * `dedup` - Duplicate policy applied after each adapter's results are appended
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>, delay: Duration, dedup: DedupPolicy) -> Self {
        Self {
            adapters,
            delay,
            dedup,
        }
    }

    /// Adapter names in priority order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Collect up to `max_articles` articles about `ticker`, in adapter-priority order.
    ///
    /// Adapters are called one at a time. As soon as the collected list holds
    /// `max_articles` entries no further adapter is called, and the list is
    /// cut to exactly `max_articles`. With `max_articles == 0` nothing is
    /// fetched at all.
    ///
    /// # Arguments
    ///
    /// * `ticker` - Symbol passed to every adapter
    /// * `company_name` - Company name, used by adapters that search by name
    /// * `max_articles` - Upper bound on the returned list
    ///
    /// # Returns
    ///
    /// At most `max_articles` articles. Possibly empty; adapter failures are
    /// never surfaced here.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_news(
        &self,
        ticker: &str,
        company_name: &str,
        max_articles: usize,
    ) -> Vec<Article> {
        let mut collected: Vec<Article> = Vec::new();
        if max_articles == 0 {
            return collected;
        }

        for (i, adapter) in self.adapters.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                debug!(delay_ms = self.delay.as_millis() as u64, "Pausing before next source");
                sleep(self.delay).await;
            }

            info!(source = adapter.name(), "Trying news source");
            let articles = adapter.fetch_articles(ticker, company_name).await;
            collected.extend(articles);
            collected = self.dedup.apply(collected);

            if collected.len() >= max_articles {
                debug!(source = adapter.name(), "Article target reached; stopping early");
                break;
            }
        }

        collected.truncate(max_articles);
        info!(count = collected.len(), "Aggregated news");
        collected
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Adapter returning a fixed article list and counting its calls.
    pub(crate) struct StubAdapter {
        pub name: &'static str,
        pub articles: Vec<Article>,
        pub calls: Arc<AtomicUsize>,
    }

    impl StubAdapter {
        pub(crate) fn new(name: &'static str, count: usize) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let articles = (0..count)
                .map(|i| {
                    Article::new(
                        format!("{name} headline {i}"),
                        None,
                        format!("https://{name}.test/{i}"),
                        name,
                    )
                })
                .collect();
            (
                Self {
                    name,
                    articles,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl SourceAdapter for StubAdapter {
        fn name(&self) -> &'static str {
            self.name
        }

        fn fetch_articles<'a>(&'a self, _: &'a str, _: &'a str) -> BoxFuture<'a, Vec<Article>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let articles = self.articles.clone();
            async move { articles }.boxed()
        }
    }

    fn aggregator(adapters: Vec<StubAdapter>, dedup: DedupPolicy) -> NewsAggregator {
        let boxed = adapters
            .into_iter()
            .map(|a| Box::new(a) as Box<dyn SourceAdapter>)
            .collect();
        NewsAggregator::new(boxed, Duration::ZERO, dedup)
    }

    #[tokio::test]
    async fn test_fills_from_next_source_and_stops() {
        let (a, a_calls) = StubAdapter::new("a", 2);
        let (b, b_calls) = StubAdapter::new("b", 4);
        let (c, c_calls) = StubAdapter::new("c", 4);
        let agg = aggregator(vec![a, b, c], DedupPolicy::None);

        let articles = agg.fetch_news("ACME", "Acme", 3).await;

        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a headline 0", "a headline 1", "b headline 0"]);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_first_source_sufficient_skips_the_rest() {
        let (a, _) = StubAdapter::new("a", 5);
        let (b, b_calls) = StubAdapter::new("b", 5);
        let agg = aggregator(vec![a, b], DedupPolicy::None);

        let articles = agg.fetch_news("ACME", "Acme", 5).await;
        assert_eq!(articles.len(), 5);
        assert!(articles.iter().all(|a| a.source == "a"));
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_never_exceeds_max_for_any_n() {
        for n in 0..12 {
            let (a, _) = StubAdapter::new("a", 3);
            let (b, _) = StubAdapter::new("b", 0);
            let (c, _) = StubAdapter::new("c", 5);
            let agg = aggregator(vec![a, b, c], DedupPolicy::None);

            let articles = agg.fetch_news("ACME", "Acme", n).await;
            assert_eq!(articles.len(), n.min(8), "n = {n}");
            // priority order: every "a" precedes every "c"
            let first_c = articles.iter().position(|a| a.source == "c");
            let last_a = articles.iter().rposition(|a| a.source == "a");
            if let (Some(c), Some(a)) = (first_c, last_a) {
                assert!(a < c);
            }
        }
    }

    #[tokio::test]
    async fn test_zero_max_calls_nothing() {
        let (a, a_calls) = StubAdapter::new("a", 3);
        let agg = aggregator(vec![a], DedupPolicy::None);
        assert!(agg.fetch_news("ACME", "Acme", 0).await.is_empty());
        assert_eq!(a_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhausts_all_sources_when_short() {
        let (a, a_calls) = StubAdapter::new("a", 1);
        let (b, b_calls) = StubAdapter::new("b", 0);
        let agg = aggregator(vec![a, b], DedupPolicy::None);

        let articles = agg.fetch_news("ACME", "Acme", 5).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicates_kept_by_default() {
        // same name => same URLs and titles
        let (a1, _) = StubAdapter::new("dup", 2);
        let (a2, _) = StubAdapter::new("dup", 2);
        let agg = aggregator(vec![a1, a2], DedupPolicy::None);
        assert_eq!(agg.fetch_news("ACME", "Acme", 4).await.len(), 4);
    }

    #[tokio::test]
    async fn test_url_dedup_keeps_first_occurrence() {
        let (a1, _) = StubAdapter::new("dup", 2);
        let (a2, _) = StubAdapter::new("dup", 2);
        let (b, b_calls) = StubAdapter::new("b", 2);
        let agg = aggregator(vec![a1, a2, b], DedupPolicy::Url);

        let articles = agg.fetch_news("ACME", "Acme", 3).await;
        let urls: Vec<_> = articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://dup.test/0", "https://dup.test/1", "https://b.test/0"]
        );
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_title_dedup_is_case_insensitive() {
        let articles = vec![
            Article::new("Acme Soars", None, "https://a.test/1", "a"),
            Article::new("  acme soars ", None, "https://b.test/1", "b"),
            Article::new("Acme dips", None, "https://b.test/2", "b"),
        ];
        let deduped = DedupPolicy::Title.apply(articles);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].source, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_between_sources() {
        let (a, _) = StubAdapter::new("a", 1);
        let (b, _) = StubAdapter::new("b", 1);
        let (c, _) = StubAdapter::new("c", 1);
        let boxed: Vec<Box<dyn SourceAdapter>> = vec![Box::new(a), Box::new(b), Box::new(c)];
        let agg = NewsAggregator::new(boxed, Duration::from_secs(1), DedupPolicy::None);

        let start = tokio::time::Instant::now();
        let articles = agg.fetch_news("ACME", "Acme", 2).await;
        assert_eq!(articles.len(), 2);
        // a, pause, b, target reached: exactly one pause
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(1) && elapsed < Duration::from_secs(2));
    }
}
