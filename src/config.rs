//! Run configuration.
//!
//! [`ScanConfig`] is read from an optional YAML file and then overridden by
//! whatever the user passed on the command line. Every field has a default,
//! so an empty file (or no file at all) is a valid configuration.
//!
//! ```yaml
//! max_articles: 5
//! sources: [finviz, google, yahoo]
//! dedup: url
//! classifier: lexicon
//! ```

use crate::aggregator::DedupPolicy;
use crate::cli::Cli;
use crate::error::NewsError;
use crate::scrapers::SourceKind;
use crate::sentiment::ClassifierKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Browser-like user agent; several sources refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Tunables for one run.
///
/// Missing YAML keys take their [`Default`] value. Secrets are deliberately
/// absent; see [`crate::cli::Cli`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Sent on every outbound request.
    pub user_agent: String,
    /// Per-request timeout applied to every outbound call.
    pub request_timeout_secs: u64,
    /// Pause between two consecutive source attempts.
    pub source_delay_ms: u64,
    /// Articles scored per ticker.
    pub max_articles: usize,
    /// Rows read from the gainers table.
    pub gainer_limit: usize,
    /// Sources in priority order.
    pub sources: Vec<SourceKind>,
    pub dedup: DedupPolicy,
    pub classifier: ClassifierKind,
    /// Inference endpoint root; the model id is appended as `/models/<id>`.
    pub classifier_endpoint: String,
    pub classifier_model: String,
    /// Origin of each news source; overridable for mirrors and tests.
    pub google_base_url: String,
    pub finviz_base_url: String,
    pub yahoo_base_url: String,
    pub benzinga_base_url: String,
    pub newsapi_base_url: String,
    pub gainers_url: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
            source_delay_ms: 1000,
            max_articles: 3,
            gainer_limit: 10,
            sources: SourceKind::default_order(),
            dedup: DedupPolicy::None,
            classifier: ClassifierKind::Finbert,
            classifier_endpoint: "https://router.huggingface.co/hf-inference".to_string(),
            classifier_model: "ProsusAI/finbert".to_string(),
            google_base_url: "https://www.google.com".to_string(),
            finviz_base_url: "https://finviz.com".to_string(),
            yahoo_base_url: "https://finance.yahoo.com".to_string(),
            benzinga_base_url: "https://www.benzinga.com".to_string(),
            newsapi_base_url: "https://newsapi.org".to_string(),
            gainers_url: "https://www.tradingview.com/markets/stocks-usa/market-movers-gainers/"
                .to_string(),
        }
    }
}

impl ScanConfig {
    /// Load the YAML file at `path`, or the defaults when no path is given.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional path to a YAML config file
    ///
    /// # Returns
    ///
    /// The validated configuration, or [`NewsError::Config`] if the file cannot
    /// be read, does not parse, or fails validation.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, NewsError> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                let config = Self::from_yaml(&raw)?;
                info!(config_path = p, "Loaded configuration");
                Ok(config)
            }
            None => {
                debug!("No config file given; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate YAML text. Blank input yields the defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, NewsError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the file/default values.
    ///
    /// Only flags the user actually passed replace a field; the result is
    /// validated again.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<(), NewsError> {
        if let Some(limit) = cli.limit {
            self.gainer_limit = limit;
        }
        if let Some(n) = cli.max_articles {
            self.max_articles = n;
        }
        if let Some(sources) = &cli.sources {
            self.sources = sources.clone();
        }
        if let Some(dedup) = cli.dedup {
            self.dedup = dedup;
        }
        if let Some(classifier) = cli.classifier {
            self.classifier = classifier;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), NewsError> {
        if self.sources.is_empty() {
            return Err(NewsError::Config("at least one news source is required".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(NewsError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Per-request timeout for the shared HTTP client.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pause between two consecutive adapter calls.
    pub fn source_delay(&self) -> Duration {
        Duration::from_millis(self.source_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.source_delay(), Duration::from_secs(1));
        assert_eq!(config.max_articles, 3);
        assert_eq!(config.gainer_limit, 10);
        assert_eq!(
            config.sources,
            vec![
                SourceKind::Google,
                SourceKind::Finviz,
                SourceKind::Yahoo,
                SourceKind::Benzinga
            ]
        );
        assert_eq!(config.dedup, DedupPolicy::None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ScanConfig::from_yaml("").unwrap(), ScanConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
max_articles: 5
sources: [finviz, newsapi]
dedup: title
classifier: lexicon
"#;
        let config = ScanConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.max_articles, 5);
        assert_eq!(config.sources, vec![SourceKind::Finviz, SourceKind::NewsApi]);
        assert_eq!(config.dedup, DedupPolicy::Title);
        assert_eq!(config.classifier, ClassifierKind::Lexicon);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_yaml_rejects_empty_sources() {
        assert!(ScanConfig::from_yaml("sources: []").is_err());
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = ScanConfig::from_yaml("max_articles: 5\ngainer_limit: 20").unwrap();
        let cli = Cli::parse_from(["gainer_sentiment", "-n", "2", "--sources", "benzinga"]);
        config.apply_cli(&cli).unwrap();

        assert_eq!(config.max_articles, 2);
        assert_eq!(config.gainer_limit, 20);
        assert_eq!(config.sources, vec![SourceKind::Benzinga]);
    }
}
