//! Command-line interface definitions.
//!
//! Every tuning flag is optional and overrides the matching field of the YAML
//! configuration (see [`crate::config::ScanConfig`]). Secrets are only ever
//! read from flags or environment variables.

use crate::aggregator::DedupPolicy;
use crate::outputs::OutputFormat;
use crate::scrapers::SourceKind;
use crate::sentiment::ClassifierKind;
use clap::{Parser, Subcommand};

/// Rank the day's top gaining stocks by the sentiment of their news.
///
/// # Examples
///
/// ```sh
/// # Batch mode over the top 10 gainers
/// gainer_sentiment
///
/// # One ticker, prompting for the symbol on stdin
/// gainer_sentiment ticker
///
/// # Offline scoring, only FinViz and Yahoo, JSON output
/// gainer_sentiment --classifier lexicon --sources finviz,yahoo --format json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Number of top gainers to analyze
    #[arg(short, long, global = true)]
    pub limit: Option<usize>,

    /// Maximum articles scored per ticker
    #[arg(short = 'n', long, global = true)]
    pub max_articles: Option<usize>,

    /// News sources in priority order
    #[arg(long, global = true, value_delimiter = ',')]
    pub sources: Option<Vec<SourceKind>>,

    /// Duplicate-article policy applied across sources
    #[arg(long, global = true)]
    pub dedup: Option<DedupPolicy>,

    /// Sentiment classifier backend
    #[arg(long, global = true)]
    pub classifier: Option<ClassifierKind>,

    /// Report format written to stdout
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// NewsAPI key (enables the `newsapi` source)
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub newsapi_key: Option<String>,

    /// Hugging Face token for the hosted FinBERT classifier
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,
}

/// What to analyze. Omitting the subcommand means [`Command::Gainers`].
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Analyze the current top gainers (default)
    Gainers,
    /// Analyze a single ticker; prompts for the symbol when omitted
    Ticker {
        symbol: Option<String>,

        /// Company name used in search queries (defaults to the symbol)
        #[arg(long)]
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_batch_mode() {
        let cli = Cli::parse_from(["gainer_sentiment"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.limit.is_none());
        assert!(cli.sources.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "gainer_sentiment",
            "--limit",
            "5",
            "-n",
            "4",
            "--sources",
            "finviz,yahoo",
            "--dedup",
            "url",
            "--classifier",
            "lexicon",
            "--format",
            "json",
        ]);

        assert_eq!(cli.limit, Some(5));
        assert_eq!(cli.max_articles, Some(4));
        assert_eq!(
            cli.sources,
            Some(vec![SourceKind::Finviz, SourceKind::Yahoo])
        );
        assert_eq!(cli.dedup, Some(DedupPolicy::Url));
        assert_eq!(cli.classifier, Some(ClassifierKind::Lexicon));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_ticker_subcommand() {
        let cli = Cli::parse_from(["gainer_sentiment", "ticker", "aapl", "--name", "Apple"]);
        assert_eq!(
            cli.command,
            Some(Command::Ticker {
                symbol: Some("aapl".to_string()),
                name: Some("Apple".to_string()),
            })
        );

        let cli = Cli::parse_from(["gainer_sentiment", "ticker"]);
        assert_eq!(
            cli.command,
            Some(Command::Ticker {
                symbol: None,
                name: None
            })
        );
    }
}
