//! Sentiment scoring.
//!
//! A [`SentimentModel`] is any three-class classifier; [`SentimentScorer`]
//! owns exactly one of them for the whole run and guards it against empty
//! input. Two models ship with the crate:
//!
//! - [`finbert::HostedFinbert`]: `ProsusAI/finbert` behind a hosted inference endpoint
//! - [`lexicon::LexiconModel`]: an offline finance keyword lexicon

pub mod finbert;
pub mod lexicon;

use crate::config::ScanConfig;
use crate::error::NewsError;
use crate::models::SentimentResult;
use clap::ValueEnum;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub use finbert::HostedFinbert;
pub use lexicon::LexiconModel;

/// A pretrained positive/negative/neutral text classifier.
///
/// Implementations must be deterministic for a fixed set of weights and safe
/// to share across threads.
pub trait SentimentModel: Send + Sync {
    /// Identifier shown in logs and in the JSON report.
    fn name(&self) -> &str;

    /// Classify non-empty `text`.
    ///
    /// # Returns
    ///
    /// The most likely label with its confidence in `[0.0, 1.0]`, or a
    /// [`NewsError`] when the model cannot answer.
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<SentimentResult, NewsError>>;
}

/// Which [`SentimentModel`] to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Hosted `ProsusAI/finbert` inference
    #[default]
    Finbert,
    /// Offline keyword lexicon
    Lexicon,
}

/// Build the configured model once for the whole process.
///
/// # Arguments
///
/// * `config` - Classifier kind, endpoint and model id
/// * `client` - Shared HTTP client used by the hosted model
/// * `hf_token` - Optional bearer token for the hosted endpoint
///
/// # Returns
///
/// A shareable model handle. Construction itself never fails; a bad endpoint
/// or token surfaces as a [`NewsError::Classifier`] on first use.
pub fn build_model(
    config: &ScanConfig,
    client: &reqwest::Client,
    hf_token: Option<&str>,
) -> Arc<dyn SentimentModel> {
    match config.classifier {
        ClassifierKind::Finbert => Arc::new(HostedFinbert::new(
            client.clone(),
            &config.classifier_endpoint,
            &config.classifier_model,
            hf_token,
        )),
        ClassifierKind::Lexicon => Arc::new(LexiconModel::new()),
    }
}

/// Process-wide scorer. Cloning shares the same model instance.
#[derive(Clone)]
pub struct SentimentScorer {
    model: Arc<dyn SentimentModel>,
}

impl SentimentScorer {
    /// Wrap `model`. Logs the model name once.
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        info!(model = model.name(), "Sentiment model ready");
        Self { model }
    }

    /// Name of the wrapped model.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Classify `text`.
    ///
    /// # Errors
    ///
    /// [`NewsError::EmptyText`] for empty or whitespace-only input (the model is
    /// not called), or whatever the model itself reports.
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    pub async fn score(&self, text: &str) -> Result<SentimentResult, NewsError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(NewsError::EmptyText);
        }
        let result = self.model.classify(text).await?;
        debug!(label = %result.label, score = result.score, "Scored text");
        Ok(result)
    }
}
