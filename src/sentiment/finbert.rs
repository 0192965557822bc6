//! Hosted FinBERT classifier.
//!
//! Sends `{"inputs": text}` to `<endpoint>/models/<model>` and reduces the
//! returned label distribution to its most likely label. The endpoint answers
//! either `[[{label, score}, ...]]` or `[{label, score}, ...]`.

use super::SentimentModel;
use crate::error::NewsError;
use crate::models::{SentimentLabel, SentimentResult};
use crate::utils::truncate_for_log;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Instant;
use tracing::{instrument, warn};

#[derive(Debug, Deserialize, Serialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassificationResponse::Nested(batches) => {
                batches.into_iter().next().unwrap_or_default()
            }
            ClassificationResponse::Flat(scores) => scores,
        }
    }
}

/// FinBERT served by a hosted inference endpoint.
pub struct HostedFinbert {
    client: reqwest::Client,
    url: String,
    model: String,
    token: Option<String>,
}

impl fmt::Debug for HostedFinbert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedFinbert")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HostedFinbert {
    /// Create a client for `model` on `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `endpoint` - Inference root, e.g. `https://router.huggingface.co/hf-inference`
    /// * `model` - Model id, e.g. `ProsusAI/finbert`
    /// * `token` - Bearer token; blank tokens are ignored
    pub fn new(client: reqwest::Client, endpoint: &str, model: &str, token: Option<&str>) -> Self {
        Self {
            client,
            url: format!("{}/models/{}", endpoint.trim_end_matches('/'), model),
            model: model.to_string(),
            token: token.filter(|t| !t.trim().is_empty()).map(str::to_string),
        }
    }

    #[instrument(level = "debug", skip_all)]
    async fn request(&self, text: &str) -> Result<SentimentResult, NewsError> {
        let t0 = Instant::now();
        let body = json!({
            "inputs": text,
            "options": { "wait_for_model": true }
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                body = %truncate_for_log(&raw, 300),
                "Classifier request failed"
            );
            return Err(NewsError::Classifier(format!(
                "{} returned status {}",
                self.model,
                status.as_u16()
            )));
        }

        parse_classification(&raw)
    }
}

impl SentimentModel for HostedFinbert {
    fn name(&self) -> &str {
        &self.model
    }

    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<SentimentResult, NewsError>> {
        self.request(text).boxed()
    }
}

/// Pick the highest-scoring label from a classification response body.
fn parse_classification(raw: &str) -> Result<SentimentResult, NewsError> {
    let response: ClassificationResponse = serde_json::from_str(raw)?;
    let best = response
        .into_scores()
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| NewsError::Classifier("empty label distribution".to_string()))?;

    let label = best
        .label
        .parse::<SentimentLabel>()
        .map_err(NewsError::Classifier)?;
    Ok(SentimentResult {
        label,
        score: best.score.clamp(0.0, 1.0),
    })
}
