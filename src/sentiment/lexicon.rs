//! Offline finance lexicon classifier.
//!
//! Sums keyword weights over the text, clamps to `[-1.0, 1.0]` and maps the
//! result onto three classes. Far cruder than FinBERT, but needs no network
//! and is fully deterministic.

use super::SentimentModel;
use crate::error::NewsError;
use crate::models::{SentimentLabel, SentimentResult};
use futures::future::{BoxFuture, FutureExt};

/// Keyword weights. Single words match whole normalized words; entries with a
/// space or hyphen match as substrings of the lowercased text.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("surge", 0.4),
    ("surges", 0.4),
    ("soar", 0.5),
    ("soars", 0.5),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("jump", 0.3),
    ("jumps", 0.3),
    ("gain", 0.3),
    ("gains", 0.3),
    ("beat", 0.4),
    ("beats", 0.4),
    ("upgrade", 0.4),
    ("upgraded", 0.4),
    ("outperform", 0.4),
    ("bullish", 0.5),
    ("record", 0.3),
    ("profit", 0.3),
    ("growth", 0.3),
    ("strong", 0.3),
    ("raises", 0.3),
    ("approval", 0.4),
    ("approved", 0.4),
    ("partnership", 0.2),
    ("breakthrough", 0.4),
    ("all-time high", 0.5),
    ("price target raised", 0.4),
    // Negative
    ("plunge", -0.5),
    ("plunges", -0.5),
    ("crash", -0.5),
    ("crashes", -0.5),
    ("slump", -0.4),
    ("slumps", -0.4),
    ("drop", -0.3),
    ("drops", -0.3),
    ("fall", -0.3),
    ("falls", -0.3),
    ("miss", -0.4),
    ("misses", -0.4),
    ("downgrade", -0.4),
    ("downgraded", -0.4),
    ("bearish", -0.5),
    ("loss", -0.3),
    ("losses", -0.3),
    ("lawsuit", -0.4),
    ("fraud", -0.6),
    ("investigation", -0.4),
    ("bankruptcy", -0.7),
    ("recall", -0.5),
    ("weak", -0.3),
    ("cuts", -0.3),
    ("dilution", -0.4),
    ("sell-off", -0.4),
    ("price target cut", -0.4),
];

/// Totals strictly inside `(-NEUTRAL_BAND, NEUTRAL_BAND)` are neutral.
const NEUTRAL_BAND: f64 = 0.1;

/// Keyword-weight classifier over [`LEXICON`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconModel;

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }

    /// Raw lexicon total in `[-1.0, 1.0]`.
    pub fn raw_score(text: &str) -> f64 {
        let lower = text.to_lowercase();
        let words: Vec<String> = lower
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|w| !w.is_empty())
            .collect();

        let mut score = 0.0;
        for &(entry, weight) in LEXICON {
            if entry.contains(' ') || entry.contains('-') {
                if lower.contains(entry) {
                    score += weight;
                }
            } else {
                score += weight * words.iter().filter(|w| w.as_str() == entry).count() as f64;
            }
        }
        score.clamp(-1.0, 1.0)
    }

    /// Map the lexicon total onto a three-class verdict.
    ///
    /// Totals at or beyond `±0.1` are positive or negative with confidence
    /// `0.5 + |total| / 2`; anything closer to zero is neutral with confidence
    /// `1 - |total|`.
    pub fn classify_text(text: &str) -> SentimentResult {
        let raw = Self::raw_score(text);
        if raw >= NEUTRAL_BAND {
            SentimentResult {
                label: SentimentLabel::Positive,
                score: 0.5 + raw / 2.0,
            }
        } else if raw <= -NEUTRAL_BAND {
            SentimentResult {
                label: SentimentLabel::Negative,
                score: 0.5 + raw.abs() / 2.0,
            }
        } else {
            SentimentResult {
                label: SentimentLabel::Neutral,
                score: 1.0 - raw.abs(),
            }
        }
    }
}

impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<SentimentResult, NewsError>> {
        let result = Self::classify_text(text);
        async move { Ok(result) }.boxed()
    }
}
