//! Incremental sentiment scoring batch job.
//!
//! Consumes the store's backlog (reviews with no sentiment result under the
//! active model tag), classifies each review with the lexicon analyzer, and
//! persists results in chunked transactions. A review is scored at most once
//! per model tag: the backlog query excludes already-scored rows and the
//! store's uniqueness constraint backstops races.

#![allow(clippy::missing_errors_doc)]

pub mod lexicon;

pub use lexicon::{LexiconAnalyzer, TextScore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{CoreError, CoreResult};
use crate::store::ReviewStore;

/// Polarity at or above this is classified positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Polarity at or below this is classified negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Model tag recorded when the caller doesn't override it.
pub const DEFAULT_MODEL_TAG: &str = "lexicon-v1";

/// Rows per write transaction when the caller doesn't override it.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// Three-way classification derived from polarity via the fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Classify a polarity: positive at `>= 0.05`, negative at `<= -0.05`,
    /// neutral inside the deadband.
    #[must_use]
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if polarity <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification, ready to persist.
#[derive(Debug, Clone)]
pub struct SentimentRecord {
    pub review_id: i64,
    pub model: String,
    pub polarity: f64,
    pub label: SentimentLabel,
    /// Crude proxy: `abs(polarity)`. 0 = no signal, 1 = maximal.
    pub confidence: Option<f64>,
    /// JSON array of lexicon terms that matched, if any.
    pub keywords: Option<serde_json::Value>,
    pub processed_at: DateTime<Utc>,
}

/// Parameters for one scoring run.
#[derive(Debug, Clone)]
pub struct ScoreOptions {
    /// Model tag recorded with each result.
    pub model: String,
    /// Cap on backlog reviews considered; 0 means the entire backlog.
    pub limit: usize,
    /// Rows per write transaction.
    pub chunk_size: usize,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_TAG.to_string(),
            limit: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Counts reported by a scoring run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ScoreOutcome {
    /// Rows written to `sentiment_results`.
    pub scored: usize,
    /// Backlog rows skipped for having no text (they stay in backlog).
    pub skipped: usize,
}

/// Score one review text into a persistable record.
#[must_use]
pub fn score_review(
    analyzer: &LexiconAnalyzer,
    review_id: i64,
    text: &str,
    model: &str,
    processed_at: DateTime<Utc>,
) -> SentimentRecord {
    let TextScore { compound, hits } = analyzer.score(text);
    let keywords = if hits.is_empty() {
        None
    } else {
        Some(serde_json::Value::from(hits))
    };
    SentimentRecord {
        review_id,
        model: model.to_string(),
        polarity: compound,
        label: SentimentLabel::from_polarity(compound),
        confidence: Some(compound.abs()),
        keywords,
        processed_at,
    }
}

/// Run the scorer over the store's backlog.
///
/// Backlog rows are consumed as a cursor-paged sequence ordered by
/// `review_id` ascending; each chunk is written in one transaction, so an
/// interrupted run loses at most one chunk and a subsequent run picks up
/// exactly the rows that were never committed. Rows with null or empty text
/// are skipped without writing anything and remain in backlog.
///
/// An empty backlog is a graceful no-op, not an error.
pub fn score_backlog(
    store: &ReviewStore,
    analyzer: &LexiconAnalyzer,
    opts: &ScoreOptions,
) -> CoreResult<ScoreOutcome> {
    let chunk_size = opts.chunk_size.max(1);
    let mut outcome = ScoreOutcome::default();
    let mut cursor = 0_i64;
    let mut remaining = opts.limit;

    loop {
        let want = if opts.limit == 0 {
            chunk_size
        } else {
            chunk_size.min(remaining)
        };
        if want == 0 {
            break;
        }

        let batch = store
            .fetch_backlog(&opts.model, cursor, Some(want))
            .map_err(CoreError::Internal)?;
        if batch.is_empty() {
            break;
        }
        let fetched = batch.len();
        if let Some(last) = batch.last() {
            cursor = last.review_id;
        }

        let now = Utc::now();
        let records: Vec<SentimentRecord> = batch
            .into_iter()
            .filter_map(|row| match row.review_text {
                Some(text) if !text.trim().is_empty() => Some(score_review(
                    analyzer,
                    row.review_id,
                    &text,
                    &opts.model,
                    now,
                )),
                _ => {
                    debug!(review_id = row.review_id, "skipping review without text");
                    outcome.skipped += 1;
                    None
                }
            })
            .collect();

        if !records.is_empty() {
            store.insert_sentiment_batch(&records)?;
            outcome.scored += records.len();
            debug!(rows = records.len(), cursor, "committed sentiment chunk");
        }

        if opts.limit > 0 {
            remaining -= fetched;
            if remaining == 0 {
                break;
            }
        }
        if fetched < want {
            break;
        }
    }

    info!(
        scored = outcome.scored,
        skipped = outcome.skipped,
        model = %opts.model,
        "sentiment pass complete"
    );
    Ok(outcome)
}
