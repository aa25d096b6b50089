//! Typed error types for the revlens-core service layer.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the revlens-core service layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sentiment result already exists for this review under this model tag.
    #[error("Review {review_id} already has a sentiment result for model '{model}'")]
    DuplicateSentiment { review_id: i64, model: String },

    /// An ingestion record could not be used.
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// Seeding was requested but the products table is empty.
    #[error("No products found. Load products before seeding reviews.")]
    NoProducts,

    /// An internal storage or database error.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
