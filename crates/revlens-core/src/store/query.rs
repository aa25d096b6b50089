//! Read queries over the review store.
//!
//! Provides the scorer's backlog feed plus the aggregate and listing
//! projections served to clients. All result types implement Serialize
//! for text/JSON output.

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use super::ReviewStore;

/// Label reported for reviews that have no sentiment result yet.
pub const UNSCORED_LABEL: &str = "unscored";

// ============================================================================
// Query Result Types
// ============================================================================

/// Summary of a product for list views.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub product_id: i64,
    pub title: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub review_count: i64,
}

/// Per-product aggregate over reviews and sentiment results.
///
/// Unscored reviews count toward `total_reviews` and `avg_rating` but are
/// excluded from the sentiment aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct ProductMetrics {
    pub product_id: i64,
    pub title: String,
    pub total_reviews: i64,
    pub avg_rating: Option<f64>,
    pub avg_sentiment_score: Option<f64>,
    pub positive_count: i64,
    pub neutral_count: i64,
    pub negative_count: i64,
}

/// A review with its sentiment resolved under one model tag.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithSentiment {
    pub review_id: i64,
    pub product_id: i64,
    pub user_hash: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<i64>,
    pub review_date: Option<String>,
    /// `positive` / `neutral` / `negative`, or [`UNSCORED_LABEL`].
    pub label: String,
    pub polarity: Option<f64>,
}

/// A backlog row handed to the scorer.
#[derive(Debug, Clone)]
pub struct BacklogReview {
    pub review_id: i64,
    pub review_text: Option<String>,
}

// ============================================================================
// Query Functions
// ============================================================================

impl ReviewStore {
    /// List products with their review counts, ordered by product id.
    pub fn list_products(&self) -> Result<Vec<ProductSummary>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT p.product_id, p.title, p.category, p.brand, COUNT(r.review_id)
                 FROM products p
                 LEFT JOIN reviews r ON r.product_id = p.product_id
                 GROUP BY p.product_id
                 ORDER BY p.product_id",
            )
            .context("Failed to prepare product list query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ProductSummary {
                    product_id: row.get(0)?,
                    title: row.get(1)?,
                    category: row.get(2)?,
                    brand: row.get(3)?,
                    review_count: row.get(4)?,
                })
            })
            .context("Failed to execute product list query")?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.context("Failed to read product row")?);
        }
        Ok(results)
    }

    /// The first `limit` product ids with a title, ordered by id.
    ///
    /// Used by the seeder to pick which products receive synthetic reviews.
    pub fn product_ids(&self, limit: usize) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT product_id FROM products
                 WHERE title IS NOT NULL
                 ORDER BY product_id
                 LIMIT ?",
            )
            .context("Failed to prepare product id query")?;

        let rows = stmt
            .query_map(params![limit as i64], |row| row.get(0))
            .context("Failed to execute product id query")?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.context("Failed to read product id")?);
        }
        Ok(ids)
    }

    /// Metrics for every product, ordered by product id.
    pub fn list_metrics(&self) -> Result<Vec<ProductMetrics>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT product_id, title, total_reviews, avg_rating, avg_sentiment_score,
                        positive_count, neutral_count, negative_count
                 FROM product_metrics
                 ORDER BY product_id",
            )
            .context("Failed to prepare metrics query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ProductMetrics {
                    product_id: row.get(0)?,
                    title: row.get(1)?,
                    total_reviews: row.get(2)?,
                    avg_rating: row.get(3)?,
                    avg_sentiment_score: row.get(4)?,
                    positive_count: row.get(5)?,
                    neutral_count: row.get(6)?,
                    negative_count: row.get(7)?,
                })
            })
            .context("Failed to execute metrics query")?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.context("Failed to read metrics row")?);
        }
        Ok(results)
    }

    /// Metrics for a single product, or `None` if the product doesn't exist.
    pub fn get_metrics(&self, product_id: i64) -> Result<Option<ProductMetrics>> {
        self.conn()
            .query_row(
                "SELECT product_id, title, total_reviews, avg_rating, avg_sentiment_score,
                        positive_count, neutral_count, negative_count
                 FROM product_metrics
                 WHERE product_id = ?",
                params![product_id],
                |row| {
                    Ok(ProductMetrics {
                        product_id: row.get(0)?,
                        title: row.get(1)?,
                        total_reviews: row.get(2)?,
                        avg_rating: row.get(3)?,
                        avg_sentiment_score: row.get(4)?,
                        positive_count: row.get(5)?,
                        neutral_count: row.get(6)?,
                        negative_count: row.get(7)?,
                    })
                },
            )
            .optional()
            .context("Failed to query product metrics")
    }

    /// Paginated reviews for a product with labels resolved under `model`.
    ///
    /// Reviews without a sentiment result get the `unscored` sentinel label
    /// and a null polarity.
    pub fn list_reviews(
        &self,
        product_id: i64,
        model: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ReviewWithSentiment>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT r.review_id, r.product_id, r.user_hash, r.review_text,
                        r.rating, r.review_date, s.label, s.polarity
                 FROM reviews r
                 LEFT JOIN sentiment_results s
                        ON s.review_id = r.review_id AND s.model = ?1
                 WHERE r.product_id = ?2
                 ORDER BY r.review_id
                 LIMIT ?3 OFFSET ?4",
            )
            .context("Failed to prepare review list query")?;

        let rows = stmt
            .query_map(
                params![model, product_id, limit as i64, offset as i64],
                |row| {
                    let label: Option<String> = row.get(6)?;
                    Ok(ReviewWithSentiment {
                        review_id: row.get(0)?,
                        product_id: row.get(1)?,
                        user_hash: row.get(2)?,
                        review_text: row.get(3)?,
                        rating: row.get(4)?,
                        review_date: row.get(5)?,
                        label: label.unwrap_or_else(|| UNSCORED_LABEL.to_string()),
                        polarity: row.get(7)?,
                    })
                },
            )
            .context("Failed to execute review list query")?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.context("Failed to read review row")?);
        }
        Ok(results)
    }

    /// Fetch the next chunk of the scorer backlog under `model`.
    ///
    /// Returns reviews with `review_id > after` that have no sentiment result
    /// for the tag, ordered by `review_id` ascending. `limit = None` returns
    /// the whole remaining backlog.
    pub fn fetch_backlog(
        &self,
        model: &str,
        after: i64,
        limit: Option<usize>,
    ) -> Result<Vec<BacklogReview>> {
        let cap = limit.map_or(-1, |n| n as i64);
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT r.review_id, r.review_text
                 FROM reviews r
                 LEFT JOIN sentiment_results s
                        ON s.review_id = r.review_id AND s.model = ?1
                 WHERE s.review_id IS NULL AND r.review_id > ?2
                 ORDER BY r.review_id
                 LIMIT ?3",
            )
            .context("Failed to prepare backlog query")?;

        let rows = stmt
            .query_map(params![model, after, cap], |row| {
                Ok(BacklogReview {
                    review_id: row.get(0)?,
                    review_text: row.get(1)?,
                })
            })
            .context("Failed to execute backlog query")?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.context("Failed to read backlog row")?);
        }
        Ok(results)
    }

    /// Number of reviews with no sentiment result under `model`.
    pub fn backlog_count(&self, model: &str) -> Result<i64> {
        self.conn()
            .query_row(
                "SELECT COUNT(*)
                 FROM reviews r
                 LEFT JOIN sentiment_results s
                        ON s.review_id = r.review_id AND s.model = ?
                 WHERE s.review_id IS NULL",
                params![model],
                |row| row.get(0),
            )
            .context("Failed to count backlog")
    }
}

// ============================================================================
// Tests
// ============================================================================
