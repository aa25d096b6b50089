//! Relational review store.
//!
//! Owns the SQLite schema for `products`, `reviews` and `sentiment_results`,
//! the derived `product_metrics` view, and the write path used by ingestion
//! and the sentiment scorer. Read queries live in [`query`].

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]

mod query;

pub use query::{BacklogReview, ProductMetrics, ProductSummary, ReviewWithSentiment, UNSCORED_LABEL};

use std::path::Path;

use anyhow::{ensure, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{CoreError, CoreResult};
use crate::sentiment::SentimentRecord;

/// SQLite-backed review store.
#[derive(Debug)]
pub struct ReviewStore {
    conn: Connection,
}

/// A review to be inserted by ingestion or seeding.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: i64,
    pub user_hash: Option<String>,
    pub review_text: Option<String>,
    /// 1-5, already coerced; out-of-range input becomes `None` upstream.
    pub rating: Option<i64>,
    /// ISO date (`YYYY-MM-DD`), already coerced.
    pub review_date: Option<String>,
}

impl ReviewStore {
    /// Open or create a review store at the given path.
    ///
    /// Creates parent directories if they don't exist and ensures the schema
    /// is present. Opening is the connectivity boundary: any failure here is
    /// fatal for the calling run.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directories: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;

        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory review store (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    ///
    /// Creates all tables, indexes, and views if they don't exist.
    pub fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .context("Failed to initialize schema")?;
        Ok(())
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Round-trip a trivial query to verify the store is reachable.
    pub fn ping(&self) -> Result<()> {
        let one: i64 = self
            .conn
            .query_row("SELECT 1", [], |row| row.get(0))
            .context("Failed to reach the review store")?;
        ensure!(one == 1, "unexpected ping result: {one}");
        Ok(())
    }

    /// Names of required tables missing from the schema (empty when healthy).
    pub fn missing_tables(&self) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for table in ["products", "reviews", "sentiment_results"] {
            let found: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                    params![table],
                    |row| row.get(0),
                )
                .optional()
                .context("Failed to query sqlite_master")?;
            if found.is_none() {
                missing.push(table.to_string());
            }
        }
        Ok(missing)
    }

    // ------------------------------------------------------------------
    // Write path
    // ------------------------------------------------------------------

    /// Insert a product if no product with the same title/brand exists yet,
    /// returning the product id either way.
    ///
    /// Brand is compared NULL-insensitively so re-ingesting a file with
    /// missing brands does not duplicate products.
    pub fn upsert_product(
        &self,
        title: &str,
        category: Option<&str>,
        brand: Option<&str>,
    ) -> Result<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT product_id FROM products
                 WHERE title = ? AND COALESCE(brand, '') = COALESCE(?, '')",
                params![title, brand],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to look up product")?;

        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn
            .execute(
                "INSERT INTO products (title, category, brand) VALUES (?, ?, ?)",
                params![title, category, brand],
            )
            .with_context(|| format!("Failed to insert product '{title}'"))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a single review, returning its id.
    pub fn insert_review(&self, review: &NewReview) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO reviews (product_id, user_hash, review_text, rating, review_date)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    review.product_id,
                    review.user_hash,
                    review.review_text,
                    review.rating,
                    review.review_date,
                ],
            )
            .with_context(|| {
                format!("Failed to insert review for product {}", review.product_id)
            })?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch of reviews in one transaction.
    pub fn insert_reviews(&self, reviews: &[NewReview]) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin review transaction")?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO reviews (product_id, user_hash, review_text, rating, review_date)
                     VALUES (?, ?, ?, ?, ?)",
                )
                .context("Failed to prepare review insert")?;
            for review in reviews {
                stmt.execute(params![
                    review.product_id,
                    review.user_hash,
                    review.review_text,
                    review.rating,
                    review.review_date,
                ])
                .with_context(|| {
                    format!("Failed to insert review for product {}", review.product_id)
                })?;
            }
        }
        tx.commit().context("Failed to commit review batch")?;
        Ok(reviews.len())
    }

    /// Insert a batch of sentiment results in one transaction.
    ///
    /// A `(review_id, model)` uniqueness violation is surfaced as
    /// [`CoreError::DuplicateSentiment`], never swallowed; the whole chunk
    /// rolls back, leaving earlier chunks valid.
    pub fn insert_sentiment_batch(&self, records: &[SentimentRecord]) -> CoreResult<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin sentiment transaction")?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO sentiment_results
                        (review_id, model, polarity, label, confidence, keywords, processed_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .context("Failed to prepare sentiment insert")?;
            for record in records {
                let keywords = record.keywords.as_ref().map(serde_json::Value::to_string);
                stmt.execute(params![
                    record.review_id,
                    record.model,
                    record.polarity,
                    record.label.as_str(),
                    record.confidence,
                    keywords,
                    record.processed_at.to_rfc3339(),
                ])
                .map_err(|e| match e {
                    rusqlite::Error::SqliteFailure(f, _)
                        if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                    {
                        CoreError::DuplicateSentiment {
                            review_id: record.review_id,
                            model: record.model.clone(),
                        }
                    }
                    other => CoreError::Internal(
                        anyhow::Error::new(other).context("Failed to insert sentiment result"),
                    ),
                })?;
            }
        }
        tx.commit().context("Failed to commit sentiment batch")?;
        Ok(records.len())
    }

    /// Delete all reviews and their sentiment results (children first).
    ///
    /// Products are kept; only an explicit reset removes review data.
    pub fn reset_reviews(&self) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin reset transaction")?;
        tx.execute_batch(
            "DELETE FROM sentiment_results;
             DELETE FROM reviews;",
        )
        .context("Failed to reset review tables")?;
        tx.commit().context("Failed to commit reset")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Counts
    // ------------------------------------------------------------------

    pub fn product_count(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM products")
    }

    pub fn review_count(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM reviews")
    }

    pub fn sentiment_count(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM sentiment_results")
    }

    fn count(&self, sql: &str) -> Result<i64> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .with_context(|| format!("Failed to run count query: {sql}"))
    }
}

// ============================================================================
// Schema SQL
// ============================================================================

const SCHEMA_SQL: &str = r"
-- PRODUCTS
CREATE TABLE IF NOT EXISTS products (
    product_id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    category TEXT,
    brand TEXT,
    UNIQUE (title, brand)
);

-- REVIEWS
CREATE TABLE IF NOT EXISTS reviews (
    review_id INTEGER PRIMARY KEY,
    product_id INTEGER NOT NULL REFERENCES products(product_id),
    user_hash TEXT,
    review_text TEXT,
    rating INTEGER CHECK (rating BETWEEN 1 AND 5),
    review_date TEXT
);

CREATE INDEX IF NOT EXISTS idx_reviews_product ON reviews(product_id);
CREATE INDEX IF NOT EXISTS idx_reviews_date ON reviews(review_date);

-- SENTIMENT RESULTS
CREATE TABLE IF NOT EXISTS sentiment_results (
    sentiment_id INTEGER PRIMARY KEY,
    review_id INTEGER NOT NULL REFERENCES reviews(review_id),
    model TEXT NOT NULL,
    polarity REAL NOT NULL CHECK (polarity BETWEEN -1.0 AND 1.0),
    label TEXT NOT NULL CHECK (label IN ('positive', 'neutral', 'negative')),
    confidence REAL CHECK (confidence >= 0.0),
    keywords TEXT,
    processed_at TEXT NOT NULL,
    UNIQUE (review_id, model)
);

CREATE INDEX IF NOT EXISTS idx_sentiment_review ON sentiment_results(review_id);
CREATE INDEX IF NOT EXISTS idx_sentiment_model ON sentiment_results(model);

-- VIEWS
CREATE VIEW IF NOT EXISTS product_metrics AS
SELECT
    p.product_id,
    p.title,
    COUNT(DISTINCT r.review_id) AS total_reviews,
    AVG(r.rating) AS avg_rating,
    AVG(s.polarity) AS avg_sentiment_score,
    SUM(CASE WHEN s.label = 'positive' THEN 1 ELSE 0 END) AS positive_count,
    SUM(CASE WHEN s.label = 'neutral' THEN 1 ELSE 0 END) AS neutral_count,
    SUM(CASE WHEN s.label = 'negative' THEN 1 ELSE 0 END) AS negative_count
FROM products p
LEFT JOIN reviews r ON r.product_id = p.product_id
LEFT JOIN sentiment_results s ON s.review_id = r.review_id
GROUP BY p.product_id;
";

// ============================================================================
// Tests
// ============================================================================
