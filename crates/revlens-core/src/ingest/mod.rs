//! CSV ingestion and synthetic seeding for the review store.
//!
//! Two CSV shapes are supported: a products file (`title`, `category`,
//! `brand`) and a combined reviews file that embeds the product columns and
//! upserts products on the fly. Field cleaning is forgiving: whitespace
//! collapses and unparseable ratings/dates become null. A review row without
//! a product title is a surfaced error, not a silent skip.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Deserialize;
use tracing::info;

use crate::errors::{CoreError, CoreResult};
use crate::store::{NewReview, ReviewStore};

/// Rows per write transaction.
const BATCH_SIZE: usize = 5000;

/// How far back seeded review dates are spread.
const DAYS_BACK: i64 = 120;

/// Review text pool for the seeder.
const SENTENCES: &[&str] = &[
    "Works well so far!",
    "Solid value for the price.",
    "Battery life could be better.",
    "Exactly as described.",
    "Packaging was damaged but product was fine.",
    "Exceeded my expectations.",
    "Not worth the hype.",
    "Setup was easy and quick.",
    "Customer support was helpful.",
    "I returned it after a week.",
];

/// Seeded rating distribution for 1..=5, skewed positive.
const RATING_WEIGHTS: [u32; 5] = [2, 6, 24, 38, 30];

#[derive(Debug, Deserialize)]
struct ProductRecord {
    #[serde(default, alias = "product_title")]
    title: Option<String>,
    #[serde(default, alias = "product_category")]
    category: Option<String>,
    #[serde(default)]
    brand: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewRecord {
    #[serde(default, alias = "title")]
    product_title: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    user_hash: Option<String>,
    #[serde(default)]
    review_text: Option<String>,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    review_date: Option<String>,
}

/// Counts reported by an ingestion run.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct IngestSummary {
    pub products: usize,
    pub reviews: usize,
}

/// Parameters for synthetic review seeding.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// How many products to seed (lowest ids first).
    pub products: usize,
    /// Min reviews per product.
    pub min_reviews: usize,
    /// Max reviews per product.
    pub max_reviews: usize,
    /// Delete existing reviews (and their sentiment results) first.
    pub reset: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            products: 200,
            min_reviews: 5,
            max_reviews: 12,
            reset: false,
        }
    }
}

/// Load a products CSV, inserting products not seen before.
///
/// Returns the number of distinct products the file mapped onto.
pub fn ingest_products(store: &ReviewStore, path: &Path) -> CoreResult<IngestSummary> {
    let mut reader = csv_reader(path)?;

    let mut seen = HashSet::new();
    for (idx, result) in reader.deserialize::<ProductRecord>().enumerate() {
        let line = idx as u64 + 2;
        let record = result.map_err(|e| CoreError::MalformedRecord {
            line,
            reason: e.to_string(),
        })?;

        let Some(title) = clean_str(record.title.as_deref()) else {
            return Err(CoreError::MalformedRecord {
                line,
                reason: "missing product title".to_string(),
            });
        };
        let category = clean_str(record.category.as_deref());
        let brand = clean_str(record.brand.as_deref());

        let id = store.upsert_product(&title, category.as_deref(), brand.as_deref())?;
        seen.insert(id);
    }

    let summary = IngestSummary {
        products: seen.len(),
        reviews: 0,
    };
    info!(products = summary.products, path = %path.display(), "product ingestion complete");
    Ok(summary)
}

/// Load a combined reviews CSV, upserting products and inserting reviews.
///
/// Ratings are coerced to 1-5 or null, dates to ISO or null. A row without
/// a product title cannot be attached to anything and fails the run.
pub fn ingest_reviews(store: &ReviewStore, path: &Path) -> CoreResult<IngestSummary> {
    let mut reader = csv_reader(path)?;

    let mut products = HashSet::new();
    let mut pending: Vec<NewReview> = Vec::new();
    let mut inserted = 0_usize;

    for (idx, result) in reader.deserialize::<ReviewRecord>().enumerate() {
        let line = idx as u64 + 2;
        let record = result.map_err(|e| CoreError::MalformedRecord {
            line,
            reason: e.to_string(),
        })?;

        let Some(title) = clean_str(record.product_title.as_deref()) else {
            return Err(CoreError::MalformedRecord {
                line,
                reason: "review row has no product title".to_string(),
            });
        };
        let category = clean_str(record.category.as_deref());
        let brand = clean_str(record.brand.as_deref());

        let product_id = store.upsert_product(&title, category.as_deref(), brand.as_deref())?;
        products.insert(product_id);

        pending.push(NewReview {
            product_id,
            user_hash: clean_str(record.user_hash.as_deref()),
            review_text: clean_str(record.review_text.as_deref()),
            rating: parse_rating(record.rating.as_deref()),
            review_date: parse_date(record.review_date.as_deref()),
        });

        if pending.len() >= BATCH_SIZE {
            inserted += store.insert_reviews(&pending)?;
            pending.clear();
        }
    }
    if !pending.is_empty() {
        inserted += store.insert_reviews(&pending)?;
    }

    let summary = IngestSummary {
        products: products.len(),
        reviews: inserted,
    };
    info!(
        products = summary.products,
        reviews = summary.reviews,
        path = %path.display(),
        "review ingestion complete"
    );
    Ok(summary)
}

/// Seed synthetic reviews for existing products.
///
/// Returns the number of reviews inserted. Fails with
/// [`CoreError::NoProducts`] when the products table is empty.
pub fn seed_reviews(store: &ReviewStore, opts: &SeedOptions) -> CoreResult<usize> {
    let (min_reviews, max_reviews) = if opts.min_reviews > opts.max_reviews {
        (opts.max_reviews, opts.min_reviews)
    } else {
        (opts.min_reviews, opts.max_reviews)
    };

    if opts.reset {
        store.reset_reviews()?;
        info!("cleared existing reviews and sentiment results");
    }

    let product_ids = store.product_ids(opts.products)?;
    if product_ids.is_empty() {
        return Err(CoreError::NoProducts);
    }

    let mut rng = rand::thread_rng();
    let rating_dist = WeightedIndex::new(RATING_WEIGHTS)
        .context("Failed to build rating distribution")?;
    let today = Utc::now().date_naive();

    let mut rows = Vec::new();
    for product_id in &product_ids {
        let count = rng.gen_range(min_reviews..=max_reviews);
        for _ in 0..count {
            rows.push(NewReview {
                product_id: *product_id,
                user_hash: Some(format!("u_{:06x}", rng.gen_range(0..0x0100_0000_u32))),
                review_text: Some(SENTENCES[rng.gen_range(0..SENTENCES.len())].to_string()),
                rating: Some(rating_dist.sample(&mut rng) as i64 + 1),
                review_date: Some(
                    (today - Duration::days(rng.gen_range(0..=DAYS_BACK))).to_string(),
                ),
            });
        }
    }

    let mut total = 0;
    for chunk in rows.chunks(BATCH_SIZE) {
        total += store.insert_reviews(chunk)?;
    }

    info!(
        products = product_ids.len(),
        reviews = total,
        "seeded synthetic reviews"
    );
    Ok(total)
}

fn csv_reader(path: &Path) -> CoreResult<csv::Reader<std::fs::File>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    Ok(reader)
}

/// Trim and collapse internal whitespace; empty becomes `None`.
fn clean_str(value: Option<&str>) -> Option<String> {
    let collapsed = value?.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Coerce a rating field to 1-5; anything unparseable becomes `None`.
fn parse_rating(value: Option<&str>) -> Option<i64> {
    let raw = clean_str(value)?;
    let number = raw.parse::<f64>().ok()?;
    if !number.is_finite() {
        return None;
    }
    Some((number.round() as i64).clamp(1, 5))
}

/// Coerce a date field to ISO `YYYY-MM-DD`; anything unparseable becomes
/// `None`.
fn parse_date(value: Option<&str>) -> Option<String> {
    let raw = clean_str(value)?;
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&raw, format) {
            return Some(date.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_clean_str_collapses_whitespace() {
        assert_eq!(clean_str(Some("  a   b  ")), Some("a b".to_string()));
        assert_eq!(clean_str(Some("   ")), None);
        assert_eq!(clean_str(Some("")), None);
        assert_eq!(clean_str(None), None);
    }

    #[test]
    fn test_parse_rating_coercion() {
        assert_eq!(parse_rating(Some("4")), Some(4));
        assert_eq!(parse_rating(Some("4.6")), Some(5));
        assert_eq!(parse_rating(Some("9")), Some(5));
        assert_eq!(parse_rating(Some("0")), Some(1));
        assert_eq!(parse_rating(Some("-2")), Some(1));
        assert_eq!(parse_rating(Some("n/a")), None);
        assert_eq!(parse_rating(Some("")), None);
        assert_eq!(parse_rating(None), None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date(Some("2026-02-01")), Some("2026-02-01".to_string()));
        assert_eq!(parse_date(Some("2026/02/01")), Some("2026-02-01".to_string()));
        assert_eq!(parse_date(Some("02/01/2026")), Some("2026-02-01".to_string()));
        assert_eq!(parse_date(Some("yesterday")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn test_ingest_products_dedupes() {
        let store = ReviewStore::open_in_memory().unwrap();
        let file = csv_file(
            "title,category,brand\n\
             USB-C Hub,Electronics,Plugtech\n\
             USB-C Hub,Electronics,Plugtech\n\
             Desk Lamp,Home,\n",
        );

        let summary = ingest_products(&store, file.path()).unwrap();
        assert_eq!(summary.products, 2);
        assert_eq!(store.product_count().unwrap(), 2);
    }

    #[test]
    fn test_ingest_products_accepts_aliased_headers() {
        let store = ReviewStore::open_in_memory().unwrap();
        let file = csv_file(
            "product_title,product_category,brand\n\
             Kettle,Kitchen,Brewster\n",
        );

        let summary = ingest_products(&store, file.path()).unwrap();
        assert_eq!(summary.products, 1);
        let products = store.list_products().unwrap();
        assert_eq!(products[0].title, "Kettle");
        assert_eq!(products[0].category.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn test_ingest_products_missing_title_is_error() {
        let store = ReviewStore::open_in_memory().unwrap();
        let file = csv_file("title,category,brand\n,Electronics,Plugtech\n");

        let err = ingest_products(&store, file.path()).unwrap_err();
        match err {
            CoreError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_ingest_reviews_upserts_products_and_coerces_fields() {
        let store = ReviewStore::open_in_memory().unwrap();
        let file = csv_file(
            "product_title,category,brand,user_hash,review_text,rating,review_date\n\
             Kettle,Kitchen,Brewster,u_ab12cd,Works well so far!,5,2026-01-03\n\
             Kettle,Kitchen,Brewster,u_ef34gh,  Not   worth the hype. ,bad,01/15/2026\n\
             Lamp,Home,,u_aa00bb,,3.7,not-a-date\n",
        );

        let summary = ingest_reviews(&store, file.path()).unwrap();
        assert_eq!(summary.products, 2);
        assert_eq!(summary.reviews, 3);

        let kettle = store.list_products().unwrap()[0].product_id;
        let reviews = store.list_reviews(kettle, "m", 50, 0).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, Some(5));
        assert_eq!(reviews[0].review_date.as_deref(), Some("2026-01-03"));
        // Whitespace collapsed, rating coerced to null, date normalized.
        assert_eq!(reviews[1].review_text.as_deref(), Some("Not worth the hype."));
        assert_eq!(reviews[1].rating, None);
        assert_eq!(reviews[1].review_date.as_deref(), Some("2026-01-15"));

        let lamp = store.list_products().unwrap()[1].product_id;
        let lamp_reviews = store.list_reviews(lamp, "m", 50, 0).unwrap();
        assert_eq!(lamp_reviews[0].review_text, None);
        assert_eq!(lamp_reviews[0].rating, Some(4));
        assert_eq!(lamp_reviews[0].review_date, None);
    }

    #[test]
    fn test_ingest_reviews_missing_product_is_error() {
        let store = ReviewStore::open_in_memory().unwrap();
        let file = csv_file(
            "product_title,review_text,rating\n\
             Kettle,Fine,4\n\
             ,Orphaned review,2\n",
        );

        let err = ingest_reviews(&store, file.path()).unwrap_err();
        match err {
            CoreError::MalformedRecord { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("no product title"));
            }
            other => panic!("Expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_seed_requires_products() {
        let store = ReviewStore::open_in_memory().unwrap();
        let err = seed_reviews(&store, &SeedOptions::default()).unwrap_err();
        assert!(matches!(err, CoreError::NoProducts));
    }

    #[test]
    fn test_seed_inserts_within_bounds() {
        let store = ReviewStore::open_in_memory().unwrap();
        for i in 0..3 {
            store.upsert_product(&format!("Product {i}"), None, None).unwrap();
        }

        let opts = SeedOptions {
            products: 2,
            min_reviews: 2,
            max_reviews: 4,
            reset: false,
        };
        let inserted = seed_reviews(&store, &opts).unwrap();
        assert!((4..=8).contains(&inserted));
        assert_eq!(store.review_count().unwrap(), inserted as i64);

        // Only the two lowest product ids received reviews.
        let products = store.list_products().unwrap();
        assert!(products[0].review_count > 0);
        assert!(products[1].review_count > 0);
        assert_eq!(products[2].review_count, 0);

        // Seeded rows are scoreable: text, rating and date are all present.
        let reviews = store.list_reviews(products[0].product_id, "m", 50, 0).unwrap();
        for review in &reviews {
            assert!(review.review_text.is_some());
            let rating = review.rating.unwrap();
            assert!((1..=5).contains(&rating));
            assert!(review.review_date.is_some());
        }
    }

    #[test]
    fn test_seed_swaps_inverted_bounds() {
        let store = ReviewStore::open_in_memory().unwrap();
        store.upsert_product("Kettle", None, None).unwrap();

        let opts = SeedOptions {
            products: 1,
            min_reviews: 6,
            max_reviews: 2,
            reset: false,
        };
        let inserted = seed_reviews(&store, &opts).unwrap();
        assert!((2..=6).contains(&inserted));
    }

    #[test]
    fn test_seed_reset_clears_previous_reviews() {
        let store = ReviewStore::open_in_memory().unwrap();
        store.upsert_product("Kettle", None, None).unwrap();

        let opts = SeedOptions {
            products: 1,
            min_reviews: 2,
            max_reviews: 2,
            reset: false,
        };
        seed_reviews(&store, &opts).unwrap();
        assert_eq!(store.review_count().unwrap(), 2);

        let reset_opts = SeedOptions {
            reset: true,
            ..opts
        };
        seed_reviews(&store, &reset_opts).unwrap();
        // Old rows were cleared before the new batch landed.
        assert_eq!(store.review_count().unwrap(), 2);
    }
}
