//! Implementation of `revlens ingest` and `revlens seed`.

use anyhow::Result;
use std::path::Path;

use revlens_core::ingest::{ingest_products, ingest_reviews, seed_reviews, SeedOptions};

use super::helpers::open_store;
use crate::output::{Formatter, OutputFormat};

/// Load a products CSV.
pub fn run_ingest_products(db_path: &Path, csv_path: &Path, format: OutputFormat) -> Result<()> {
    let store = open_store(db_path)?;
    let summary = ingest_products(&store, csv_path)?;

    match format {
        OutputFormat::Json => Formatter::new(format).print(&summary)?,
        OutputFormat::Text => {
            println!("Loaded {} products from {}.", summary.products, csv_path.display());
        }
    }
    Ok(())
}

/// Load a combined reviews CSV.
pub fn run_ingest_reviews(db_path: &Path, csv_path: &Path, format: OutputFormat) -> Result<()> {
    let store = open_store(db_path)?;
    let summary = ingest_reviews(&store, csv_path)?;

    match format {
        OutputFormat::Json => Formatter::new(format).print(&summary)?,
        OutputFormat::Text => {
            println!("Ingestion complete.");
            println!("Products: {}, Reviews: {}", summary.products, summary.reviews);
        }
    }
    Ok(())
}

/// Seed synthetic reviews for existing products.
pub fn run_seed(
    db_path: &Path,
    products: usize,
    min: usize,
    max: usize,
    reset: bool,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(db_path)?;
    let opts = SeedOptions {
        products,
        min_reviews: min,
        max_reviews: max,
        reset,
    };
    let inserted = seed_reviews(&store, &opts)?;

    match format {
        OutputFormat::Json => {
            Formatter::new(format).print(&serde_json::json!({ "inserted": inserted }))?;
        }
        OutputFormat::Text => {
            println!("Done. Inserted {inserted} reviews.");
            println!("Tip: now run the sentiment job:");
            println!("  revlens score --limit 0   # 0 = process all");
        }
    }
    Ok(())
}
