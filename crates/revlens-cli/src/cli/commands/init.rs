//! Implementation of `revlens init`.

use anyhow::Result;
use std::path::Path;

use revlens_core::store::ReviewStore;

/// Run the init command.
///
/// Creates the review store database with its full schema. Safe to re-run.
pub fn run_init(db_path: &Path) -> Result<()> {
    if db_path.exists() {
        // Re-apply the schema in case a newer binary added objects.
        let store = ReviewStore::open(db_path)?;
        store.ping()?;
        println!("Already initialized: {}", db_path.display());
        return Ok(());
    }

    let store = ReviewStore::open(db_path)?;
    store.ping()?;

    println!("Initialized review store at {}", db_path.display());
    println!("  Tables: products, reviews, sentiment_results");
    println!("  View:   product_metrics");

    Ok(())
}
