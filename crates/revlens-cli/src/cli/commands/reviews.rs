//! Implementation of `revlens reviews`, the paginated per-product listing.

use anyhow::{bail, Result};
use std::path::Path;

use super::helpers::open_store;
use crate::output::{Formatter, OutputFormat};

/// List reviews for a product with labels resolved under `model`.
///
/// Reviews without a sentiment result carry the `unscored` sentinel label.
pub fn run_reviews(
    db_path: &Path,
    product_id: i64,
    model: &str,
    limit: usize,
    offset: usize,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(db_path)?;

    if store.get_metrics(product_id)?.is_none() {
        bail!("Product not found: {product_id}");
    }

    let reviews = store.list_reviews(product_id, model, limit, offset)?;

    let formatter = Formatter::new(format);
    formatter.print_list(&reviews, "No reviews for this product yet.")?;
    Ok(())
}
