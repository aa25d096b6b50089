//! Implementation of `revlens products` and `revlens metrics`.

use anyhow::{bail, Result};
use std::path::Path;

use super::helpers::open_store;
use crate::output::{Formatter, OutputFormat};

/// List products with their review counts.
pub fn run_products(db_path: &Path, format: OutputFormat) -> Result<()> {
    let store = open_store(db_path)?;
    let products = store.list_products()?;

    let formatter = Formatter::new(format);
    formatter.print_list(&products, "No products found.")?;
    Ok(())
}

/// Show metrics for one product, or all products when no id is given.
pub fn run_metrics(db_path: &Path, product_id: Option<i64>, format: OutputFormat) -> Result<()> {
    let store = open_store(db_path)?;
    let formatter = Formatter::new(format);

    match product_id {
        Some(id) => match store.get_metrics(id)? {
            Some(metrics) => formatter.print(&metrics)?,
            None => bail!("Product not found: {id}"),
        },
        None => {
            let metrics = store.list_metrics()?;
            formatter.print_list(
                &metrics,
                "No metrics yet. Add reviews and run 'revlens score'.",
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use revlens_core::store::ReviewStore;
    use tempfile::tempdir;

    #[test]
    fn test_run_metrics_unknown_product_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");
        ReviewStore::open(&path).unwrap();

        let err = run_metrics(&path, Some(42), OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("Product not found"));
    }

    #[test]
    fn test_run_products_on_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");
        ReviewStore::open(&path).unwrap();

        run_products(&path, OutputFormat::Text).unwrap();
        run_metrics(&path, None, OutputFormat::Json).unwrap();
    }
}
