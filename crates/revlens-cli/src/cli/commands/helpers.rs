//! Shared helpers for command implementations.

use anyhow::{bail, Result};
use std::path::Path;

use revlens_core::store::ReviewStore;

/// Open the review store, requiring that `revlens init` has run.
///
/// Every command except `init` and `doctor` goes through here, so a missing
/// store fails fast with a remediation hint instead of silently creating an
/// empty database somewhere unexpected.
pub fn open_store(db_path: &Path) -> Result<ReviewStore> {
    if !db_path.exists() {
        bail!(
            "No review store at {}. Run 'revlens init' first.",
            db_path.display()
        );
    }
    ReviewStore::open(db_path)
}
