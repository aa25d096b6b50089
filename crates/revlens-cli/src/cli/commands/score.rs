//! Implementation of `revlens score`, the sentiment scoring batch job.

use anyhow::Result;
use std::path::Path;

use revlens_core::sentiment::{score_backlog, LexiconAnalyzer, ScoreOptions};

use super::helpers::open_store;
use crate::output::{Formatter, OutputFormat};

/// Run the scorer over the backlog.
///
/// `limit = 0` processes the entire backlog. Zero scored rows is reported,
/// not treated as a failure.
pub fn run_score(
    db_path: &Path,
    limit: usize,
    model: &str,
    chunk_size: usize,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(db_path)?;
    let analyzer = LexiconAnalyzer::new();
    let opts = ScoreOptions {
        model: model.to_string(),
        limit,
        chunk_size,
    };

    let outcome = score_backlog(&store, &analyzer, &opts)?;

    match format {
        OutputFormat::Json => Formatter::new(format).print(&outcome)?,
        OutputFormat::Text => {
            if outcome.scored == 0 && outcome.skipped == 0 {
                println!("No unscored reviews found.");
            } else {
                println!("Wrote {} rows to sentiment_results.", outcome.scored);
                if outcome.skipped > 0 {
                    println!("Skipped {} reviews without text.", outcome.skipped);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use revlens_core::store::{NewReview, ReviewStore};
    use tempfile::tempdir;

    #[test]
    fn test_run_score_end_to_end_on_file_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let store = ReviewStore::open(&path).unwrap();
            let pid = store.upsert_product("Kettle", None, None).unwrap();
            for text in [Some("Exceeded my expectations."), Some("Not worth the hype."), None] {
                store
                    .insert_review(&NewReview {
                        product_id: pid,
                        user_hash: None,
                        review_text: text.map(ToString::to_string),
                        rating: None,
                        review_date: None,
                    })
                    .unwrap();
            }
        }

        run_score(&path, 0, "lexicon-v1", 5000, OutputFormat::Text).unwrap();

        let store = ReviewStore::open(&path).unwrap();
        assert_eq!(store.sentiment_count().unwrap(), 2);
        assert_eq!(store.backlog_count("lexicon-v1").unwrap(), 1);

        // Second invocation is a no-op.
        run_score(&path, 0, "lexicon-v1", 5000, OutputFormat::Text).unwrap();
        let store = ReviewStore::open(&path).unwrap();
        assert_eq!(store.sentiment_count().unwrap(), 2);
    }
}
