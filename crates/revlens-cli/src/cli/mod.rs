//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use revlens_core::sentiment::{DEFAULT_CHUNK_SIZE, DEFAULT_MODEL_TAG};

pub mod commands;

/// Review analytics pipeline: ingest, score, query
#[derive(Parser, Debug)]
#[command(name = "revlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the review store database
    #[arg(long, global = true, env = "REVLENS_DB", default_value = "revlens.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the review store database and schema
    Init,

    /// Health check - verify store, schema, counts, and backlog status
    Doctor,

    /// Load CSV data into the review store
    #[command(subcommand)]
    Ingest(IngestCommands),

    /// Seed synthetic reviews for existing products
    Seed {
        /// How many products to seed
        #[arg(long, default_value_t = 200)]
        products: usize,

        /// Min reviews per product
        #[arg(long, default_value_t = 5)]
        min: usize,

        /// Max reviews per product
        #[arg(long, default_value_t = 12)]
        max: usize,

        /// Delete existing reviews (and their sentiment results) first
        #[arg(long)]
        reset: bool,
    },

    /// Score unscored reviews with the lexicon sentiment analyzer
    Score {
        /// Cap how many backlog reviews are processed (0 = entire backlog)
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Model tag recorded with each result
        #[arg(long, default_value = DEFAULT_MODEL_TAG)]
        model: String,

        /// Rows per write transaction
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// List products with review counts
    Products,

    /// Show per-product metrics (all products if no id given)
    Metrics {
        /// Product ID (optional - shows all if omitted)
        product_id: Option<i64>,
    },

    /// List reviews for a product with resolved sentiment
    Reviews {
        /// Product ID
        #[arg(long)]
        product: i64,

        /// Model tag used to resolve labels
        #[arg(long, default_value = DEFAULT_MODEL_TAG)]
        model: String,

        /// Max reviews to return
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Offset for pagination
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

// ============================================================================
// Ingest subcommands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum IngestCommands {
    /// Load a products CSV (title, category, brand)
    Products {
        /// Path to the CSV file
        csv: PathBuf,
    },

    /// Load a combined reviews CSV (upserts products on the fly)
    Reviews {
        /// Path to the CSV file
        csv: PathBuf,
    },
}
