//! revlens — review analytics pipeline: ingest, score, query.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use revlens_cli::cli::commands::{
    run_doctor, run_ingest_products, run_ingest_reviews, run_init, run_metrics, run_products,
    run_reviews, run_score, run_seed,
};
use revlens_cli::cli::{Cli, Commands, IngestCommands};
use revlens_cli::output::OutputFormat;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Commands::Init => {
            run_init(&cli.db)?;
        }

        Commands::Doctor => {
            run_doctor(&cli.db, format)?;
        }

        Commands::Ingest(cmd) => match cmd {
            IngestCommands::Products { csv } => {
                run_ingest_products(&cli.db, &csv, format)?;
            }
            IngestCommands::Reviews { csv } => {
                run_ingest_reviews(&cli.db, &csv, format)?;
            }
        },

        Commands::Seed {
            products,
            min,
            max,
            reset,
        } => {
            run_seed(&cli.db, products, min, max, reset, format)?;
        }

        Commands::Score {
            limit,
            model,
            chunk_size,
        } => {
            run_score(&cli.db, limit, &model, chunk_size, format)?;
        }

        Commands::Products => {
            run_products(&cli.db, format)?;
        }

        Commands::Metrics { product_id } => {
            run_metrics(&cli.db, product_id, format)?;
        }

        Commands::Reviews {
            product,
            model,
            limit,
            offset,
        } => {
            run_reviews(&cli.db, product, &model, limit, offset, format)?;
        }
    }

    Ok(())
}
