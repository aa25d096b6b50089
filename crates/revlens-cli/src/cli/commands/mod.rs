//! Command implementations.

pub mod doctor;
pub mod helpers;
pub mod ingest;
pub mod init;
pub mod products;
pub mod reviews;
pub mod score;

pub use doctor::run_doctor;
pub use ingest::{run_ingest_products, run_ingest_reviews, run_seed};
pub use init::run_init;
pub use products::{run_metrics, run_products};
pub use reviews::run_reviews;
pub use score::run_score;
