//! Implementation of `revlens doctor` health check command.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use revlens_core::sentiment::DEFAULT_MODEL_TAG;
use revlens_core::store::ReviewStore;

use crate::output::{Formatter, OutputFormat};

/// Result of a single health check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: "pass".to_string(),
            message: message.to_string(),
            remediation: None,
        }
    }

    fn fail(name: &str, message: &str, remediation: &str) -> Self {
        Self {
            name: name.to_string(),
            status: "fail".to_string(),
            message: message.to_string(),
            remediation: Some(remediation.to_string()),
        }
    }

    fn warn(name: &str, message: &str, remediation: &str) -> Self {
        Self {
            name: name.to_string(),
            status: "warn".to_string(),
            message: message.to_string(),
            remediation: Some(remediation.to_string()),
        }
    }
}

/// Overall health status.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub checks: Vec<CheckResult>,
}

/// Run the doctor health check.
pub fn run_doctor(db_path: &Path, format: OutputFormat) -> Result<()> {
    let report = build_report(db_path)?;

    let formatter = Formatter::new(format);
    formatter.print(&report)?;

    // Exit with error code if unhealthy
    if !report.healthy {
        std::process::exit(1);
    }

    Ok(())
}

fn build_report(db_path: &Path) -> Result<HealthReport> {
    let mut checks = Vec::new();

    // Check 1: store file exists
    if db_path.exists() {
        checks.push(CheckResult::pass(
            "store_file",
            &format!("Review store present at {}", db_path.display()),
        ));
    } else {
        checks.push(CheckResult::fail(
            "store_file",
            &format!("No review store at {}", db_path.display()),
            "Run 'revlens init' first",
        ));
        return Ok(HealthReport {
            healthy: false,
            checks,
        });
    }

    // Check 2: connectivity
    let store = match ReviewStore::open(db_path) {
        Ok(store) => match store.ping() {
            Ok(()) => {
                checks.push(CheckResult::pass("connectivity", "SELECT 1 round-trip OK"));
                store
            }
            Err(e) => {
                checks.push(CheckResult::fail(
                    "connectivity",
                    &format!("Store unreachable: {e}"),
                    "Check the database file is readable and not corrupted",
                ));
                return Ok(HealthReport {
                    healthy: false,
                    checks,
                });
            }
        },
        Err(e) => {
            checks.push(CheckResult::fail(
                "connectivity",
                &format!("Failed to open store: {e}"),
                "Check the database file is readable and not corrupted",
            ));
            return Ok(HealthReport {
                healthy: false,
                checks,
            });
        }
    };

    // Check 3: schema
    let missing = store.missing_tables()?;
    if missing.is_empty() {
        checks.push(CheckResult::pass("schema", "All required tables present"));
    } else {
        checks.push(CheckResult::fail(
            "schema",
            &format!("Missing tables: {}", missing.join(", ")),
            "Run 'revlens init' to recreate the schema",
        ));
    }

    // Check 4: row counts
    let products = store.product_count()?;
    let reviews = store.review_count()?;
    let scored = store.sentiment_count()?;
    checks.push(CheckResult::pass(
        "data",
        &format!("{products} products, {reviews} reviews, {scored} sentiment results"),
    ));

    // Check 5: backlog under the default model tag
    let backlog = store.backlog_count(DEFAULT_MODEL_TAG)?;
    if backlog == 0 {
        checks.push(CheckResult::pass("backlog", "Backlog is empty"));
    } else {
        checks.push(CheckResult::warn(
            "backlog",
            &format!("{backlog} reviews awaiting sentiment scoring"),
            "Run 'revlens score' to process the backlog",
        ));
    }

    let healthy = checks.iter().all(|c| c.status != "fail");
    Ok(HealthReport { healthy, checks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use revlens_core::store::NewReview;
    use tempfile::tempdir;

    #[test]
    fn test_report_fails_without_store() {
        let dir = tempdir().unwrap();
        let report = build_report(&dir.path().join("missing.db")).unwrap();

        assert!(!report.healthy);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].status, "fail");
        assert!(report.checks[0]
            .remediation
            .as_deref()
            .unwrap()
            .contains("revlens init"));
    }

    #[test]
    fn test_report_healthy_with_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");
        ReviewStore::open(&path).unwrap();

        let report = build_report(&path).unwrap();
        assert!(report.healthy);
        assert!(report.checks.iter().all(|c| c.status == "pass"));
    }

    #[test]
    fn test_report_warns_on_backlog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let store = ReviewStore::open(&path).unwrap();
            let pid = store.upsert_product("Kettle", None, None).unwrap();
            store
                .insert_review(&NewReview {
                    product_id: pid,
                    user_hash: None,
                    review_text: Some("Great".to_string()),
                    rating: Some(5),
                    review_date: None,
                })
                .unwrap();
        }

        let report = build_report(&path).unwrap();
        // A backlog is a warning, not a failure.
        assert!(report.healthy);
        let backlog = report.checks.iter().find(|c| c.name == "backlog").unwrap();
        assert_eq!(backlog.status, "warn");
        assert!(backlog
            .remediation
            .as_deref()
            .unwrap()
            .contains("revlens score"));
    }
}
