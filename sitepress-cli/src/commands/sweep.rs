//! Retention sweep command implementation.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use sitepress_core::config::retention_days;
use sitepress_core::SiteService;

#[derive(Serialize)]
struct SweepSummary<'a> {
    retention_days: u64,
    removed: &'a [String],
    failures: Vec<FailureEntry<'a>>,
}

#[derive(Serialize)]
struct FailureEntry<'a> {
    id: &'a str,
    error: String,
}

/// Run one sweep; exits non-zero when any expired conversion could not be removed.
pub fn sweep_conversions(service: &SiteService, days: Option<u64>, json: bool) -> Result<()> {
    let days = days.unwrap_or(service.config().retention.days);
    let report = service
        .sweep_older_than(retention_days(days))
        .context("Retention sweep failed")?;

    if json {
        let summary = SweepSummary {
            retention_days: days,
            removed: &report.removed,
            failures: report
                .failures
                .iter()
                .map(|f| FailureEntry {
                    id: &f.id,
                    error: f.error.to_string(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Removed {} conversions older than {} days",
            report.removed.len(),
            days
        );
        for id in &report.removed {
            println!("- {}", id);
        }
        for failure in &report.failures {
            eprintln!("! {}: {}", failure.id, failure.error);
        }
    }

    if !report.is_clean() {
        bail!("{} conversions could not be removed", report.failures.len());
    }
    Ok(())
}
