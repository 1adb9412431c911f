//! List command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use sitepress_core::SiteService;

pub fn list_conversions(service: &SiteService, json: bool) -> Result<()> {
    let conversions = service.list().context("Failed to list conversions")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversions)?);
        return Ok(());
    }

    if conversions.is_empty() {
        println!("No conversions in {}", service.storage().root().display());
        return Ok(());
    }

    let now = Utc::now();
    for c in &conversions {
        let age_days = now.signed_duration_since(c.modified).num_days();
        println!(
            "{}  {}d  {} docs{}",
            c.id,
            age_days,
            c.documents.len(),
            if c.archive.is_some() { "  [zip]" } else { "" }
        );
    }
    Ok(())
}
