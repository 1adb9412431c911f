//! Preview command implementation.

use anyhow::{Context, Result};
use sitepress_core::SiteService;

pub fn show_preview(service: &SiteService, id: &str) -> Result<()> {
    let url = service
        .preview_url(id)
        .with_context(|| format!("No preview for conversion '{}'", id))?;
    println!("{}", url);
    Ok(())
}
