//! Archive command implementation.

use anyhow::{Context, Result};
use sitepress_core::SiteService;

/// Package a conversion and print the archive path
pub fn archive_conversion(service: &SiteService, id: &str) -> Result<()> {
    let archive = service
        .archive(id)
        .with_context(|| format!("Failed to archive conversion '{}'", id))?;
    println!("{}", archive.display());
    Ok(())
}
