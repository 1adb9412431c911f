//! CLI command implementations.

pub mod archive;
pub mod convert;
pub mod list;
pub mod preview;
pub mod sweep;

pub use archive::archive_conversion;
pub use convert::convert_files;
pub use list::list_conversions;
pub use preview::show_preview;
pub use sweep::sweep_conversions;

use anyhow::{bail, Context, Result};
use sitepress_core::{Config, SiteService};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "sitepress.yml";

/// Global options that shape the service
pub struct Settings {
    pub config: Option<PathBuf>,
    pub storage_root: Option<PathBuf>,
    pub retention_days: Option<u64>,
}

/// Load config (file, then flag/env overrides) and open the storage root.
pub fn open_service(settings: &Settings) -> Result<SiteService> {
    let config = load_config(settings)?;
    tracing::debug!(
        "Storage root {:?}, retention {} days",
        config.storage_root(),
        config.retention.days
    );
    SiteService::new(config).context("Failed to open storage root")
}

fn load_config(settings: &Settings) -> Result<Config> {
    let mut config = match &settings.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file {:?} does not exist", path);
            }
            tracing::info!("Loading config from {:?}", path);
            Config::from_file(path).context("Failed to load configuration")?
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            Config::from_file(DEFAULT_CONFIG).context("Failed to load configuration")?
        }
        None => Config::default(),
    };

    if let Some(root) = &settings.storage_root {
        // Relative flag values are relative to the working directory, not the config file
        let root = if root.is_absolute() {
            root.clone()
        } else {
            std::env::current_dir()
                .context("Failed to read current directory")?
                .join(root)
        };
        config.storage.root = root;
    }
    if let Some(days) = settings.retention_days {
        config.retention.days = days;
    }

    Ok(config)
}
