//! Shared site assets written into each conversion.

use crate::error::{IoResultExt, Result};
use sitepress_render::{STYLESHEET, STYLESHEET_HREF};
use std::fs;
use std::path::{Path, PathBuf};

/// Write the bundled stylesheet to `<conversion>/css/style.css`.
///
/// Overwrites any existing file with identical bytes.
pub fn emit_stylesheet(conversion_path: &Path) -> Result<PathBuf> {
    let stylesheet_path = conversion_path.join(STYLESHEET_HREF);
    if let Some(css_dir) = stylesheet_path.parent() {
        fs::create_dir_all(css_dir).at(css_dir)?;
    }
    fs::write(&stylesheet_path, STYLESHEET).at(&stylesheet_path)?;
    tracing::debug!("Wrote stylesheet {:?}", stylesheet_path);
    Ok(stylesheet_path)
}
