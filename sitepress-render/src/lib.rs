//! # sitepress-render
//!
//! Page templates and bundled site assets for sitepress.
//!
//! This crate wraps rendered markdown fragments into standalone HTML pages
//! using Askama and ships the shared stylesheet every conversion receives.

pub mod assets;
pub mod templates;

pub use assets::{STYLESHEET, STYLESHEET_HREF};
pub use templates::{render_page, PageTemplate};
