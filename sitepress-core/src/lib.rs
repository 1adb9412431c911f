//! # sitepress-core
//!
//! Core library for sitepress: turns batches of named markdown documents
//! into self-contained static sites on disk, packages them as zip archives,
//! and expires them after a retention window.
//!
//! All state lives on the filesystem under one storage root. Each component
//! takes a [`Storage`] handle built from [`Config`]; nothing is global.

pub mod archive;
pub mod config;
pub mod error;
pub mod markdown;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod retention;
pub mod service;
pub mod slug;
pub mod storage;
pub mod template;

pub use archive::Archiver;
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use markdown::{MarkdownOutput, MarkdownProcessor};
pub use models::{
    Conversion, ConversionId, ConversionSummary, Degradation, RenderedDocument, ANONYMOUS,
};
pub use pipeline::ConversionPipeline;
pub use render::DocumentRenderer;
pub use retention::{RetentionSweeper, SweepFailure, SweepReport};
pub use service::SiteService;
pub use slug::slugify;
pub use storage::Storage;
pub use template::emit_stylesheet;
