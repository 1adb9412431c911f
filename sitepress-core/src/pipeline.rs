//! Conversion pipeline: allocate, emit the template, render every document.
//!
//! There is no rollback. If document N fails, documents before it stay on
//! disk and the error goes to the caller; a retry allocates a new ID.

use crate::error::Result;
use crate::models::{markdown_file_name, Conversion};
use crate::render::DocumentRenderer;
use crate::storage::Storage;
use crate::template::emit_stylesheet;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Turns a batch of named markdown documents into a conversion directory
pub struct ConversionPipeline {
    storage: Storage,
    renderer: DocumentRenderer,
}

impl ConversionPipeline {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            renderer: DocumentRenderer::new(),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Convert `documents` (filename → markdown) in the order given.
    pub fn convert<I, K, V>(&self, documents: I, identity_hint: Option<&str>) -> Result<Conversion>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.convert_at(documents, identity_hint, Utc::now())
    }

    /// Like [`convert`](Self::convert) with an explicit allocation timestamp.
    pub fn convert_at<I, K, V>(
        &self,
        documents: I,
        identity_hint: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Conversion>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (id, path) = self.storage.allocate_at(identity_hint, at)?;
        let stylesheet = emit_stylesheet(&path)?;

        let mut rendered = Vec::new();
        let mut seen = HashSet::new();
        for (filename, markdown) in documents {
            let filename = filename.as_ref();
            if let Ok(normalized) = markdown_file_name(filename) {
                if !seen.insert(normalized.clone()) {
                    tracing::warn!("{} appears twice in batch {}; last one wins", normalized, id);
                }
            }

            match self.renderer.render(&path, filename, markdown.as_ref()) {
                Ok(doc) => rendered.push(doc),
                Err(err) => {
                    tracing::error!(
                        "Conversion {} stopped at {} after {} documents: {}",
                        id,
                        filename,
                        rendered.len(),
                        err
                    );
                    return Err(err);
                }
            }
        }

        tracing::info!("Converted {} documents into {}", rendered.len(), id);

        Ok(Conversion {
            id,
            path,
            stylesheet,
            documents: rendered,
        })
    }
}
