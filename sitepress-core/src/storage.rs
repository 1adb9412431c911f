//! Storage root layout and conversion allocation.
//!
//! ```text
//! <root>/<id>/          conversion directory
//! <root>/<id>/css/      shared stylesheet
//! <root>/<id>.zip       archive snapshot (sibling of the directory)
//! ```

use crate::error::{Error, IoResultExt, Result};
use crate::models::{ConversionId, ConversionSummary};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fresh suffixes tried before giving up on an allocation
const MAX_ALLOCATION_ATTEMPTS: usize = 8;

pub const ARCHIVE_EXTENSION: &str = "zip";

/// Suffix of archives still being written into the root
pub(crate) const STAGING_SUFFIX: &str = ".zip.partial";

/// Handle on the storage root. Holds no state beyond the path.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open (creating if needed) the storage root.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).at(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mint an ID and create its directory.
    pub fn allocate(&self, hint: Option<&str>) -> Result<(ConversionId, PathBuf)> {
        self.allocate_at(hint, Utc::now())
    }

    /// Allocate using an explicit timestamp for the ID's time component.
    ///
    /// The directory is created with create-if-not-exists semantics; on a
    /// collision a new suffix is drawn, so an existing conversion is never
    /// reused.
    pub fn allocate_at(
        &self,
        hint: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(ConversionId, PathBuf)> {
        fs::create_dir_all(&self.root).at(&self.root)?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let id = ConversionId::generate(hint, at);
            let path = self.conversion_path(&id);
            match fs::create_dir(&path) {
                Ok(()) => {
                    tracing::debug!("Allocated conversion {} at {:?}", id, path);
                    return Ok((id, path));
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::warn!("Conversion id collision on {} (attempt {})", id, attempt);
                }
                Err(err) => return Err(Error::storage(path, err)),
            }
        }

        Err(Error::storage(
            &self.root,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "no free conversion id after {} attempts",
                    MAX_ALLOCATION_ATTEMPTS
                ),
            ),
        ))
    }

    pub fn conversion_path(&self, id: &ConversionId) -> PathBuf {
        self.root.join(id.as_str())
    }

    pub fn archive_path(&self, id: &ConversionId) -> PathBuf {
        self.root
            .join(format!("{}.{}", id.as_str(), ARCHIVE_EXTENSION))
    }

    /// Look up an existing conversion by a caller-supplied ID.
    pub fn resolve(&self, raw_id: &str) -> Result<(ConversionId, PathBuf)> {
        let id = ConversionId::from_existing(raw_id)?;
        let path = self.conversion_path(&id);
        if !path.is_dir() {
            return Err(Error::not_found(raw_id));
        }
        Ok((id, path))
    }

    /// Enumerate conversions under the root, sorted by ID.
    pub fn list(&self) -> Result<Vec<ConversionSummary>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::not_found(self.root.display().to_string()))
            }
            Err(err) => return Err(Error::storage(&self.root, err)),
        };

        let mut summaries = Vec::new();
        for entry in entries {
            let entry = entry.at(&self.root)?;
            let path = entry.path();
            match self.summarize(&path) {
                Ok(Some(summary)) => summaries.push(summary),
                Ok(None) => {}
                Err(err) => tracing::warn!("Skipping {:?}: {}", path, err),
            }
        }

        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    fn summarize(&self, path: &Path) -> Result<Option<ConversionSummary>> {
        let metadata = fs::metadata(path).at(path)?;
        if !metadata.is_dir() {
            return Ok(None);
        }
        let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };

        let modified: DateTime<Utc> = metadata.modified().at(path)?.into();

        let mut documents = Vec::new();
        for entry in fs::read_dir(path).at(path)? {
            let entry = entry.at(path)?;
            let name = entry.file_name();
            if let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".md")) {
                if entry.file_type().at(&entry.path())?.is_file() {
                    documents.push(stem.to_string());
                }
            }
        }
        documents.sort();

        let archive = self.root.join(format!("{}.{}", id, ARCHIVE_EXTENSION));
        Ok(Some(ConversionSummary {
            id: id.to_string(),
            path: path.to_path_buf(),
            modified,
            documents,
            archive: archive.is_file().then_some(archive),
        }))
    }
}
