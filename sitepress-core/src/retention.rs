//! Retention sweeps: delete conversions older than the retention window.
//!
//! A sweep takes no lock. A conversion that is being written or archived
//! while its directory looks stale can be deleted underneath the writer;
//! callers must not sweep IDs they are still working on.
//!
//! Staging files left behind by an interrupted archive run are removed once
//! they fall past the same cutoff.

use crate::error::{Error, IoResultExt, Result};
use crate::models::ConversionId;
use crate::storage::{Storage, STAGING_SUFFIX};
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Outcome of one sweep pass
#[derive(Debug, Default)]
pub struct SweepReport {
    /// IDs whose directory (and archive, if any) were deleted
    pub removed: Vec<String>,
    /// Entries that were due for removal but could not be deleted
    pub failures: Vec<SweepFailure>,
}

#[derive(Debug)]
pub struct SweepFailure {
    pub id: String,
    pub error: Error,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Removes stale conversions from a storage root
pub struct RetentionSweeper {
    storage: Storage,
}

impl RetentionSweeper {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Delete every conversion last modified strictly before `now - retention`.
    pub fn sweep(&self, retention: Duration) -> Result<SweepReport> {
        self.sweep_at(retention, SystemTime::now())
    }

    /// Sweep against an explicit "now".
    ///
    /// Only listing the root itself can fail the call; per-entry problems are
    /// collected in the report and the pass carries on.
    pub fn sweep_at(&self, retention: Duration, now: SystemTime) -> Result<SweepReport> {
        let root = self.storage.root();
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::not_found(root.display().to_string()))
            }
            Err(err) => return Err(Error::storage(root, err)),
        };

        let mut report = SweepReport::default();
        let Some(cutoff) = now.checked_sub(retention) else {
            tracing::debug!("Retention {:?} reaches before the epoch; nothing to sweep", retention);
            return Ok(report);
        };

        for entry in entries {
            let entry = match entry.at(root) {
                Ok(entry) => entry,
                Err(error) => {
                    report.failures.push(SweepFailure {
                        id: root.display().to_string(),
                        error,
                    });
                    continue;
                }
            };
            let id = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            match self.sweep_entry(&path, &id, cutoff) {
                Ok(Swept::Conversion) => {
                    tracing::info!("Removed expired conversion {}", id);
                    report.removed.push(id);
                }
                Ok(Swept::Staging) => tracing::debug!("Removed abandoned archive {:?}", path),
                Ok(Swept::Kept) => {}
                Err(error) => {
                    tracing::warn!("Failed to remove conversion {}: {}", id, error);
                    report.failures.push(SweepFailure { id, error });
                }
            }
        }

        tracing::info!(
            "Sweep finished: {} removed, {} failed",
            report.removed.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn sweep_entry(&self, path: &Path, id: &str, cutoff: SystemTime) -> Result<Swept> {
        // symlink_metadata: a link to a directory elsewhere is not ours to delete
        let metadata = fs::symlink_metadata(path).at(path)?;
        let expired = metadata.modified().at(path)? < cutoff;

        if metadata.is_file() && id.starts_with('.') && id.ends_with(STAGING_SUFFIX) {
            if !expired {
                return Ok(Swept::Kept);
            }
            fs::remove_file(path).at(path)?;
            return Ok(Swept::Staging);
        }
        if !metadata.is_dir() || !expired {
            return Ok(Swept::Kept);
        }

        // Archive first: if it cannot go, the directory stays and the next pass retries
        let archive = self.storage.archive_path(&ConversionId::from_existing(id)?);
        match fs::remove_file(&archive) {
            Ok(()) => tracing::debug!("Removed archive {:?}", archive),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(Error::storage(archive, err)),
        }
        fs::remove_dir_all(path).at(path)?;

        Ok(Swept::Conversion)
    }
}

enum Swept {
    Kept,
    Conversion,
    /// Leftover temp file of an interrupted archive run
    Staging,
}
