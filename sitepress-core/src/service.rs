//! Single access point wiring the components to one `Config`.

use crate::archive::Archiver;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Conversion, ConversionSummary};
use crate::pipeline::ConversionPipeline;
use crate::retention::{RetentionSweeper, SweepReport};
use crate::storage::Storage;
use std::path::PathBuf;
use std::time::Duration;

/// The operations offered to routing and scheduling layers.
///
/// Construct once at startup and share by reference; it holds only the
/// read-only configuration and path handles.
pub struct SiteService {
    config: Config,
    pipeline: ConversionPipeline,
    archiver: Archiver,
    sweeper: RetentionSweeper,
}

impl SiteService {
    pub fn new(config: Config) -> Result<Self> {
        let storage = Storage::open(config.storage_root())?;
        tracing::debug!("Storage root {:?}", storage.root());

        Ok(Self {
            pipeline: ConversionPipeline::new(storage.clone()),
            archiver: Archiver::new(storage.clone()),
            sweeper: RetentionSweeper::new(storage),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &Storage {
        self.pipeline.storage()
    }

    /// Submit a batch for conversion
    pub fn convert<I, K, V>(&self, documents: I, identity_hint: Option<&str>) -> Result<Conversion>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.pipeline.convert(documents, identity_hint)
    }

    /// Build (or rebuild) the archive for a conversion
    pub fn archive(&self, conversion_id: &str) -> Result<PathBuf> {
        self.archiver.archive(conversion_id)
    }

    /// Logical preview path handed to the presentation layer
    pub fn preview_url(&self, conversion_id: &str) -> Result<String> {
        let (id, _) = self.storage().resolve(conversion_id)?;
        Ok(format!("{}{}", self.config.preview_base_url(), id))
    }

    /// Sweep with the configured retention period
    pub fn sweep(&self) -> Result<SweepReport> {
        self.sweep_older_than(self.config.retention_period())
    }

    pub fn sweep_older_than(&self, retention: Duration) -> Result<SweepReport> {
        self.sweeper.sweep(retention)
    }

    pub fn list(&self) -> Result<Vec<ConversionSummary>> {
        self.storage().list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn service(root: &std::path::Path) -> SiteService {
        SiteService::new(Config::with_storage_root(root)).unwrap()
    }

    #[test]
    fn test_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir.path().join("storage"));

        let mut docs = BTreeMap::new();
        docs.insert("index", "# Home\n\nSee [guide](guide.html).");
        docs.insert("guide", "# Guide\n\n```python\nprint('hi')\n```");
        let conversion = service.convert(docs, Some("dana")).unwrap();
        assert!(!conversion.is_degraded());

        let archive = service.archive(conversion.id.as_str()).unwrap();
        assert!(archive.is_file());

        let url = service.preview_url(conversion.id.as_str()).unwrap();
        assert_eq!(url, format!("/preview/{}", conversion.id));

        let listed = service.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].documents, ["guide", "index"]);
        assert_eq!(listed[0].archive.as_deref(), Some(archive.as_path()));

        let report = service.sweep().unwrap();
        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_preview_for_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        assert!(service
            .preview_url("nobody_20240101000000_00000000")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_custom_preview_base() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_storage_root(dir.path());
        config.preview.base_url = "https://sites.example.com/p".into();
        let service = SiteService::new(config).unwrap();
        let conversion = service.convert([("a", "a")], None).unwrap();

        assert_eq!(
            service.preview_url(conversion.id.as_str()).unwrap(),
            format!("https://sites.example.com/p/{}", conversion.id)
        );
    }
}
