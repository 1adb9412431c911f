//! Zip snapshots of conversion directories.

use crate::error::{Error, IoResultExt, Result};
use crate::storage::{Storage, STAGING_SUFFIX};
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Packages a conversion into `<root>/<id>.zip`
pub struct Archiver {
    storage: Storage,
}

impl Archiver {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Snapshot every regular file of the conversion into its archive.
    ///
    /// The archive is assembled in a temporary file beside the target and
    /// renamed into place only once complete, so a failed run never leaves a
    /// truncated `.zip` behind. An existing archive is replaced.
    pub fn archive(&self, conversion_id: &str) -> Result<PathBuf> {
        let (id, conversion_path) = self.storage.resolve(conversion_id)?;
        let archive_path = self.storage.archive_path(&id);
        let root = self.storage.root();

        let mut staging = tempfile::Builder::new()
            .prefix(&format!(".{}.", id))
            .suffix(STAGING_SUFFIX)
            .tempfile_in(root)
            .at(root)?;

        let entries = write_archive(staging.as_file_mut(), &conversion_path, &archive_path)?;
        publish_permissions(staging.as_file(), staging.path())?;

        staging
            .persist(&archive_path)
            .map_err(|err| Error::storage(&archive_path, err.error))?;

        tracing::info!("Archived {} files of {} into {:?}", entries, id, archive_path);
        Ok(archive_path)
    }
}

fn write_archive(file: &mut File, source: &Path, archive_path: &Path) -> Result<usize> {
    let zip_err = |source: zip::result::ZipError| Error::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut count = 0;
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(source).to_path_buf();
            Error::storage(path, io::Error::from(err))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry_name(source, entry.path());
        tracing::debug!("Adding {} to archive", name);
        writer.start_file(name, options).map_err(zip_err)?;
        let mut input = File::open(entry.path()).at(entry.path())?;
        io::copy(&mut input, &mut writer).at(entry.path())?;
        count += 1;
    }

    writer.finish().map_err(zip_err)?;
    Ok(count)
}

/// Temp files are created owner-only; archives are read by whoever serves them.
#[cfg(unix)]
fn publish_permissions(file: &File, path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
        .at(path)
}

#[cfg(not(unix))]
fn publish_permissions(_file: &File, _path: &Path) -> Result<()> {
    Ok(())
}

/// Archive entry name: path relative to the conversion root, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
