//! Error types shared by the conversion components.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error at {path:?}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Archive error at {path:?}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Conversion not found: {id}")]
    NotFound { id: String },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// True for the `NotFound` kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True for filesystem-level failures, including archive container writes.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage { .. } | Error::Archive { .. })
    }
}

/// Attach the offending path to an `io::Result`.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| Error::storage(path, source))
    }
}

/// Reject names that could escape their parent directory.
pub(crate) fn validate_component(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("path separators are not allowed")
    } else if name == "." || name == ".." {
        Some("relative path components are not allowed")
    } else if name.contains('\0') {
        Some("NUL bytes are not allowed")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_component() {
        assert!(validate_component("notes.md").is_ok());
        assert!(validate_component("u1_20240101000000_deadbeef").is_ok());
        assert!(validate_component("").is_err());
        assert!(validate_component("  ").is_err());
        assert!(validate_component("..").is_err());
        assert!(validate_component("a/b.md").is_err());
        assert!(validate_component("..\\evil").is_err());
    }

    #[test]
    fn test_error_kinds() {
        let err = Error::not_found("abc");
        assert!(err.is_not_found());
        assert!(!err.is_storage());

        let err = Error::storage("/tmp/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.is_storage());
        assert!(err.to_string().contains("/tmp/x"));
    }
}
