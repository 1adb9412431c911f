//! Data models for conversions and their documents.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{validate_component, Error, Result};

/// Identity used when the caller supplies no hint.
pub const ANONYMOUS: &str = "anonymous";

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const SUFFIX_LEN: usize = 8;

/// Conversion identifier: `<identity>_<YYYYMMDDHHMMSS>_<8 hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConversionId(String);

/// The three components of a well-formed conversion ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionIdParts<'a> {
    pub identity: &'a str,
    pub timestamp: NaiveDateTime,
    pub suffix: &'a str,
}

impl ConversionId {
    /// Mint a fresh ID for `hint` at second granularity with a random suffix.
    pub fn generate(hint: Option<&str>, at: DateTime<Utc>) -> Self {
        let identity = sanitize_identity(hint);
        let suffix = Uuid::new_v4().simple().to_string();
        ConversionId(format!(
            "{}_{}_{}",
            identity,
            at.format(TIMESTAMP_FORMAT),
            &suffix[..SUFFIX_LEN]
        ))
    }

    /// Accept an ID supplied by a caller.
    ///
    /// Only checks that the ID is a single safe path component; IDs minted by
    /// older layouts are still addressable.
    pub fn from_existing(raw: &str) -> Result<Self> {
        validate_component(raw)?;
        Ok(ConversionId(raw.to_string()))
    }

    /// Split the ID into identity, timestamp and suffix.
    pub fn parse(&self) -> Option<ConversionIdParts<'_>> {
        let mut parts = self.0.rsplitn(3, '_');
        let suffix = parts.next()?;
        let timestamp = parts.next()?;
        let identity = parts.next()?;

        if identity.is_empty()
            || suffix.len() != SUFFIX_LEN
            || !suffix.chars().all(|c| c.is_ascii_hexdigit())
            || timestamp.len() != 14
        {
            return None;
        }
        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;

        Some(ConversionIdParts {
            identity,
            timestamp,
            suffix,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConversionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reduce a caller-supplied hint to `[A-Za-z0-9_-]`, or `anonymous` when blank.
pub fn sanitize_identity(hint: Option<&str>) -> String {
    let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
        return ANONYMOUS.to_string();
    };
    hint.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Normalize a document name to carry a `.md` extension.
pub fn markdown_file_name(name: &str) -> Result<String> {
    let name = name.trim();
    validate_component(name)?;
    let file_name = if name.ends_with(".md") {
        name.to_string()
    } else {
        format!("{}.md", name)
    };
    if file_name == ".md" {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "document base name is empty",
        });
    }
    Ok(file_name)
}

/// HTML counterpart of a `.md` file name (only the trailing extension changes).
pub fn html_file_name(markdown_name: &str) -> String {
    let stem = markdown_name.strip_suffix(".md").unwrap_or(markdown_name);
    format!("{}.html", stem)
}

/// A best-effort rendering fallback. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// A fenced block named a language the highlighter does not know.
    UnknownLanguage { language: String },
    /// The highlighter failed; the block was emitted as escaped plain text.
    HighlightFailed { language: String, message: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::UnknownLanguage { language } => {
                write!(f, "unknown code language '{}', rendered as plain text", language)
            }
            Degradation::HighlightFailed { language, message } => {
                write!(f, "highlighting '{}' failed: {}", language, message)
            }
        }
    }
}

/// One markdown/HTML pair written into a conversion.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    /// Base name without extension.
    pub name: String,
    pub md_path: PathBuf,
    pub html_path: PathBuf,
    pub degradations: Vec<Degradation>,
}

/// Result of a completed `convert` call.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub id: ConversionId,
    pub path: PathBuf,
    pub stylesheet: PathBuf,
    pub documents: Vec<RenderedDocument>,
}

impl Conversion {
    pub fn is_degraded(&self) -> bool {
        self.documents.iter().any(|d| !d.degradations.is_empty())
    }
}

/// A conversion as found on disk.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub id: String,
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    /// Base names of the documents present, sorted.
    pub documents: Vec<String>,
    pub archive: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regex::Regex;

    fn new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_generate_format() {
        let id = ConversionId::generate(Some("u1"), new_year());
        let re = Regex::new(r"^u1_20240101000000_[0-9a-f]{8}$").unwrap();
        assert!(re.is_match(id.as_str()), "unexpected id {}", id);
    }

    #[test]
    fn test_generate_anonymous() {
        for hint in [None, Some(""), Some("   ")] {
            let id = ConversionId::generate(hint, new_year());
            assert!(id.as_str().starts_with("anonymous_20240101000000_"));
        }
    }

    #[test]
    fn test_generate_is_unique_within_a_second() {
        let a = ConversionId::generate(Some("u1"), new_year());
        let b = ConversionId::generate(Some("u1"), new_year());
        assert_ne!(a, b);
    }

    #[test]
    fn test_sanitize_identity() {
        assert_eq!(sanitize_identity(Some("alice")), "alice");
        assert_eq!(sanitize_identity(Some("../etc/passwd")), "---etc-passwd");
        assert_eq!(sanitize_identity(Some("a b@c")), "a-b-c");
        assert_eq!(sanitize_identity(Some("user_7")), "user_7");
    }

    #[test]
    fn test_parse_roundtrip_with_underscored_identity() {
        let id = ConversionId::generate(Some("team_a"), new_year());
        let parts = id.parse().unwrap();
        assert_eq!(parts.identity, "team_a");
        assert_eq!(parts.timestamp, new_year().naive_utc());
        assert_eq!(parts.suffix.len(), 8);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["plain", "u1_2024_deadbeef", "u1_20240101000000_xyz", "_20240101000000_deadbeef"] {
            let id = ConversionId::from_existing(raw).unwrap();
            assert!(id.parse().is_none(), "{} should not parse", raw);
        }
    }

    #[test]
    fn test_from_existing_rejects_traversal() {
        assert!(ConversionId::from_existing("../x").is_err());
        assert!(ConversionId::from_existing("").is_err());
    }

    #[test]
    fn test_markdown_file_name() {
        assert_eq!(markdown_file_name("notes").unwrap(), "notes.md");
        assert_eq!(markdown_file_name("notes.md").unwrap(), "notes.md");
        assert_eq!(markdown_file_name("v1.2").unwrap(), "v1.2.md");
        assert!(markdown_file_name(".md").is_err());
        assert!(markdown_file_name("sub/notes").is_err());
    }

    #[test]
    fn test_html_file_name_replaces_trailing_extension_only() {
        assert_eq!(html_file_name("notes.md"), "notes.html");
        assert_eq!(html_file_name("a.md.md"), "a.md.html");
        assert_eq!(html_file_name("my.mdnotes.md"), "my.mdnotes.html");
    }
}
