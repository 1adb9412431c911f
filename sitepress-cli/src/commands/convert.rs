//! Convert command implementation.

use anyhow::{Context, Result};
use sitepress_core::SiteService;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read the given files (directories contribute their `*.md` files) and convert them as one batch
pub fn convert_files(
    service: &SiteService,
    paths: &[PathBuf],
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let documents = collect_documents(paths)?;
    tracing::info!("Converting {} documents", documents.len());

    let conversion = service
        .convert(documents, user)
        .context("Conversion failed")?;
    let preview = service.preview_url(conversion.id.as_str())?;

    if json {
        let payload = serde_json::json!({
            "id": conversion.id,
            "path": conversion.path,
            "preview": preview,
            "documents": conversion.documents,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("✓ Converted {} documents", conversion.documents.len());
    println!("  id:      {}", conversion.id);
    println!("  path:    {}", conversion.path.display());
    println!("  preview: {}", preview);
    for doc in &conversion.documents {
        for degradation in &doc.degradations {
            println!("  ! {}: {}", doc.name, degradation);
        }
    }
    Ok(())
}

/// Pairs of (file name, markdown) in command-line order
fn collect_documents(paths: &[PathBuf]) -> Result<Vec<(String, String)>> {
    let mut documents = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("Failed to walk {:?}", path))?;
                let is_markdown = entry.path().extension().is_some_and(|ext| ext == "md");
                if entry.file_type().is_file() && is_markdown {
                    documents.push(read_document(entry.path())?);
                }
            }
        } else {
            documents.push(read_document(path)?);
        }
    }
    Ok(documents)
}

fn read_document(path: &Path) -> Result<(String, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{:?} has no usable file name", path))?
        .to_string();
    let markdown =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok((name, markdown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_documents_from_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        fs::create_dir_all(nested.join("deeper")).unwrap();
        fs::write(nested.join("b.md"), "B").unwrap();
        fs::write(nested.join("a.md"), "A").unwrap();
        fs::write(nested.join("skip.txt"), "no").unwrap();
        fs::write(nested.join("deeper").join("c.md"), "C").unwrap();
        let single = dir.path().join("single.md");
        fs::write(&single, "S").unwrap();

        let docs = collect_documents(&[single, nested]).unwrap();
        let names: Vec<_> = docs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["single.md", "a.md", "b.md", "c.md"]);
        assert_eq!(docs[0].1, "S");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_documents(&[dir.path().join("nope.md")]).is_err());
    }
}
