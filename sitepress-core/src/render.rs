//! Document rendering: one markdown source in, a `.md` + `.html` pair out.

use crate::error::{IoResultExt, Result};
use crate::markdown::MarkdownProcessor;
use crate::models::{html_file_name, markdown_file_name, RenderedDocument};
use std::fs;
use std::path::Path;

/// Writes markdown sources and their standalone HTML pages
pub struct DocumentRenderer {
    processor: MarkdownProcessor,
}

impl DocumentRenderer {
    pub fn new() -> Self {
        Self {
            processor: MarkdownProcessor::new(),
        }
    }

    /// Render `markdown` under `filename` into `conversion_path`.
    ///
    /// The source is written verbatim; the page is a pure function of it, so
    /// repeating the call yields identical bytes.
    pub fn render(
        &self,
        conversion_path: &Path,
        filename: &str,
        markdown: &str,
    ) -> Result<RenderedDocument> {
        let md_name = markdown_file_name(filename)?;
        let html_name = html_file_name(&md_name);

        let md_path = conversion_path.join(&md_name);
        fs::write(&md_path, markdown).at(&md_path)?;

        let output = self.processor.convert(markdown);
        for degradation in &output.degradations {
            tracing::warn!("{}: {}", md_name, degradation);
        }

        let page = wrap_page(&html_name, &output.html);
        let html_path = conversion_path.join(&html_name);
        fs::write(&html_path, page).at(&html_path)?;
        tracing::debug!("Rendered {} -> {}", md_name, html_name);

        Ok(RenderedDocument {
            name: md_name.strip_suffix(".md").unwrap_or(&md_name).to_string(),
            md_path,
            html_path,
            degradations: output.degradations,
        })
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap_page(title: &str, body: &str) -> String {
    match sitepress_render::render_page(title, body) {
        Ok(page) => page,
        Err(err) => {
            // Askama only fails on formatter errors; keep the document rather than abort
            tracing::warn!("Page template failed for {}: {}", title, err);
            format!(
                "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
                 <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
                 <title>{}</title>\n<link rel=\"stylesheet\" href=\"{}\">\n</head>\n<body>\n{}\n</body>\n</html>\n",
                crate::markdown::html_escape(title),
                sitepress_render::STYLESHEET_HREF,
                body
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_render_writes_pair() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DocumentRenderer::new();
        let doc = renderer.render(dir.path(), "notes", "# Hi\n\nWorld").unwrap();

        assert_eq!(doc.name, "notes");
        assert_eq!(doc.md_path, dir.path().join("notes.md"));
        assert_eq!(doc.html_path, dir.path().join("notes.html"));
        assert_eq!(fs::read_to_string(&doc.md_path).unwrap(), "# Hi\n\nWorld");

        let html = fs::read_to_string(&doc.html_path).unwrap();
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<p>World</p>"));
        assert!(html.contains("<title>notes.html</title>"));
        assert!(html.contains(r#"href="css/style.css""#));
    }

    #[test]
    fn test_existing_extension_is_not_doubled() {
        let dir = tempfile::tempdir().unwrap();
        let doc = DocumentRenderer::new()
            .render(dir.path(), "readme.md", "text")
            .unwrap();
        assert_eq!(doc.md_path, dir.path().join("readme.md"));
        assert_eq!(doc.html_path, dir.path().join("readme.html"));
        assert!(!dir.path().join("readme.md.md").exists());
    }

    #[test]
    fn test_render_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DocumentRenderer::new();
        let md = "[TOC]\n\n# A\n\n```rust\nlet x = 1;\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";

        let first = renderer.render(dir.path(), "doc", md).unwrap();
        let first_bytes = fs::read(&first.html_path).unwrap();
        let second = renderer.render(dir.path(), "doc", md).unwrap();
        assert_eq!(first_bytes, fs::read(&second.html_path).unwrap());
    }

    #[test]
    fn test_degradations_are_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let doc = DocumentRenderer::new()
            .render(dir.path(), "odd", "```klingon\nqapla'\n```\n")
            .unwrap();
        assert_eq!(doc.degradations.len(), 1);
        assert!(doc.html_path.exists());
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentRenderer::new()
            .render(dir.path(), "../outside", "x")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert!(!dir.path().join("../outside.md").exists());
    }

    #[test]
    fn test_write_failure_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = DocumentRenderer::new()
            .render(&missing, "notes", "x")
            .unwrap_err();
        assert!(err.is_storage());
    }
}
