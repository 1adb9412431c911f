//! Integration tests for markdown processing

use super::*;

#[test]
fn test_full_document() {
    let markdown = r#"[TOC]

# Install

Run the installer.

## Configure `app`

| key | value |
|-----|-------|
| a   | 1     |

```python
port = 8000
```

Term
: Definition
"#;

    let processor = MarkdownProcessor::new();
    let output = processor.convert(markdown);

    assert!(output.degradations.is_empty());
    assert_eq!(output.headings.len(), 2);
    assert!(output.html.starts_with(r#"<nav class="toc">"#));
    assert!(output.html.contains(r#"<h1 id="install">Install</h1>"#));
    assert!(output.html.contains(r#"<h2 id="configure-app">"#));
    assert!(output.html.contains("<table>"));
    assert!(output.html.contains("highlight language-python"));
    assert!(output.html.contains("<dl>"));
    let toc = output.toc_html.as_deref().unwrap();
    assert!(output.html.contains(toc));
}

#[test]
fn test_toc_available_without_marker() {
    let processor = MarkdownProcessor::new();
    let output = processor.convert("# One\n\n## Two\n");
    let toc = output.toc_html.unwrap();
    assert!(toc.contains(r##"href="#one""##));
    assert!(toc.contains(r#"class="toc-level-2""#));
    assert!(!output.html.contains("<nav"));
}

#[test]
fn test_raw_html_passes_through() {
    let processor = MarkdownProcessor::new();
    let html = processor.convert_simple("<div class=\"note\">kept</div>\n");
    assert!(html.contains("<div class=\"note\">kept</div>"));
}

#[test]
fn test_empty_input() {
    let processor = MarkdownProcessor::new();
    let output = processor.convert("");
    assert!(output.html.is_empty());
    assert!(output.toc_html.is_none());
}
