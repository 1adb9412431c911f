//! Markdown processing pipeline with custom extensions.

pub mod highlight;
pub mod toc;

#[cfg(test)]
mod test_integration;

use crate::models::Degradation;
use pulldown_cmark::{html, Options, Parser};

pub use highlight::HighlightTransformer;
pub use toc::{TocItem, TocTransformer};

/// Output of a single markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOutput {
    pub html: String,
    /// Table of contents for the document, whether or not a `[TOC]` marker placed it
    pub toc_html: Option<String>,
    pub headings: Vec<TocItem>,
    pub degradations: Vec<Degradation>,
}

/// Markdown processor with custom extensions
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        options.insert(Options::ENABLE_DEFINITION_LIST);

        Self { options }
    }

    /// Convert markdown to an HTML fragment.
    ///
    /// Never fails: constructs the parser cannot interpret come out as text,
    /// and highlighting problems are reported as degradations.
    pub fn convert(&self, markdown: &str) -> MarkdownOutput {
        let events: Vec<_> = Parser::new_ext(markdown, self.options).collect();

        // Headings first, so the TOC and heading ids agree
        let toc = TocTransformer::new(&events);
        let events = toc.transform(events);

        let highlighter = HighlightTransformer::new();
        let (events, degradations) = highlighter.transform(events);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());

        MarkdownOutput {
            html: html_output,
            toc_html: toc.render(),
            headings: toc.into_headings(),
            degradations,
        }
    }

    /// Convert markdown to HTML, discarding TOC and diagnostics
    pub fn convert_simple(&self, markdown: &str) -> String {
        self.convert(markdown).html
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let processor = MarkdownProcessor::new();
        let html = processor.convert_simple("# Hello World\n\nThis is a **test**.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<strong>test</strong>"));
    }

    #[test]
    fn test_tables() {
        let processor = MarkdownProcessor::new();
        let md = r#"
| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
"#;
        let html = processor.convert_simple(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Header 1</th>"));
        assert!(html.contains("<td>Cell 2</td>"));
    }

    #[test]
    fn test_code_blocks() {
        let processor = MarkdownProcessor::new();
        let md = "```rust\nfn main() {}\n```";
        let html = processor.convert_simple(md);
        assert!(html.contains("<pre"));
        assert!(html.contains("fn"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_extended_syntax() {
        let processor = MarkdownProcessor::new();
        let md = "~~gone~~\n\n- [x] done\n\nNote[^1]\n\n[^1]: A footnote.\n";
        let html = processor.convert_simple(md);
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains(r#"type="checkbox""#));
        assert!(html.contains("footnote-definition"));
    }

    #[test]
    fn test_malformed_input_degrades_gracefully() {
        let processor = MarkdownProcessor::new();
        let output = processor.convert("# Unclosed [link](\n\n```\nno closing fence\n\n<div>");
        assert!(output.html.contains("Unclosed"));
        assert!(output.html.contains("no closing fence"));
    }

    #[test]
    fn test_text_is_escaped() {
        let processor = MarkdownProcessor::new();
        let html = processor.convert_simple("1 < 2 & 3 > 2");
        assert!(html.contains("1 &lt; 2 &amp; 3 &gt; 2"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
