//! Askama template definitions.

use askama::Template;

use crate::assets::STYLESHEET_HREF;

/// A standalone HTML page around a rendered markdown fragment.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate<'a> {
    /// Page title; escaped on output.
    pub title: &'a str,
    pub stylesheet_href: &'a str,
    /// Pre-rendered HTML body, inserted verbatim.
    pub content: &'a str,
}

impl<'a> PageTemplate<'a> {
    pub fn new(title: &'a str, content: &'a str) -> Self {
        Self {
            title,
            stylesheet_href: STYLESHEET_HREF,
            content,
        }
    }
}

/// Wrap an HTML fragment into a complete page.
pub fn render_page(title: &str, content: &str) -> Result<String, askama::Error> {
    PageTemplate::new(title, content).render()
}
