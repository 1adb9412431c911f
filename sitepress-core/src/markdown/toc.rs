//! Table of contents generation from document headings.
//!
//! Headings are always collected. A paragraph holding only `[TOC]` is
//! replaced by the rendered table, and in that case headings without an
//! explicit `{#id}` get generated ids so the table's links resolve.

use crate::markdown::html_escape;
use crate::slug::slugify;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use serde::Serialize;
use std::collections::HashSet;

const TOC_MARKER: &str = "[TOC]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub level: u32,
    pub title: String,
    pub id: String,
    /// Whether the id came from a `{#id}` attribute in the source
    #[serde(skip)]
    explicit: bool,
}

/// Collects headings and substitutes `[TOC]` markers
pub struct TocTransformer {
    headings: Vec<TocItem>,
}

impl TocTransformer {
    pub fn new(events: &[Event<'_>]) -> Self {
        Self {
            headings: collect_headings(events),
        }
    }

    pub fn into_headings(self) -> Vec<TocItem> {
        self.headings
    }

    /// Replace marker paragraphs and, if any were found, attach heading ids.
    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let markers = marker_ranges(&events);
        if markers.is_empty() {
            return events;
        }

        let nav = self.render();
        let mut markers = markers.into_iter().peekable();
        let mut headings = self.headings.iter();
        let mut result = Vec::with_capacity(events.len());

        for (idx, event) in events.into_iter().enumerate() {
            while markers.peek().is_some_and(|&(_, end)| idx > end) {
                markers.next();
            }
            if let Some(&(start, end)) = markers.peek() {
                if idx >= start && idx <= end {
                    if idx == start {
                        if let Some(nav) = &nav {
                            result.push(Event::Html(CowStr::from(format!("{}\n", nav))));
                        }
                    }
                    continue;
                }
            }

            match event {
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    let generated = headings.next();
                    let id = id.or_else(|| generated.map(|h| CowStr::from(h.id.clone())));
                    result.push(Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    }));
                }
                other => result.push(other),
            }
        }

        result
    }

    /// Render the table of contents as a `<nav>` block
    pub fn render(&self) -> Option<String> {
        if self.headings.is_empty() {
            return None;
        }

        let mut html = String::from(r#"<nav class="toc"><ul>"#);
        for h in &self.headings {
            html.push_str(&format!(
                r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
                h.level,
                html_escape(&h.id),
                html_escape(&h.title)
            ));
        }
        html.push_str("</ul></nav>");
        Some(html)
    }
}

fn collect_headings(events: &[Event<'_>]) -> Vec<TocItem> {
    let mut toc = Vec::new();
    // Explicit ids are reserved before any slug is generated
    let mut used: HashSet<String> = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect();
    let mut current: Option<(u32, Option<String>, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((*level as u32, id.as_ref().map(|s| s.to_string()), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut title)) = current {
                    title.push_str(text.as_ref());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, explicit_id, title)) = current.take() {
                    let explicit = explicit_id.is_some();
                    let id = match explicit_id {
                        Some(id) => id,
                        None => unique_id(&title, &used),
                    };
                    used.insert(id.clone());
                    toc.push(TocItem {
                        level,
                        title,
                        id,
                        explicit,
                    });
                }
            }
            _ => {}
        }
    }

    toc
}

fn unique_id(title: &str, used: &HashSet<String>) -> String {
    let mut base = slugify(title);
    if base.is_empty() {
        base = String::from("section");
    }
    if !used.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or(base)
}

/// Inclusive event ranges of paragraphs consisting solely of the marker
fn marker_ranges(events: &[Event<'_>]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < events.len() {
        if !matches!(events[i], Event::Start(Tag::Paragraph)) {
            i += 1;
            continue;
        }

        let mut text = String::new();
        let mut plain = true;
        let mut j = i + 1;
        while j < events.len() {
            match &events[j] {
                Event::End(TagEnd::Paragraph) => break,
                Event::Text(t) => text.push_str(t),
                _ => plain = false,
            }
            j += 1;
        }

        if plain && j < events.len() && text.trim() == TOC_MARKER {
            ranges.push((i, j));
        }
        i = j + 1;
    }

    ranges
}
