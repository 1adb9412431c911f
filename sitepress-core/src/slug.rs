//! Anchor slugs for heading ids.

use unicode_segmentation::UnicodeSegmentation;

/// Convert heading text to a URL-fragment-safe slug
///
/// Lowercases, turns whitespace and underscores into single hyphens, drops
/// punctuation, keeps unicode letters, and trims hyphens from both ends.
///
/// # Examples
///
/// ```
/// use sitepress_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("C++ Programming"), "c-programming");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();
    let mut slug = String::with_capacity(lowercased.len());
    let mut pending_hyphen = false;

    for g in lowercased.graphemes(true) {
        let Some(c) = g.chars().next() else {
            continue;
        };
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_hyphen = true;
        } else if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push_str(g);
        }
    }

    slug
}
