//! Code syntax highlighting using syntect.

use crate::markdown::html_escape;
use crate::models::Degradation;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME: OnceLock<Theme> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    THEME.get_or_init(|| {
        let theme_set = ThemeSet::load_defaults();
        theme_set
            .themes
            .get("InspiredGitHub")
            .or_else(|| theme_set.themes.get("base16-ocean.light"))
            .cloned()
            .unwrap_or_default()
    })
}

/// Transformer for syntax highlighting code blocks
pub struct HighlightTransformer;

impl HighlightTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Replace fenced code blocks that name a language with highlighted HTML.
    ///
    /// Returns the transformed events and any fallbacks taken on the way.
    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> (Vec<Event<'a>>, Vec<Degradation>) {
        let mut result = Vec::with_capacity(events.len());
        let mut degradations = Vec::new();
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                    if language_token(&info).is_some() =>
                {
                    code_lang = language_token(&info).map(str::to_string);
                    code_content.clear();
                }
                Event::Text(text) if code_lang.is_some() => {
                    code_content.push_str(text.as_ref());
                }
                Event::End(TagEnd::CodeBlock) if code_lang.is_some() => {
                    if let Some(lang) = code_lang.take() {
                        let html = self.highlight_code(&code_content, &lang, &mut degradations);
                        result.push(Event::Html(CowStr::from(html)));
                    }
                }
                other => result.push(other),
            }
        }

        // An unterminated block still holds its text; never drop content
        if let Some(lang) = code_lang {
            let html = self.highlight_code(&code_content, &lang, &mut degradations);
            result.push(Event::Html(CowStr::from(html)));
        }

        (result, degradations)
    }

    fn highlight_code(
        &self,
        code: &str,
        lang: &str,
        degradations: &mut Vec<Degradation>,
    ) -> String {
        let ss = syntax_set();
        let Some(syntax) = find_syntax(ss, lang) else {
            tracing::debug!("No syntax for code language '{}'", lang);
            degradations.push(Degradation::UnknownLanguage {
                language: lang.to_string(),
            });
            return plain_block(code, lang);
        };

        match highlighted_html_for_string(code, ss, syntax, theme()) {
            Ok(html) => format!(
                "<div class=\"highlight language-{}\">{}</div>\n",
                html_escape(lang),
                html
            ),
            Err(err) => {
                degradations.push(Degradation::HighlightFailed {
                    language: lang.to_string(),
                    message: err.to_string(),
                });
                plain_block(code, lang)
            }
        }
    }
}

impl Default for HighlightTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// First word of a fence info string: "rust,ignore" and "python {x}" give the language.
fn language_token(info: &str) -> Option<&str> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|lang| !lang.is_empty())
}

fn find_syntax<'s>(ss: &'s SyntaxSet, lang: &str) -> Option<&'s SyntaxReference> {
    ss.find_syntax_by_token(lang)
        .or_else(|| ss.find_syntax_by_extension(lang))
}

fn plain_block(code: &str, lang: &str) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>\n",
        html_escape(lang),
        html_escape(code)
    )
}
