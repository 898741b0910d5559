//! Markup rendering collaborators

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::Post;
use crate::config::HighlightConfig;

/// Turns a post body into renderable output
pub trait MarkupRenderer {
    fn render(&self, markup: &str) -> Result<String>;
}

/// A post ready to hand to a template: metadata plus rendered HTML
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPost {
    pub title: String,
    pub date: NaiveDate,
    pub layout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, String>,
    /// Rendered body
    pub content: String,
    /// Rendered text before the excerpt separator, if the body has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// Render a post's body. The post itself is left untouched.
pub fn render_post<R: MarkupRenderer + ?Sized>(
    renderer: &R,
    post: &Post,
    excerpt_separator: &str,
) -> Result<RenderedPost> {
    let (excerpt_md, full_md) = split_excerpt(post.body(), excerpt_separator);
    let content = renderer.render(&full_md)?;
    let excerpt = excerpt_md.map(|e| renderer.render(&e)).transpose()?;

    Ok(RenderedPost {
        title: post.title().to_string(),
        date: post.date(),
        layout: post.layout().to_string(),
        background: post.background().map(str::to_string),
        extra: post.extra().clone(),
        content,
        excerpt,
    })
}

/// Split a body at the first line that is exactly the excerpt separator.
/// Separators inside fenced code blocks are ignored.
/// Returns (excerpt, body without the separator).
pub fn split_excerpt(content: &str, separator: &str) -> (Option<String>, String) {
    let separator = separator.trim();
    if separator.is_empty() {
        return (None, content.to_string());
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut fence: Option<&str> = None;

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if let Some(marker) = ["```", "~~~"].into_iter().find(|m| trimmed.starts_with(m)) {
            fence = Some(marker);
            continue;
        }

        if trimmed == separator {
            let excerpt = lines[..idx].join("\n").trim().to_string();
            let remaining = lines[idx + 1..].join("\n");
            let full = format!("{}\n\n{}", excerpt, remaining.trim());
            return (Some(excerpt), full);
        }
    }

    (None, content.to_string())
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    pub fn with_options(highlight: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: highlight.theme.clone(),
            line_numbers: highlight.line_number,
        }
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String> {
        let lang = lang.unwrap_or("text");
        // The fence info string is user text; it only ever reaches HTML escaped
        let class = html_escape(lang);

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
            .ok_or_else(|| anyhow!("no highlight themes available"))?;

        let lines = self.highlight_lines(code, syntax, theme).unwrap_or_else(|e| {
            tracing::debug!("Highlighting {} failed, emitting plain block: {}", lang, e);
            code.lines().map(html_escape).collect()
        });
        let pre_style = theme
            .settings
            .background
            .map(|c| format!(r#" style="background-color:#{:02x}{:02x}{:02x};""#, c.r, c.g, c.b))
            .unwrap_or_default();

        let block = if self.line_numbers {
            with_line_numbers(&lines, &class, &pre_style)
        } else {
            format!(
                r#"<pre{}><code class="language-{}">{}</code></pre>"#,
                pre_style,
                class,
                lines.join("\n")
            )
        };
        Ok(block)
    }

    /// Highlight source line by line, one HTML fragment per line
    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<Vec<String>> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        LinesWithEndings::from(code)
            .map(|line| -> Result<String> {
                let regions: Vec<(Style, &str)> = highlighter
                    .highlight_line(line, &self.syntax_set)?
                    .into_iter()
                    .map(|(style, text)| (style, text.trim_end_matches(['\r', '\n'])))
                    .collect();
                Ok(styled_line_to_highlighted_html(&regions, IncludeBackground::No)?)
            })
            .collect()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        // Front-matter never reaches the renderer, so YAML metadata blocks stay off
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code = String::new();

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let block = self.highlight_code(&code, code_lang.as_deref())?;
                    events.push(Event::Html(CowStr::from(block)));
                    in_code_block = false;
                    code_lang = None;
                }
                Event::Text(text) if in_code_block => code.push_str(&text),
                _ if in_code_block => {}
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        Ok(html_output)
    }
}

fn with_line_numbers(lines: &[String], class: &str, pre_style: &str) -> String {
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre{}>{}</pre></td></tr></table></figure>"#,
        class,
        gutter,
        pre_style,
        lines.join("\n")
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
