//! Post model

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::frontmatter::{self, DELIMITER};
use super::ContentError;

pub(crate) const TITLE: &str = "title";
pub(crate) const DATE: &str = "date";
pub(crate) const LAYOUT: &str = "layout";
pub(crate) const BACKGROUND: &str = "background";

/// Keys the parser interprets; everything else lands in `extra`
pub const RECOGNIZED_KEYS: [&str; 4] = [TITLE, DATE, LAYOUT, BACKGROUND];

/// Date format written back into front-matter
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A blog post parsed from one content file.
///
/// Posts are immutable: fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    title: String,
    date: NaiveDate,
    layout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<String>,
    /// Uninterpreted front-matter keys, in file order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    extra: IndexMap<String, String>,
    body: String,
}

impl Post {
    pub(crate) fn from_parts(
        title: String,
        date: NaiveDate,
        layout: String,
        background: Option<String>,
        extra: IndexMap<String, String>,
        body: String,
    ) -> Self {
        Self {
            title,
            date,
            layout,
            background,
            extra,
            body,
        }
    }

    /// Start building a post from its required fields
    pub fn builder(
        title: impl Into<String>,
        date: NaiveDate,
        layout: impl Into<String>,
    ) -> PostBuilder {
        PostBuilder::new(title, date, layout)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Presentation template name
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Background image path, as written. Never checked for existence.
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn extra(&self) -> &IndexMap<String, String> {
        &self.extra
    }

    /// Raw markup after the metadata block
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Body as an ordered sequence of lines
    pub fn body_lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines()
    }

    /// Serialize back to the delimited front-matter format
    pub fn to_front_matter(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", DELIMITER)?;
        writeln!(f, "{}", frontmatter::format_field(LAYOUT, &self.layout))?;
        writeln!(f, "{}", frontmatter::format_field(TITLE, &self.title))?;
        writeln!(f, "{}: {}", DATE, self.date.format(DATE_FORMAT))?;
        if let Some(background) = &self.background {
            writeln!(f, "{}", frontmatter::format_field(BACKGROUND, background))?;
        }
        for (key, value) in &self.extra {
            writeln!(f, "{}", frontmatter::format_field(key, value))?;
        }
        writeln!(f, "{}", DELIMITER)?;
        if !self.body.is_empty() {
            writeln!(f, "{}", self.body)?;
        }
        Ok(())
    }
}

/// Builds a [`Post`] in code, with the same validation the parser applies
#[derive(Debug, Clone)]
pub struct PostBuilder {
    source: PathBuf,
    title: String,
    date: NaiveDate,
    layout: String,
    background: Option<String>,
    extra: IndexMap<String, String>,
    body: String,
}

impl PostBuilder {
    pub fn new(title: impl Into<String>, date: NaiveDate, layout: impl Into<String>) -> Self {
        Self {
            source: PathBuf::from("<memory>"),
            title: title.into(),
            date,
            layout: layout.into(),
            background: None,
            extra: IndexMap::new(),
            body: String::new(),
        }
    }

    /// Path reported in validation errors
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = path.into();
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Add a pass-through front-matter key
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Post, ContentError> {
        let path = self.source.as_path();

        for (field, value) in [(TITLE, &self.title), (LAYOUT, &self.layout)] {
            if value.trim().is_empty() {
                return Err(ContentError::MissingField {
                    path: path.to_path_buf(),
                    field,
                });
            }
            single_line(path, field, value)?;
        }
        if let Some(background) = &self.background {
            single_line(path, BACKGROUND, background)?;
        }
        for (key, value) in &self.extra {
            if !frontmatter::is_valid_key(key) || RECOGNIZED_KEYS.contains(&key.as_str()) {
                return Err(ContentError::malformed(
                    path,
                    0,
                    format!("`{}` cannot be used as an extra key", key),
                ));
            }
            single_line(path, key, value)?;
        }

        let body = frontmatter::trim_blank_lines(self.body.lines());
        let background = self.background.filter(|b| !b.trim().is_empty());

        Ok(Post::from_parts(
            self.title,
            self.date,
            self.layout,
            background,
            self.extra,
            body,
        ))
    }
}

fn single_line(path: &Path, key: &str, value: &str) -> Result<(), ContentError> {
    if value.contains(['\n', '\r']) {
        return Err(ContentError::malformed(
            path,
            0,
            format!("value of `{}` contains a line break", key),
        ));
    }
    Ok(())
}
