//! Content parser - turns raw file text into a validated [`Post`]

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::Path;

use super::frontmatter::FrontMatter;
use super::post::{BACKGROUND, DATE, DATE_FORMAT, LAYOUT, TITLE};
use super::{ContentError, Post};

/// Date/time forms accepted after the primary format; only the calendar
/// date is kept
const FALLBACK_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const FALLBACK_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Stateless front-matter parser.
///
/// Parsing is a pure function of the input text, so one parser can be shared
/// freely across threads.
#[derive(Debug, Clone)]
pub struct ContentParser {
    date_format: String,
}

impl Default for ContentParser {
    fn default() -> Self {
        Self {
            date_format: DATE_FORMAT.to_string(),
        }
    }
}

impl ContentParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser whose primary `date` format is a chrono format string
    pub fn with_date_format(format: impl Into<String>) -> Self {
        Self {
            date_format: format.into(),
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Parse one content file.
    ///
    /// `path` is only used to label errors. The first problem found is
    /// returned; nothing is defaulted.
    pub fn parse(&self, content: &str, path: &Path) -> Result<Post, ContentError> {
        let (mut fm, body) = FrontMatter::split(content, path)?;

        let title = required(&mut fm, TITLE, path)?;
        let date_value = required(&mut fm, DATE, path)?;
        let layout = required(&mut fm, LAYOUT, path)?;

        let date = self
            .parse_date(&date_value)
            .ok_or_else(|| ContentError::InvalidDate {
                path: path.to_path_buf(),
                value: date_value.clone(),
            })?;

        let background = fm.take(BACKGROUND).filter(|b| !b.trim().is_empty());

        if !fm.is_empty() {
            tracing::debug!(
                "{:?}: passing through {} extra front-matter key(s)",
                path,
                fm.len()
            );
        }

        Ok(Post::from_parts(
            title,
            date,
            layout,
            background,
            fm.into_fields(),
            body,
        ))
    }

    /// Parse a `date` value into a calendar date
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();

        if let Ok(date) = NaiveDate::parse_from_str(value, &self.date_format) {
            return Some(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, &self.date_format) {
            return Some(dt.date());
        }

        for fmt in FALLBACK_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
                return Some(date);
            }
        }
        for fmt in FALLBACK_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(dt.date());
            }
        }

        // RFC 3339 / ISO 8601 with offset; keep the date as written
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.naive_local().date())
    }
}

fn required(
    fm: &mut FrontMatter,
    field: &'static str,
    path: &Path,
) -> Result<String, ContentError> {
    match fm.take(field) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ContentError::MissingField {
            path: path.to_path_buf(),
            field,
        }),
    }
}
