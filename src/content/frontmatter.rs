//! Front-matter splitting

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::ContentError;

/// Marker line that opens and closes the metadata block
pub const DELIMITER: &str = "---";

lazy_static! {
    static ref FIELD_LINE: Regex =
        Regex::new(r"^(?P<key>[A-Za-z0-9_-]+):(?:[ \t]+(?P<value>.*))?$").unwrap();
    static ref FIELD_KEY: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Raw `key: value` pairs from a content file's metadata block, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, String>,
}

impl FrontMatter {
    /// Split content into its metadata block and body.
    ///
    /// The first line must be the delimiter. Everything up to the next
    /// delimiter line is read as `key: value` pairs; blank lines and `#`
    /// comments in between are ignored. The body is the rest of the text with
    /// leading and trailing blank lines removed.
    pub fn split(content: &str, path: &Path) -> Result<(Self, String), ContentError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.lines().enumerate();

        match lines.next() {
            Some((_, first)) if is_delimiter(first) => {}
            _ => {
                return Err(ContentError::malformed(
                    path,
                    1,
                    format!("first line must be `{}`", DELIMITER),
                ))
            }
        }

        let mut fields = IndexMap::new();
        let mut closed = false;

        for (idx, line) in lines.by_ref() {
            let line_no = idx + 1;
            if is_delimiter(line) {
                closed = true;
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (key, value) = parse_field(line).ok_or_else(|| {
                ContentError::malformed(
                    path,
                    line_no,
                    format!("expected `key: value`, found `{}`", trimmed),
                )
            })?;

            if fields.contains_key(key) {
                return Err(ContentError::malformed(
                    path,
                    line_no,
                    format!("duplicate key `{}`", key),
                ));
            }
            fields.insert(key.to_string(), value);
        }

        if !closed {
            return Err(ContentError::malformed(
                path,
                1,
                format!("front-matter is never closed by a `{}` line", DELIMITER),
            ));
        }

        let body = trim_blank_lines(lines.map(|(_, line)| line));
        tracing::trace!("Split {:?}: {} field(s)", path, fields.len());

        Ok((Self { fields }, body))
    }

    /// Value of a key, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Remove a key and return its value
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.fields.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume into the ordered field map
    pub fn into_fields(self) -> IndexMap<String, String> {
        self.fields
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Parse one metadata line. Indented lines are rejected, so nested YAML
/// structures never slip through as flat pairs.
fn parse_field(line: &str) -> Option<(&str, String)> {
    let caps = FIELD_LINE.captures(line.trim_end())?;
    let key = caps.name("key")?.as_str();
    let value = caps.name("value").map_or("", |m| m.as_str());
    Some((key, unquote(value.trim()).to_string()))
}

/// Strip one layer of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Whether `key` may appear on the left of a metadata line
pub fn is_valid_key(key: &str) -> bool {
    FIELD_KEY.is_match(key)
}

/// Format a `key: value` line that parses back to the same value
pub(crate) fn format_field(key: &str, value: &str) -> String {
    let needs_quotes = value != value.trim()
        || value.starts_with('"')
        || value.starts_with('\'');
    if needs_quotes {
        format!("{}: \"{}\"", key, value)
    } else if value.is_empty() {
        format!("{}:", key)
    } else {
        format!("{}: {}", key, value)
    }
}

/// Join body lines with `\n`, dropping blank lines at either end. A stray
/// `\r` left by `str::lines` on the final line is removed too.
pub(crate) fn trim_blank_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    let lines: Vec<&str> = lines
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());

    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(content: &str) -> Result<(FrontMatter, String), ContentError> {
        FrontMatter::split(content, Path::new("post.md"))
    }

    #[test]
    fn test_split_basic() {
        let content = "---\nlayout: post\ntitle: Hello World\n---\n\nThis is the content.\n\n";
        let (fm, body) = split(content).unwrap();
        assert_eq!(fm.get("layout"), Some("post"));
        assert_eq!(fm.get("title"), Some("Hello World"));
        assert_eq!(body, "This is the content.");
    }

    #[test]
    fn test_fields_keep_file_order() {
        let content = "---\nzeta: 1\nalpha: 2\nmid: 3\n---\n";
        let (fm, _) = split(content).unwrap();
        let keys: Vec<_> = fm.into_fields().into_keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_value_with_colon() {
        let content = "---\ntitle: Errors: a field guide\nlink: https://example.com/x\n---\n";
        let (fm, _) = split(content).unwrap();
        assert_eq!(fm.get("title"), Some("Errors: a field guide"));
        assert_eq!(fm.get("link"), Some("https://example.com/x"));
    }

    #[test]
    fn test_quoted_values() {
        let content = "---\ntitle: \"Quoted: yes\"\nsub: 'single'\nodd: \"half\n---\n";
        let (fm, _) = split(content).unwrap();
        assert_eq!(fm.get("title"), Some("Quoted: yes"));
        assert_eq!(fm.get("sub"), Some("single"));
        assert_eq!(fm.get("odd"), Some("\"half"));
    }

    #[test]
    fn test_empty_value() {
        let (fm, _) = split("---\ntitle:\n---\n").unwrap();
        assert_eq!(fm.get("title"), Some(""));
    }

    #[test]
    fn test_blank_and_comment_lines_ignored() {
        let content = "---\n# drafted on the train\ntitle: Hi\n\nlayout: post\n---\nBody";
        let (fm, body) = split(content).unwrap();
        assert_eq!(fm.len(), 2);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\nline one\r\nline two\r\n";
        let (fm, body) = split(content).unwrap();
        assert_eq!(fm.get("title"), Some("Windows"));
        assert_eq!(body, "line one\nline two");

        let (_, body) = split("---\r\ntitle: Old Mac\r\n---\r\nlast line\r").unwrap();
        assert_eq!(body, "last line");
    }

    #[test]
    fn test_body_inner_blank_lines_and_indent_kept() {
        let content = "---\na: b\n---\n\n\n    indented code\n\nparagraph\n\n\n";
        let (_, body) = split(content).unwrap();
        assert_eq!(body, "    indented code\n\nparagraph");
    }

    #[test]
    fn test_body_may_contain_delimiter() {
        let content = "---\na: b\n---\nabove\n---\nbelow";
        let (_, body) = split(content).unwrap();
        assert_eq!(body, "above\n---\nbelow");
    }

    #[test]
    fn test_missing_opening_delimiter() {
        let err = split("title: x\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_leading_blank_line_is_malformed() {
        let err = split("\n---\ntitle: x\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(split(""), Err(ContentError::Malformed { .. })));
    }

    #[test]
    fn test_unclosed_front_matter() {
        let err = split("---\ntitle: Test\n# No closing").unwrap_err();
        match err {
            ContentError::Malformed { reason, .. } => assert!(reason.contains("never closed")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_pair_line_reports_line_number() {
        let err = split("---\ntitle: ok\njust some prose\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::Malformed { line: 3, .. }));
    }

    #[test]
    fn test_nested_yaml_rejected() {
        let err = split("---\ntags:\n  - rust\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::Malformed { line: 3, .. }));
    }

    #[test]
    fn test_missing_space_after_colon_rejected() {
        let err = split("---\nhttp://example.com\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = split("---\ntitle: a\ntitle: b\n---\n").unwrap_err();
        match err {
            ContentError::Malformed { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("duplicate"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_format_field_quotes_when_needed() {
        assert_eq!(format_field("title", "plain"), "title: plain");
        assert_eq!(format_field("title", " padded"), "title: \" padded\"");
        assert_eq!(format_field("title", "\"quoted\""), "title: \"\"quoted\"\"");
        assert_eq!(format_field("note", ""), "note:");
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("background"));
        assert!(is_valid_key("header-img_2"));
        assert!(!is_valid_key("has space"));
        assert!(!is_valid_key(""));
    }
}
