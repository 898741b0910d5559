//! Content validation errors

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn a content file into a [`Post`](super::Post).
///
/// All variants are local validation failures. The caller decides whether a
/// bad file aborts a batch or is skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("{}:{line}: malformed content: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        /// 1-based line number, 0 when the problem is not tied to a line
        line: usize,
        reason: String,
    },

    #[error("{}: missing required field `{field}`", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{}: invalid date `{value}`", .path.display())]
    InvalidDate { path: PathBuf, value: String },
}

impl ContentError {
    pub(crate) fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        ContentError::Malformed {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    /// Path of the offending file
    pub fn path(&self) -> &Path {
        match self {
            ContentError::Malformed { path, .. }
            | ContentError::MissingField { path, .. }
            | ContentError::InvalidDate { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_includes_line() {
        let err = ContentError::malformed(Path::new("_posts/a.md"), 3, "expected `key: value`");
        assert_eq!(
            err.to_string(),
            "_posts/a.md:3: malformed content: expected `key: value`"
        );
    }

    #[test]
    fn test_path_accessor() {
        let err = ContentError::MissingField {
            path: PathBuf::from("b.md"),
            field: "title",
        };
        assert_eq!(err.path(), Path::new("b.md"));
        assert_eq!(err.to_string(), "b.md: missing required field `title`");
    }
}
