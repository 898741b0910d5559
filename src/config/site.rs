//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,
    pub markdown_ext: Vec<String>,

    // Writing
    pub default_layout: String,
    /// chrono format for the `date` front-matter key
    pub date_format: String,
    pub excerpt_separator: String,

    /// What to do with a post that fails to parse
    pub on_error: ErrorPolicy,

    #[serde(default)]
    pub highlight: HighlightConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),

            source_dir: ".".to_string(),
            posts_dir: "_posts".to_string(),
            markdown_ext: vec!["md".to_string(), "markdown".to_string()],

            default_layout: "post".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            excerpt_separator: "<!-- more -->".to_string(),

            on_error: ErrorPolicy::default(),

            highlight: HighlightConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Whether a file extension marks a content file
    pub fn is_markup_ext(&self, ext: &str) -> bool {
        self.markdown_ext
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Batch policy for posts that fail to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log a warning and leave the post out
    #[default]
    Skip,
    /// Stop at the first bad post
    Abort,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}
