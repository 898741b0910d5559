//! postmatter: front-matter post parsing for markdown blogs
//!
//! The core is [`content::ContentParser`], a pure function from a content
//! file's text to a validated [`content::Post`]. Around it sit the
//! collaborators a blog needs: a filesystem loader, a markdown renderer and
//! a small CLI.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Directory holding post files
    pub posts_dir: PathBuf,
}

impl Site {
    /// Open a site, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = match config.source_dir.as_str() {
            "" | "." => base_dir.clone(),
            dir => base_dir.join(dir),
        };
        let posts_dir = source_dir.join(&config.posts_dir);

        Self {
            config,
            base_dir,
            source_dir,
            posts_dir,
        }
    }

    /// Parser honoring the configured date format
    pub fn parser(&self) -> content::ContentParser {
        content::ContentParser::with_date_format(&self.config.date_format)
    }

    pub fn renderer(&self) -> content::MarkdownRenderer {
        content::MarkdownRenderer::with_options(&self.config.highlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_site_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.source_dir, dir.path());
        assert_eq!(site.posts_dir, dir.path().join("_posts"));
    }

    #[test]
    fn test_site_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "source_dir: src\nposts_dir: articles\ndate_format: \"%d/%m/%Y\"\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.posts_dir, dir.path().join("src").join("articles"));
        assert_eq!(site.parser().date_format(), "%d/%m/%Y");
    }

    #[test]
    fn test_site_rejects_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "on_error: sometimes\n").unwrap();
        assert!(Site::new(dir.path()).is_err());
    }
}
