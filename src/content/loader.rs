//! Content loader - loads posts from the posts directory

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentParser, Post};
use crate::config::ErrorPolicy;
use crate::Site;

/// Source of content file text
pub trait FileReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Reads straight from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// A post together with the file it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedPost {
    /// Full source file path
    pub path: PathBuf,
    /// Source path relative to the site's source directory
    pub source: String,
    pub post: Post,
}

/// Loads content from the posts directory
pub struct ContentLoader<'a, R: FileReader = FsReader> {
    site: &'a Site,
    parser: ContentParser,
    reader: R,
}

impl<'a> ContentLoader<'a, FsReader> {
    /// Create a loader that reads from disk
    pub fn new(site: &'a Site) -> Self {
        Self::with_reader(site, FsReader)
    }
}

impl<'a, R: FileReader> ContentLoader<'a, R> {
    pub fn with_reader(site: &'a Site, reader: R) -> Self {
        Self {
            site,
            parser: site.parser(),
            reader,
        }
    }

    /// All content files under the posts directory, in path order
    pub fn discover(&self) -> Vec<PathBuf> {
        let posts_dir = &self.site.posts_dir;
        if !posts_dir.exists() {
            tracing::debug!("Posts directory {:?} does not exist", posts_dir);
            return Vec::new();
        }

        WalkDir::new(posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Cannot walk {:?}: {}", posts_dir, e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.is_content_file(path))
            .collect()
    }

    /// Load all posts, newest first.
    ///
    /// A post that fails to read or parse is skipped with a warning or aborts
    /// the whole load, depending on `on_error`.
    pub fn load_posts(&self) -> Result<Vec<LoadedPost>> {
        let mut posts = Vec::new();

        for path in self.discover() {
            match self.load_file(&path) {
                Ok(post) => posts.push(post),
                Err(e) => match self.site.config.on_error {
                    ErrorPolicy::Skip => tracing::warn!("Skipping {:?}: {:#}", path, e),
                    ErrorPolicy::Abort => return Err(e),
                },
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| {
            b.post
                .date()
                .cmp(&a.post.date())
                .then_with(|| a.path.cmp(&b.path))
        });

        tracing::info!("Loaded {} post(s)", posts.len());
        Ok(posts)
    }

    /// Read and parse a single file
    pub fn load_file(&self, path: &Path) -> Result<LoadedPost> {
        let content = self
            .reader
            .read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let post = self.parser.parse(&content, path)?;

        let source = path
            .strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        tracing::debug!("Parsed {:?}: {}", path, post.title());
        Ok(LoadedPost {
            path: path.to_path_buf(),
            source,
            post,
        })
    }

    fn is_content_file(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('.'));
        let markup = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.site.config.is_markup_ext(e));
        !hidden && markup
    }
}
