//! Create a new post

use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::content::{Post, DATE_FORMAT};
use crate::Site;

/// Options for a new post
#[derive(Debug, Default)]
pub struct NewPost<'a> {
    pub title: &'a str,
    /// Falls back to `default_layout`
    pub layout: Option<&'a str>,
    pub background: Option<&'a str>,
    /// Falls back to today
    pub date: Option<NaiveDate>,
}

/// Write `<posts_dir>/<date>-<slug>.md` and return its path
pub fn create_post(site: &Site, opts: &NewPost<'_>) -> Result<PathBuf> {
    let date = opts
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let layout = opts.layout.unwrap_or(&site.config.default_layout);

    let mut builder = Post::builder(opts.title, date, layout);
    if let Some(background) = opts.background {
        builder = builder.background(background);
    }
    let post = builder.build()?;

    let slug = slug::slugify(post.title());
    if slug.is_empty() {
        bail!("Cannot derive a file name from title {:?}", post.title());
    }
    let file_path = site
        .posts_dir
        .join(format!("{}-{}.md", date.format(DATE_FORMAT), slug));

    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(&site.posts_dir)?;
    fs::write(&file_path, post.to_front_matter())?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::ContentLoader;

    #[test]
    fn test_create_post_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2020, 8, 1).unwrap();

        let path = create_post(
            &site,
            &NewPost {
                title: "Exceptions as Error Carriers",
                background: Some("/img/bg-errors.jpg"),
                date: Some(date),
                ..NewPost::default()
            },
        )
        .unwrap();

        assert_eq!(
            path,
            site.posts_dir.join("2020-08-01-exceptions-as-error-carriers.md")
        );

        let loaded = ContentLoader::new(&site).load_file(&path).unwrap();
        assert_eq!(loaded.post.title(), "Exceptions as Error Carriers");
        assert_eq!(loaded.post.layout(), "post");
        assert_eq!(loaded.post.date(), date);
        assert_eq!(loaded.post.background(), Some("/img/bg-errors.jpg"));
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let opts = NewPost {
            title: "Twice",
            date: NaiveDate::from_ymd_opt(2021, 1, 1),
            ..NewPost::default()
        };

        create_post(&site, &opts).unwrap();
        let err = create_post(&site, &opts).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_create_post_requires_title() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let opts = NewPost {
            title: "",
            ..NewPost::default()
        };
        assert!(create_post(&site, &opts).is_err());
    }
}
