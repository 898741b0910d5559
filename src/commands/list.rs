//! List site posts

use anyhow::Result;

use crate::content::loader::{ContentLoader, LoadedPost};
use crate::Site;

/// List posts, newest first
pub fn run(site: &Site, json: bool) -> Result<()> {
    let loader = ContentLoader::new(site);
    let posts = loader.load_posts()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        print!("{}", format_listing(&posts));
    }

    Ok(())
}

/// Plain-text listing, one post per line
pub fn format_listing(posts: &[LoadedPost]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for loaded in posts {
        let post = &loaded.post;
        out.push_str(&format!(
            "  {} - {} ({}) [{}]\n",
            post.date().format("%Y-%m-%d"),
            post.title(),
            post.layout(),
            loaded.source
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    #[test]
    fn test_format_listing() {
        let post = Post::builder("Example", NaiveDate::from_ymd_opt(2020, 8, 1).unwrap(), "post")
            .build()
            .unwrap();
        let loaded = LoadedPost {
            path: PathBuf::from("/blog/_posts/example.md"),
            source: "_posts/example.md".to_string(),
            post,
        };

        assert_eq!(
            format_listing(&[loaded]),
            "Posts (1):\n  2020-08-01 - Example (post) [_posts/example.md]\n"
        );
    }

    #[test]
    fn test_format_listing_empty() {
        assert_eq!(format_listing(&[]), "Posts (0):\n");
    }
}
