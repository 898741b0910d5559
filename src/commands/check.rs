//! Validate every post without stopping at the first failure

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::content::loader::ContentLoader;
use crate::Site;

/// Outcome of checking the posts directory
#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parse every content file, collecting failures instead of applying `on_error`
pub fn check_posts(site: &Site) -> CheckReport {
    let loader = ContentLoader::new(site);
    let mut report = CheckReport::default();

    for path in loader.discover() {
        report.checked += 1;
        if let Err(e) = loader.load_file(&path) {
            tracing::debug!("Check failed for {:?}: {:#}", path, e);
            report.failures.push((path, format!("{:#}", e)));
        }
    }

    report
}

/// Run the check command
pub fn run(site: &Site) -> Result<()> {
    let report = check_posts(site);

    for (_, message) in &report.failures {
        println!("  {}", message);
    }

    if !report.is_ok() {
        bail!(
            "{} of {} post(s) failed to parse",
            report.failures.len(),
            report.checked
        );
    }

    println!("Checked {} post(s), all valid", report.checked);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ErrorPolicy, SiteConfig};
    use std::fs;

    #[test]
    fn test_check_collects_every_failure() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("_posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("a.md"),
            "---\nlayout: post\ntitle: A\ndate: 2020-08-01\n---\n",
        )
        .unwrap();
        fs::write(posts.join("b.md"), "no front matter").unwrap();
        fs::write(posts.join("c.md"), "---\nlayout: post\ndate: 2020-08-01\n---\n").unwrap();

        // Abort policy must not cut the report short
        let config = SiteConfig {
            on_error: ErrorPolicy::Abort,
            ..SiteConfig::default()
        };
        let site = Site::with_config(dir.path(), config);
        let report = check_posts(&site);

        assert_eq!(report.checked, 3);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures[0].1.contains("malformed content"));
        assert!(report.failures[1].1.contains("missing required field `title`"));
        assert!(run(&site).is_err());
    }

    #[test]
    fn test_check_empty_site_passes() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(check_posts(&site).is_ok());
        assert!(run(&site).is_ok());
    }
}
