//! Initialize a new blog

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;

/// Create `_config.yml` and an empty posts directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        bail!("Already initialized: {:?}", config_path);
    }

    let config = SiteConfig::default();
    fs::create_dir_all(target_dir.join(&config.source_dir).join(&config.posts_dir))?;

    let content = format!(
        "# postmatter configuration\n{}",
        serde_yaml::to_string(&config)?
    );
    fs::write(&config_path, content)?;

    tracing::info!("Initialized blog in {:?}", target_dir);
    Ok(())
}
