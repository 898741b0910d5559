//! Render a single content file

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::loader::ContentLoader;
use crate::content::{render_post, RenderedPost};
use crate::Site;

/// Parse and render one file
pub fn render_file(site: &Site, file: &Path) -> Result<RenderedPost> {
    let loader = ContentLoader::new(site);
    let loaded = loader.load_file(file)?;
    let renderer = site.renderer();
    render_post(&renderer, &loaded.post, &site.config.excerpt_separator)
        .with_context(|| format!("rendering {}", file.display()))
}

/// Run the render command
pub fn run(site: &Site, file: &Path, output: Option<&Path>, json: bool) -> Result<()> {
    let rendered = render_file(site, file)?;
    let text = if json {
        serde_json::to_string_pretty(&rendered)?
    } else {
        rendered.content
    };

    match output {
        Some(out) => {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(out, text).with_context(|| format!("writing {}", out.display()))?;
            tracing::info!("Wrote {:?}", out);
        }
        None => print!("{}", text),
    }

    Ok(())
}
