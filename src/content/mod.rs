//! Content module - front-matter parsing, posts, loading and rendering

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod parser;
mod post;

pub use error::ContentError;
pub use frontmatter::{is_valid_key, FrontMatter, DELIMITER};
pub use loader::{ContentLoader, FileReader, FsReader, LoadedPost};
pub use markdown::{render_post, split_excerpt, MarkdownRenderer, MarkupRenderer, RenderedPost};
pub use parser::ContentParser;
pub use post::{Post, PostBuilder, DATE_FORMAT, RECOGNIZED_KEYS};
