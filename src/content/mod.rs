//! Content module - loads markdown documents and transforms them to HTML

mod frontmatter;
pub mod loader;
mod markdown;
mod node;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use node::MarkdownNode;
