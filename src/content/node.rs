//! Markdown node model

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::FrontMatter;

/// One markdown document after front-matter parsing and HTML transform
#[derive(Debug, Clone)]
pub struct MarkdownNode {
    /// Source file path relative to the content directory
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Parsed front-matter, as written in the file
    pub frontmatter: FrontMatter,

    /// Parsed front-matter date, if any
    pub date: Option<DateTime<Utc>>,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub html: String,
}

impl MarkdownNode {
    pub fn new(source: String, frontmatter: FrontMatter, raw: String, html: String) -> Self {
        let date = frontmatter.parse_date();
        Self {
            full_source: PathBuf::from(&source),
            source,
            frontmatter,
            date,
            raw,
            html,
        }
    }

    /// The page path this node is published at
    pub fn path(&self) -> Option<&str> {
        self.frontmatter.path.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.frontmatter.title.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parses_date() {
        let fm = FrontMatter {
            title: Some("Hello".to_string()),
            date: Some("2020-01-01".to_string()),
            path: Some("/hello".to_string()),
            ..Default::default()
        };
        let node = MarkdownNode::new("hello.md".into(), fm, "Hi".into(), "<p>Hi</p>".into());
        assert_eq!(node.path(), Some("/hello"));
        assert_eq!(node.title(), Some("Hello"));
        assert_eq!(
            node.date.map(|d| d.format("%Y-%m-%d").to_string()),
            Some("2020-01-01".to_string())
        );
    }
}
