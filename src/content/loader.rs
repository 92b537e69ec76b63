//! Content loader - loads markdown nodes from the content directory

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownNode, MarkdownRenderer};
use crate::Site;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        let renderer = MarkdownRenderer::from_config(&site.config.highlight);
        Self { site, renderer }
    }

    /// Load every markdown document under the content directory
    pub fn load_nodes(&self) -> Result<Vec<MarkdownNode>> {
        if !self.site.source_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", self.site.source_dir);
            return Ok(Vec::new());
        }

        let mut nodes = Vec::new();

        for entry in WalkDir::new(&self.site.source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_node(path) {
                Ok(node) => {
                    if node.frontmatter.is_visible() || self.site.config.render_drafts {
                        nodes.push(node);
                    } else {
                        tracing::debug!("Skipping unpublished {}", node.source);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", path, e);
                }
            }
        }

        // Newest first; undated documents last, ties broken by source path
        nodes.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.source.cmp(&b.source)));

        Ok(nodes)
    }

    /// Load a single markdown document
    pub fn load_node(&self, path: &Path) -> Result<MarkdownNode> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let source = path
            .strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        if fm.date.is_some() && fm.parse_date().is_none() {
            tracing::warn!("{}: unrecognised date {:?}", source, fm.date);
        }

        let html = self.renderer.render(body)?;

        let mut node = MarkdownNode::new(source, fm, body.to_string(), html);
        node.full_source = path.to_path_buf();

        Ok(node)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_with(files: &[(&str, &str)]) -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            let path = dir.path().join("content").join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_load_nodes_sorted_newest_first() {
        let (_dir, site) = site_with(&[
            ("old.md", "---\ntitle: Old\ndate: 2019-05-01\npath: /old\n---\nold"),
            ("new.md", "---\ntitle: New\ndate: 2021-05-01\npath: /new\n---\nnew"),
            ("nested/undated.md", "---\ntitle: Undated\npath: /undated\n---\n"),
        ]);

        let nodes = ContentLoader::new(&site).load_nodes().unwrap();
        let titles: Vec<_> = nodes.iter().filter_map(|n| n.title()).collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
        assert_eq!(nodes[2].source, "nested/undated.md");
        assert_eq!(nodes[0].html, "<p>new</p>\n");
    }

    #[test]
    fn test_drafts_skipped_unless_enabled() {
        let (_dir, mut site) = site_with(&[
            ("live.md", "---\ntitle: Live\npath: /live\n---\n"),
            ("wip.md", "---\ntitle: Wip\npath: /wip\ndraft: true\n---\n"),
        ]);

        let nodes = ContentLoader::new(&site).load_nodes().unwrap();
        assert_eq!(nodes.len(), 1);

        site.config.render_drafts = true;
        let nodes = ContentLoader::new(&site).load_nodes().unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_non_markdown_ignored() {
        let (_dir, site) = site_with(&[
            ("a.md", "---\ntitle: A\npath: /a\n---\n"),
            ("image.png", "not markdown"),
        ]);
        let nodes = ContentLoader::new(&site).load_nodes().unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&site).load_nodes().unwrap().is_empty());
    }
}
