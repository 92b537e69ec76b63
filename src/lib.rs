//! pathpress: a static blog builder
//!
//! Markdown documents under the content directory carry a `path` in their
//! front-matter. For every path, a page query selects the rendered HTML,
//! title and formatted date, the blog post template renders them into a fixed
//! markup tree, and the result is written to `public/<path>/index.html`.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod query;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown content directory
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Files copied verbatim into the output
    pub static_dir: PathBuf,
    /// Template overrides
    pub template_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let template_dir = base_dir.join("templates");

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            static_dir,
            template_dir,
        }
    }

    /// Path of the site configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<generator::GenerateReport> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, path: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_site_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.source_dir, dir.path().join("content"));
        assert_eq!(site.public_dir, dir.path().join("public"));
        assert_eq!(site.static_dir, dir.path().join("static"));
        assert_eq!(site.template_dir, dir.path().join("templates"));
    }

    #[test]
    fn test_site_reads_config_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "source_dir: posts\npublic_dir: dist\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.source_dir, dir.path().join("posts"));
        assert_eq!(site.public_dir, dir.path().join("dist"));
    }

    #[test]
    fn test_site_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: [unclosed\n").unwrap();
        assert!(Site::new(dir.path()).is_err());
    }
}
