//! Generator module - runs the page query for every path and writes HTML files

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::helpers::{date_xml, escape_html, full_url_for};
use crate::query::{NodeStore, PageQuery, QueryError};
use crate::templates::{LayoutData, SiteData, TemplateRenderer};
use crate::Site;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("page path {0:?} does not resolve inside the public directory")]
    UnsafePath(String),
}

/// Counts reported after a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub pages: usize,
    pub assets: usize,
}

/// Static site generator
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator, picking up template overrides from the site
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::load(&site.template_dir)?;

        Ok(Self {
            site: site.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, store: &NodeStore) -> Result<GenerateReport> {
        fs::create_dir_all(&self.site.public_dir)?;

        let assets = self.copy_static_assets()?;

        let targets = plan_outputs(&self.site.public_dir, store)?;

        let query = PageQuery::new(store, &self.site.config.date_format);
        let mut pages = 0;

        for (path, output_path) in targets {
            let html = self.render_page(&query, store, path)?;

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            tracing::debug!("Generated: {:?}", output_path);
            pages += 1;
        }

        Ok(GenerateReport { pages, assets })
    }

    /// Render the full HTML document for one page path
    pub fn render_page(&self, query: &PageQuery, store: &NodeStore, path: &str) -> Result<String> {
        let data = query.run(path)?;
        let fragment = self.renderer.render_blog_post(&data)?;

        let config = &self.site.config;
        let layout = LayoutData {
            site: SiteData {
                title: config.title.clone(),
                description: config.description.clone(),
                author: config.author.clone(),
                language: config.language.clone(),
            },
            page_title: data.frontmatter.title.clone().unwrap_or_default(),
            canonical_url: escape_html(&full_url_for(config, path)),
            published_time: store.get(path).and_then(|n| n.date).map(|d| date_xml(&d)),
            body: fragment,
            version: env!("CARGO_PKG_VERSION"),
        };

        self.renderer.render_layout(&layout)
    }

    /// Copy the static directory verbatim into the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest)?;
            copied += 1;
        }

        Ok(copied)
    }
}

/// Resolve every page path to its output file
///
/// `/a`, `/a/` and `a` are distinct query keys but share one output file, so
/// collisions are checked on the resolved file rather than the raw path.
fn plan_outputs<'s>(
    public_dir: &Path,
    store: &'s NodeStore,
) -> Result<Vec<(&'s str, PathBuf)>> {
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
    let mut targets = Vec::new();

    for path in store.paths() {
        let output_path = output_path_for(public_dir, path)?;
        if let Some(&first) = claimed.get(&output_path) {
            let source_of = |p: &str| store.get(p).map(|n| n.source.clone()).unwrap_or_default();
            return Err(QueryError::DuplicatePath {
                path: path.to_string(),
                first: source_of(first),
                second: source_of(path),
            }
            .into());
        }
        claimed.insert(output_path.clone(), path);
        targets.push((path, output_path));
    }

    Ok(targets)
}

/// Map a page path to `<public>/<path>/index.html`
pub fn output_path_for(public_dir: &Path, page_path: &str) -> Result<PathBuf, GenerateError> {
    let mut out = public_dir.to_path_buf();

    for component in Path::new(page_path.trim_matches('/')).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return Err(GenerateError::UnsafePath(page_path.to_string())),
        }
    }

    Ok(out.join("index.html"))
}
