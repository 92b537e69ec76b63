//! Blog post template and page layout, rendered with Tera
//!
//! The built-in templates are embedded in the binary. A site can replace
//! either one by placing a file of the same name in its `templates/`
//! directory.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::query::MarkdownRemark;

pub const BLOG_POST_TEMPLATE: &str = "blog_post.html";
pub const LAYOUT_TEMPLATE: &str = "layout.html";

/// Template renderer for blog post pages
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with the built-in templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Escaping is explicit in the templates: text fields go through
        // `escape`, the rendered markdown body must stay raw
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            (BLOG_POST_TEMPLATE, include_str!("blog_post.html")),
            (LAYOUT_TEMPLATE, include_str!("layout.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Create a renderer, preferring templates found in `template_dir`
    pub fn load(template_dir: &Path) -> Result<Self> {
        let mut renderer = Self::new()?;

        for name in [BLOG_POST_TEMPLATE, LAYOUT_TEMPLATE] {
            let path = template_dir.join(name);
            if !path.is_file() {
                continue;
            }
            let source = fs::read_to_string(&path)?;
            renderer
                .tera
                .add_raw_template(name, &source)
                .with_context(|| format!("Invalid template {:?}", path))?;
            tracing::info!("Using template override {:?}", path);
        }

        Ok(renderer)
    }

    /// Render the blog post fragment for one query result
    ///
    /// Missing fields render as empty elements.
    pub fn render_blog_post(&self, data: &MarkdownRemark) -> Result<String> {
        let view = BlogPostView::from(data);
        let mut context = Context::new();
        context.insert("frontmatter", &view.frontmatter);
        context.insert("html", &view.html);
        Ok(self.tera.render(BLOG_POST_TEMPLATE, &context)?)
    }

    /// Wrap a rendered fragment in the document layout
    pub fn render_layout(&self, layout: &LayoutData) -> Result<String> {
        let context = Context::from_serialize(layout)?;
        Ok(self.tera.render(LAYOUT_TEMPLATE, &context)?)
    }
}

/// Template context for the blog post fragment; every field is a string
#[derive(Debug, Clone, Serialize)]
struct BlogPostView {
    frontmatter: FrontmatterView,
    html: String,
}

#[derive(Debug, Clone, Serialize)]
struct FrontmatterView {
    title: String,
    date: String,
    path: String,
}

impl From<&MarkdownRemark> for BlogPostView {
    fn from(data: &MarkdownRemark) -> Self {
        let fm = &data.frontmatter;
        Self {
            frontmatter: FrontmatterView {
                title: fm.title.clone().unwrap_or_default(),
                date: fm.date.clone().unwrap_or_default(),
                path: fm.path.clone().unwrap_or_default(),
            },
            html: data.html.clone(),
        }
    }
}

/// Site-wide values available to the layout
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
}

/// Template context for the document layout
#[derive(Debug, Clone, Serialize)]
pub struct LayoutData {
    pub site: SiteData,
    pub page_title: String,
    /// Already attribute-escaped; Tera's `escape` would also rewrite `/`
    pub canonical_url: String,
    pub published_time: Option<String>,
    pub body: String,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueriedFrontmatter;

    fn hello() -> MarkdownRemark {
        MarkdownRemark {
            html: "<p>Hi</p>".to_string(),
            frontmatter: QueriedFrontmatter {
                title: Some("Hello".to_string()),
                date: Some("Jan 01, 2020".to_string()),
                path: Some("/hello".to_string()),
            },
        }
    }

    fn layout(page_title: &str, body: &str) -> LayoutData {
        LayoutData {
            site: SiteData {
                title: "My Blog".to_string(),
                description: String::new(),
                author: String::new(),
                language: "en".to_string(),
            },
            page_title: page_title.to_string(),
            canonical_url: "http://localhost:4000/hello".to_string(),
            published_time: None,
            body: body.to_string(),
            version: "0.0.0",
        }
    }

    #[test]
    fn test_render_blog_post_structure() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_blog_post(&hello()).unwrap();

        assert_eq!(
            html.trim_end(),
            r#"<div class="blog-post-container">
  <div class="blog-post">
    <h1>Hello</h1>
    <h2>Jan 01, 2020</h2>
    <div class="blog-post-content"><p>Hi</p></div>
  </div>
</div>"#
        );
    }

    #[test]
    fn test_html_is_not_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut data = hello();
        data.html = "<h2 id=\"x\">Section</h2>\n<pre><code>&lt;tag&gt;</code></pre>\n".to_string();
        let html = renderer.render_blog_post(&data).unwrap();
        assert!(html.contains(&data.html));
    }

    #[test]
    fn test_title_and_date_are_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut data = hello();
        data.frontmatter.title = Some("<b>Bold</b> & more".to_string());
        let html = renderer.render_blog_post(&data).unwrap();
        assert!(html.contains("<h1>&lt;b&gt;Bold&lt;"));
        assert!(html.contains("&amp; more</h1>"));
        assert!(!html.contains("<b>Bold"));
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_blog_post(&MarkdownRemark::default()).unwrap();
        assert!(html.contains("<h1></h1>"));
        assert!(html.contains("<h2></h2>"));
        assert!(html.contains(r#"<div class="blog-post-content"></div>"#));
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = TemplateRenderer::new().unwrap();
        let first = renderer.render_blog_post(&hello()).unwrap();
        let second = renderer.render_blog_post(&hello()).unwrap();
        assert_eq!(first, second);

        let other = TemplateRenderer::new().unwrap();
        assert_eq!(first, other.render_blog_post(&hello()).unwrap());
    }

    #[test]
    fn test_layout_wraps_fragment() {
        let renderer = TemplateRenderer::new().unwrap();
        let doc = renderer
            .render_layout(&layout("Hello", "<div>fragment</div>"))
            .unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Hello | My Blog</title>"));
        assert!(doc.contains(r#"<div id="app"><div>fragment</div></div>"#));
        assert!(!doc.contains("article:published_time"));
        assert!(!doc.contains("name=\"description\""));
    }

    #[test]
    fn test_layout_without_page_title() {
        let renderer = TemplateRenderer::new().unwrap();
        let doc = renderer.render_layout(&layout("", "")).unwrap();
        assert!(doc.contains("<title>My Blog</title>"));
    }

    #[test]
    fn test_template_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(BLOG_POST_TEMPLATE),
            "<article data-path=\"{{ frontmatter.path }}\">{{ html }}</article>",
        )
        .unwrap();

        let renderer = TemplateRenderer::load(dir.path()).unwrap();
        let html = renderer.render_blog_post(&hello()).unwrap();
        assert_eq!(html, "<article data-path=\"/hello\"><p>Hi</p></article>");

        // The layout was not overridden
        let doc = renderer.render_layout(&layout("T", &html)).unwrap();
        assert!(doc.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LAYOUT_TEMPLATE), "{% if %}").unwrap();
        assert!(TemplateRenderer::load(dir.path()).is_err());
    }
}
