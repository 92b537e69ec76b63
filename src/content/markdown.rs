//! Markdown to HTML transform with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::escape_html;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::from_config(&HighlightConfig::default())
    }

    /// Create a renderer from the site's highlight settings
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // Front-matter is stripped before this point, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) => lang
                            .split_whitespace()
                            .next()
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let block = self.code_block(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(block)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    fn code_block(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        if !self.highlight {
            return plain_code_block(code, lang);
        }
        let class = escape_html(lang);

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain_code_block(code, lang);
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => add_line_numbers(&highlighted, &class),
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                class, highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain_code_block(code, lang)
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        escape_html(lang),
        escape_html(code)
    )
}

/// Wrap highlighted code in a gutter/code table; `class` must be escaped
fn add_line_numbers(code: &str, class: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        class,
        gutter,
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains(r#"<figure class="highlight rust">"#));
        assert!(html.contains("line-number"));
    }

    #[test]
    fn test_render_without_highlighting() {
        let renderer = MarkdownRenderer::from_config(&HighlightConfig {
            enable: false,
            ..Default::default()
        });
        let html = renderer.render("```html\n<b>x</b>\n```").unwrap();
        assert!(html.contains(r#"<pre><code class="language-html">&lt;b&gt;x&lt;/b&gt;"#));
    }

    #[test]
    fn test_indented_code_block() {
        let renderer = MarkdownRenderer::from_config(&HighlightConfig {
            enable: false,
            ..Default::default()
        });
        let html = renderer.render("para\n\n    let x = 1;\n").unwrap();
        assert!(html.contains(r#"<code class="language-text">let x = 1;"#));
        assert!(html.contains("<p>para</p>"));
    }

    #[test]
    fn test_fence_language_is_escaped() {
        let markdown = "```x\"onmouseover=alert(1)\nbody\n```\n";

        for renderer in [
            MarkdownRenderer::new(),
            MarkdownRenderer::from_config(&HighlightConfig {
                line_number: false,
                ..Default::default()
            }),
            MarkdownRenderer::from_config(&HighlightConfig {
                enable: false,
                ..Default::default()
            }),
        ] {
            let html = renderer.render(markdown).unwrap();
            assert!(!html.contains("x\"onmouseover"), "{html}");
            assert!(html.contains("x&quot;onmouseover=alert(1)"), "{html}");
        }
    }

    #[test]
    fn test_tables_enabled() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
        assert!(html.contains("<table>"));
    }
}
