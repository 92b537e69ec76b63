//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

const DEFAULT_SCAFFOLD: &str = "---\ntitle: {{ title }}\ndate: {{ date }}\npath: {{ path }}\n---\n";

/// Create `content/<slug>.md` from the post scaffold
///
/// The page path defaults to `/<slug>`.
pub fn create_post(site: &Site, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Utc::now();
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let page_path = match path {
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) => format!("/{}", p),
        None => format!("/{}", slug),
    };

    fs::create_dir_all(&site.source_dir)?;
    let file_path = site.source_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = site.base_dir.join("scaffolds").join("post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    let content = scaffold
        .replace("{{ title }}", &yaml_scalar(title)?)
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string())
        .replace("{{ path }}", &yaml_scalar(&page_path)?);

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Serialize a string as a single YAML scalar, quoted where YAML needs it
fn yaml_scalar(value: &str) -> Result<String> {
    let scalar = serde_yaml::to_string(value)?;
    Ok(scalar.trim_end_matches('\n').to_string())
}
