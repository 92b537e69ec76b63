//! List site content

use anyhow::Result;

use crate::content::ContentLoader;
use crate::query::NodeStore;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let nodes = ContentLoader::new(site).load_nodes()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", nodes.len());
            for node in &nodes {
                println!(
                    "  {} - {} [{}]",
                    node.date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "----------".to_string()),
                    node.title().unwrap_or("(untitled)"),
                    node.source
                );
            }
        }
        "path" | "paths" | "route" | "routes" => {
            let store = NodeStore::from_nodes(nodes)?;
            let paths: Vec<_> = store.paths().collect();
            println!("Paths ({}):", paths.len());
            for path in paths {
                if let Some(node) = store.get(path) {
                    println!("  {} -> {}", path, node.source);
                }
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, path", content_type);
        }
    }

    Ok(())
}
