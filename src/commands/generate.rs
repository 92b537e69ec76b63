//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::ContentLoader;
use crate::generator::{GenerateReport, Generator};
use crate::query::NodeStore;
use crate::Site;

/// Load content, build the path index and write every page
pub fn run(site: &Site) -> Result<GenerateReport> {
    let start = Instant::now();

    let nodes = ContentLoader::new(site).load_nodes()?;
    tracing::info!("Loaded {} markdown files", nodes.len());

    let store = NodeStore::from_nodes(nodes)?;
    let report = Generator::new(site)?.generate(&store)?;

    tracing::info!(
        "Generated {} pages and copied {} assets in {:.2}s",
        report.pages,
        report.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Watch for file changes and regenerate
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in [&site.source_dir, &site.static_dir, &site.template_dir] {
        if dir.exists() {
            watcher.watch(dir, notify::RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = site.config_path();
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                // Writes into public/ must not retrigger a build
                if event.paths.iter().all(|p| p.starts_with(&site.public_dir)) {
                    continue;
                }
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = reload_and_run(site) {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

/// Re-read `_config.yml` before building so config edits take effect
pub fn reload_and_run(site: &Site) -> Result<GenerateReport> {
    let site = Site::new(&site.base_dir)?;
    run(&site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run_reports_counts() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("a.md"), "---\ntitle: A\npath: /a\n---\n").unwrap();
        fs::write(content.join("b.md"), "---\ntitle: B\npath: /b/c\n---\n").unwrap();

        let site = Site::new(dir.path()).unwrap();
        let report = run(&site).unwrap();
        assert_eq!(report.pages, 2);
        assert!(dir.path().join("public/a/index.html").is_file());
        assert!(dir.path().join("public/b/c/index.html").is_file());
    }

    #[test]
    fn test_run_fails_on_duplicate_paths() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("a.md"), "---\npath: /same\n---\n").unwrap();
        fs::write(content.join("b.md"), "---\npath: /same\n---\n").unwrap();

        let site = Site::new(dir.path()).unwrap();
        let err = run(&site).unwrap_err();
        assert!(err.to_string().contains("/same"));
    }

    #[test]
    fn test_reload_picks_up_config_changes() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        fs::write(dir.path().join("_config.yml"), "public_dir: out\n").unwrap();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        fs::write(dir.path().join("content/a.md"), "---\npath: /a\n---\n").unwrap();

        reload_and_run(&site).unwrap();
        assert!(dir.path().join("out/a/index.html").is_file());
    }
}
