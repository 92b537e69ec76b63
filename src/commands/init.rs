//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: My Blog
description: ''
author: ''
language: en

# URL
url: http://localhost:4000
root: /

# Directory
source_dir: content
public_dir: public
static_dir: static

# Writing
render_drafts: false
highlight:
  enable: true
  line_number: true
  theme: base16-ocean.dark

# Moment.js-style format used for post dates
date_format: MMMM DD, YYYY
"#;

const POST_SCAFFOLD: &str = r#"---
title: {{ title }}
date: {{ date }}
path: {{ path }}
---
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already contains a site", target_dir);
    }

    fs::create_dir_all(target_dir.join("content"))?;
    fs::create_dir_all(target_dir.join("static"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    fs::write(&config_path, CONFIG)?;
    fs::write(target_dir.join("scaffolds/post.md"), POST_SCAFFOLD)?;

    let now = chrono::Utc::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
path: /hello-world
---

Welcome! This page was generated from `content/hello-world.md`.

## Writing

Every markdown file with a `path` in its front-matter becomes a page at that path.

```bash
$ pathpress new "My New Post"
```

## Building

```bash
$ pathpress generate
$ pathpress server
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("content/hello-world.md"), sample_post)?;

    tracing::debug!("Wrote site skeleton to {:?}", target_dir);

    Ok(())
}
