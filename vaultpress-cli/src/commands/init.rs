//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../vaultpress.yml.example");

/// Initialize a new vaultpress project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_source_tree(root)?;

    println!("✓ vaultpress initialized in {:?}", root);
    println!("  - Edit vaultpress.yml to point at your note tree");
    println!("  - Mark notes `status: published` and run `vaultpress sync`");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("vaultpress.yml");
    if config_path.exists() {
        println!("vaultpress.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_source_tree(root: &Path) -> Result<()> {
    let vault = root.join("vault");
    let essays = vault.join("essays");
    let attachments = vault.join("attachments");

    for dir in [&vault, &essays, &attachments] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    // Starter note
    let sample = essays.join("welcome.md");
    if !sample.exists() {
        fs::write(&sample, sample_note())?;
        println!("Created {:?}", sample);
    }

    Ok(())
}

fn sample_note() -> String {
    r#"---
title: Welcome to vaultpress
status: draft
tags: [vaultpress, intro]
---

# Welcome

Write notes with [[Wiki Links]], embed images with ![[shot.png]], highlight
with ==marks==, and keep private asides in %%comments%%. Flip a note to
`status: published` when it is ready, then run:

```bash
vaultpress publish vault/essays/welcome.md
vaultpress sync
```
"#
    .to_string()
}
