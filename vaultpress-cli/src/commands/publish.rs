//! Publish command implementation.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde_yaml::Mapping;
use std::path::Path;
use vaultpress_core::{
    derive_category, frontmatter, slugify, Article, ArticleStatus, Config, Publisher, StdFs,
};

pub fn publish_article(config_path: &Path, file: &Path, json: bool) -> Result<()> {
    let config = Config::from_file(config_path).context("failed to load configuration")?;
    let publish_config = config.publish_config();
    let fs = StdFs;

    let article = load_article(file, &publish_config.source_dir)?;
    tracing::info!("publishing \"{}\"", article.title);

    let progress = |stage: &str, percent: u8| {
        tracing::debug!("{stage}: {percent}%");
    };
    let result = Publisher::new(&fs, &publish_config).publish(&article, Some(&progress));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.message);
        if let Some(path) = &result.target_path {
            println!("  -> {}", path.display());
        }
        for warning in &result.warnings {
            println!("  warning: {warning}");
        }
        for error in &result.errors {
            println!("  error: {error}");
        }
    }

    if !result.success {
        bail!("publish failed");
    }
    Ok(())
}

/// Minimal loader for the single-publish path, composed from the core
/// parser so the batch scanner and this path cannot drift apart.
fn load_article(file: &Path, source_dir: &Path) -> Result<Article> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let probed = frontmatter::probe(&raw);
    let (map, body) = match frontmatter::split_frontmatter(&raw) {
        Some((yaml, body)) => (
            frontmatter::parse_mapping(yaml).unwrap_or_default(),
            body.to_string(),
        ),
        None => (Mapping::new(), raw.clone()),
    };

    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");

    // Canonicalize both sides so the category survives ./-style invocations
    let file_abs = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
    let source_abs = source_dir
        .canonicalize()
        .unwrap_or_else(|_| source_dir.to_path_buf());

    let modified = std::fs::metadata(file)
        .ok()
        .and_then(|meta| meta.modified().ok())
        .map(DateTime::<Utc>::from);

    Ok(Article {
        title: probed.title.unwrap_or_else(|| stem.to_string()),
        slug: probed
            .slug
            .map(|s| slugify(&s))
            .unwrap_or_else(|| slugify(stem)),
        status: probed.status.unwrap_or(ArticleStatus::Draft),
        category: derive_category(&source_abs, &file_abs),
        frontmatter: map,
        body,
        source_path: file.to_path_buf(),
        modified,
    })
}
