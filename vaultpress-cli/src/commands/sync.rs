//! Sync command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;
use vaultpress_core::{Config, StdFs, Syncer};

pub fn sync_articles(config_path: &Path, category: Option<&str>, json: bool) -> Result<()> {
    let config = Config::from_file(config_path).context("failed to load configuration")?;
    let publish_config = config.publish_config();
    let fs = StdFs;

    let syncer = Syncer::new(&fs, &publish_config);
    let progress = |current: usize, total: usize, title: &str| {
        tracing::info!("[{current}/{total}] {title}");
    };

    let result = match category {
        Some(category) => syncer.sync_category(category, Some(&progress)),
        None => syncer.sync_all(Some(&progress)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "sync complete: {} attempted, {} succeeded, {} failed",
            result.total, result.succeeded, result.failed
        );
        for warning in &result.warnings {
            println!("  warning: {warning}");
        }
        for error in &result.errors {
            println!("  error: {error}");
        }
    }

    if !result.is_success() {
        bail!("{} article(s) failed to publish", result.failed);
    }
    Ok(())
}
