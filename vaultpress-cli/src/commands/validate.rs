//! Validate command implementation.

use anyhow::{bail, Result};
use std::path::Path;
use vaultpress_core::{validate_output, StdFs};

pub fn validate_article(dir: &Path, json: bool) -> Result<()> {
    let report = validate_output(&StdFs, dir);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.valid {
        println!("✓ {} is clean", dir.display());
    } else {
        println!("{} issue(s) in {}:", report.issues.len(), dir.display());
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }

    if !report.valid {
        bail!("validation found {} issue(s)", report.issues.len());
    }
    Ok(())
}
