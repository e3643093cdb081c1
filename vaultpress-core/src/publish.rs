//! Single-article publish orchestration.
//!
//! A linear stage sequence with no branching: validate, read, transform,
//! adapt frontmatter, resolve assets, assemble, write, validate output.
//! Validation problems fail fast before any I/O; operational failures
//! are wrapped with the file and operation they came from.

use crate::assemble::{assemble, write_article};
use crate::assets::resolve_and_copy;
use crate::frontmatter::{adapt_frontmatter, parse_mapping, split_frontmatter};
use crate::fs::FileSystem;
use crate::models::{Article, PublishConfig, PublishResult};
use crate::progress::{report, ProgressFn};
use crate::transform::{transform, TransformProfile};
use crate::validate::validate_output;
use serde_yaml::Mapping;
use std::path::PathBuf;
use thiserror::Error;

/// Operational failures raised after validation has passed
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to read source {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Publishes one article through the full pipeline
///
/// One instance per operation with an injected filesystem; there is no
/// shared state between publishes.
pub struct Publisher<'a> {
    fs: &'a dyn FileSystem,
    config: &'a PublishConfig,
    profile: TransformProfile,
    validate_output: bool,
}

impl<'a> Publisher<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: &'a PublishConfig) -> Self {
        Self {
            fs,
            config,
            profile: TransformProfile::Single,
            validate_output: true,
        }
    }

    /// Select the transform profile (batch sync uses leaf-bundle links)
    pub fn with_profile(mut self, profile: TransformProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Skip the post-write validation stage
    pub fn without_output_validation(mut self) -> Self {
        self.validate_output = false;
        self
    }

    /// Publish a single article and report the outcome
    ///
    /// Warnings (missing assets, validator findings) never fail the
    /// publish; only validation problems and structural I/O failures do.
    pub fn publish(&self, article: &Article, progress: Option<&ProgressFn>) -> PublishResult {
        if let Some(problem) = config_problem(self.config) {
            return PublishResult::failure(format!("publish configuration incomplete: {problem}"));
        }
        if let Some(problem) = article_problem(article) {
            return PublishResult::failure(format!("article record incomplete: {problem}"));
        }
        report(progress, "validate", 5);

        let mut warnings = Vec::new();
        match self.run(article, progress, &mut warnings) {
            Ok(target_path) => {
                tracing::info!("published \"{}\" to {}", article.title, target_path.display());
                PublishResult {
                    success: true,
                    message: format!("published \"{}\"", article.title),
                    target_path: Some(target_path),
                    warnings,
                    errors: Vec::new(),
                }
            }
            Err(err) => {
                tracing::error!("publishing \"{}\" failed: {err}", article.title);
                let mut result = PublishResult::failure(err.to_string());
                result.message = format!("publishing \"{}\" failed", article.title);
                result.warnings = warnings;
                result
            }
        }
    }

    fn run(
        &self,
        article: &Article,
        progress: Option<&ProgressFn>,
        warnings: &mut Vec<String>,
    ) -> Result<PathBuf, PublishError> {
        report(progress, "read", 15);
        let raw = self
            .fs
            .read_to_string(&article.source_path)
            .map_err(|source| PublishError::ReadSource {
                path: article.source_path.clone(),
                source,
            })?;

        // The file on disk is the source of truth for metadata and body;
        // the article record may predate recent edits.
        let (metadata, body) = match split_frontmatter(&raw) {
            Some((yaml, body)) => match parse_mapping(yaml) {
                Ok(map) => (map, body.to_string()),
                Err(err) => {
                    warnings.push(format!("unparseable frontmatter, publishing without it: {err}"));
                    (Mapping::new(), body.to_string())
                }
            },
            None => (Mapping::new(), raw),
        };

        report(progress, "transform", 35);
        let transformed = transform(&body, self.profile);

        report(progress, "frontmatter", 50);
        let adapted = adapt_frontmatter(&metadata, article);

        report(progress, "assets", 70);
        let article_dir = self
            .config
            .article_dir(article.category.as_deref(), &article.slug);
        let (refs, asset_warnings) = resolve_and_copy(
            self.fs,
            &transformed,
            self.config.image_source_dir(),
            &article_dir,
        );
        warnings.extend(asset_warnings);
        tracing::debug!(
            "resolved {} image references for {}",
            refs.len(),
            article.slug
        );

        report(progress, "assemble", 80);
        let output = assemble(&adapted, &transformed);

        report(progress, "write", 90);
        self.fs
            .create_dir_all(&article_dir)
            .map_err(|source| PublishError::CreateOutputDir {
                path: article_dir.clone(),
                source,
            })?;
        let target_path = article_dir.join("index.md");
        self.fs
            .write(&target_path, &output)
            .map_err(|source| PublishError::WriteOutput {
                path: target_path.clone(),
                source,
            })?;

        if self.validate_output {
            report(progress, "validate-output", 95);
            let validation = validate_output(self.fs, &article_dir);
            warnings.extend(
                validation
                    .issues
                    .into_iter()
                    .map(|issue| format!("output validation: {issue}")),
            );
        }

        report(progress, "done", 100);
        Ok(target_path)
    }
}

fn config_problem(config: &PublishConfig) -> Option<&'static str> {
    if config.source_dir.as_os_str().is_empty() {
        return Some("missing source directory");
    }
    if config.target_dir.as_os_str().is_empty() {
        return Some("missing target directory");
    }
    None
}

fn article_problem(article: &Article) -> Option<&'static str> {
    if article.title.trim().is_empty() {
        return Some("missing title");
    }
    if article.slug.trim().is_empty() {
        return Some("missing slug");
    }
    if article.source_path.as_os_str().is_empty() {
        return Some("missing source path");
    }
    None
}
