//! Data model for articles, publish configuration, and pipeline results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::path::{Path, PathBuf};

/// Publication status of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(ArticleStatus::Draft),
            "published" => Some(ArticleStatus::Published),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, ArticleStatus::Published)
    }
}

/// A source article as supplied by the loading side
///
/// The publish pipeline only reads this; it never mutates the source
/// record. The frontmatter mapping keeps the author's key order so
/// republishing is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Display title
    pub title: String,

    /// URL slug (e.g., "rust-safety")
    pub slug: String,

    /// Publication status; only published articles are batch-eligible
    pub status: ArticleStatus,

    /// Category, which becomes a segment of the output path
    pub category: Option<String>,

    /// Raw frontmatter metadata
    pub frontmatter: Mapping,

    /// Raw markdown body (without frontmatter)
    pub body: String,

    /// Path of the source markdown file
    pub source_path: PathBuf,

    /// Last-modified time of the source file
    pub modified: Option<DateTime<Utc>>,
}

/// Immutable per-call publish configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Root of the source tree that holds the articles
    pub source_dir: PathBuf,

    /// Root of the generated site content
    pub target_dir: PathBuf,

    /// Directory holding image assets; source root when not set
    pub image_dir: Option<PathBuf>,
}

impl PublishConfig {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            image_dir: None,
        }
    }

    pub fn with_image_dir(mut self, image_dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(image_dir.into());
        self
    }

    /// Directory image assets are resolved against
    pub fn image_source_dir(&self) -> &Path {
        self.image_dir.as_deref().unwrap_or(&self.source_dir)
    }

    /// Canonical output directory for an article: `{target}/{category?}/{slug}`
    ///
    /// The category segment is skipped when absent or empty, which keeps a
    /// single layout for every publish path.
    pub fn article_dir(&self, category: Option<&str>, slug: &str) -> PathBuf {
        match category {
            Some(category) if !category.is_empty() => {
                self.target_dir.join(category).join(slug)
            }
            _ => self.target_dir.join(slug),
        }
    }
}

/// Canonical image reference extracted from a transformed body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    /// The full markup the reference was extracted from
    pub raw: String,

    /// Bare file name of the asset
    pub name: String,

    /// Whether the source file was found
    pub exists: bool,
}

/// Outcome of a single-article publish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResult {
    pub success: bool,
    pub message: String,
    pub target_path: Option<PathBuf>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl PublishResult {
    /// A failed result; the message doubles as the single error entry so
    /// `success == false` always carries a non-empty error list.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            message: message.clone(),
            target_path: None,
            warnings: Vec::new(),
            errors: vec![message],
        }
    }
}

/// Aggregated outcome of a batch sync
///
/// `succeeded + failed` always equals `total`, the number of attempted
/// (eligible, not skipped) articles. Warnings and errors are labeled with
/// the article they belong to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl SyncResult {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
