//! Batch re-sync of every published-status article.
//!
//! The scanner is intentionally self-contained: it probes a minimal
//! frontmatter projection for eligibility instead of pulling in a full
//! article loader, and articles are published strictly sequentially so
//! writers never overlap in a category directory and progress stays
//! monotonic.

use crate::frontmatter::{parse_mapping, probe, split_frontmatter, ArticleProbe};
use crate::fs::FileSystem;
use crate::models::{Article, ArticleStatus, PublishConfig, SyncResult};
use crate::progress::{report_sync, SyncProgressFn};
use crate::publish::Publisher;
use crate::slug::slugify;
use crate::transform::TransformProfile;
use serde_yaml::Mapping;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation checked between articles, never mid-article,
/// so a cancelled run leaves no partially written bundle behind.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Category of a scanned file: the first directory component of its path
/// relative to the source root
pub fn derive_category(source_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(source_dir).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    // A bare file at the root has no category
    components.next()?;
    Some(first.as_os_str().to_string_lossy().into_owned())
}

/// Batch sync orchestrator
pub struct Syncer<'a> {
    fs: &'a dyn FileSystem,
    config: &'a PublishConfig,
    cancel: Option<CancelFlag>,
}

impl<'a> Syncer<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: &'a PublishConfig) -> Self {
        Self {
            fs,
            config,
            cancel: None,
        }
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Re-publish every eligible article under the source root
    pub fn sync_all(&self, progress: Option<&SyncProgressFn>) -> SyncResult {
        self.sync_root(&self.config.source_dir, progress)
    }

    /// Re-publish eligible articles in one category subtree
    pub fn sync_category(&self, category: &str, progress: Option<&SyncProgressFn>) -> SyncResult {
        self.sync_root(&self.config.source_dir.join(category), progress)
    }

    fn sync_root(&self, scan_root: &Path, progress: Option<&SyncProgressFn>) -> SyncResult {
        let mut result = SyncResult::default();

        let files = match self.fs.walk_markdown(scan_root) {
            Ok(files) => files,
            Err(err) => {
                result
                    .errors
                    .push(format!("failed to scan {}: {err}", scan_root.display()));
                return result;
            }
        };
        tracing::info!("scanned {} markdown files under {}", files.len(), scan_root.display());

        let mut eligible = Vec::new();
        for path in files {
            let content = match self.fs.read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    result
                        .warnings
                        .push(format!("{}: unreadable, skipped: {err}", path.display()));
                    continue;
                }
            };

            let probed = probe(&content);
            if probed.status != Some(ArticleStatus::Published) {
                tracing::debug!("skipping non-published {}", path.display());
                continue;
            }

            eligible.push(self.article_from_probe(path, &content, probed));
        }

        let total = eligible.len();
        result.total = total;

        for (index, article) in eligible.iter().enumerate() {
            if let Some(flag) = &self.cancel {
                if flag.is_cancelled() {
                    result.total = index;
                    result
                        .warnings
                        .push(format!("sync cancelled after {index} of {total} articles"));
                    break;
                }
            }

            report_sync(progress, index + 1, total, &article.title);

            let publish = Publisher::new(self.fs, self.config)
                .with_profile(TransformProfile::Batch)
                .publish(article, None);

            for warning in &publish.warnings {
                result.warnings.push(format!("{}: {warning}", article.title));
            }

            if publish.success {
                result.succeeded += 1;
            } else {
                result.failed += 1;
                for error in &publish.errors {
                    result.errors.push(format!("{}: {error}", article.title));
                }
            }
        }

        tracing::info!(
            "sync finished: {} succeeded, {} failed of {} attempted",
            result.succeeded,
            result.failed,
            result.total
        );
        result
    }

    fn article_from_probe(&self, path: PathBuf, content: &str, probed: ArticleProbe) -> Article {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let (frontmatter, body) = match split_frontmatter(content) {
            Some((yaml, body)) => (
                parse_mapping(yaml).unwrap_or_default(),
                body.to_string(),
            ),
            None => (Mapping::new(), content.to_string()),
        };

        let modified = self.fs.stat(&path).ok().and_then(|stat| stat.modified);
        let category = derive_category(&self.config.source_dir, &path);

        Article {
            title: probed.title.unwrap_or_else(|| stem.to_string()),
            slug: probed
                .slug
                .map(|s| slugify(&s))
                .unwrap_or_else(|| slugify(stem)),
            status: ArticleStatus::Published,
            category,
            frontmatter,
            body,
            source_path: path,
            modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_category() {
        let root = Path::new("vault");
        assert_eq!(
            derive_category(root, Path::new("vault/essays/note.md")),
            Some("essays".to_string())
        );
        assert_eq!(
            derive_category(root, Path::new("vault/essays/deep/note.md")),
            Some("essays".to_string())
        );
        assert_eq!(derive_category(root, Path::new("vault/note.md")), None);
        assert_eq!(derive_category(root, Path::new("elsewhere/note.md")), None);
    }

    #[test]
    fn test_cancel_flag_shared_between_clones() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }
}
