//! Asset resolution and copying for canonical image references.
//!
//! This step runs after the syntax transforms, so it only ever sees the
//! canonical `![alt](./images/NAME)` form; running it again over its own
//! output is a no-op. It never fails a publish: missing sources and
//! per-asset copy failures are demoted to warnings.

use crate::fs::FileSystem;
use crate::models::AssetReference;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

static CANONICAL_IMAGE_RE: OnceLock<Regex> = OnceLock::new();

fn canonical_image_re() -> &'static Regex {
    CANONICAL_IMAGE_RE.get_or_init(|| Regex::new(r"!\[[^\]]*\]\(\./images/([^)]+)\)").unwrap())
}

/// Extract canonical image references, de-duplicated by file name
///
/// First-seen order is kept so copy order (and with it warning order) is
/// deterministic. Existence flags start out false; the copier fills them.
pub fn extract_image_refs(body: &str) -> Vec<AssetReference> {
    let mut seen = HashSet::new();
    let mut refs = Vec::new();

    for caps in canonical_image_re().captures_iter(body) {
        let name = caps[1].to_string();
        if seen.insert(name.clone()) {
            refs.push(AssetReference {
                raw: caps[0].to_string(),
                name,
                exists: false,
            });
        }
    }

    refs
}

/// Resolve referenced assets and copy them into `{article_dir}/images/`
///
/// Returns the references (existence flags filled in) and the warnings
/// produced along the way. The body itself is not touched; path
/// rewriting already happened in the transform stage.
pub fn resolve_and_copy(
    fs: &dyn FileSystem,
    body: &str,
    image_source_dir: &Path,
    article_dir: &Path,
) -> (Vec<AssetReference>, Vec<String>) {
    let mut refs = extract_image_refs(body);
    let mut warnings = Vec::new();

    let images_dir = article_dir.join("images");
    let mut images_dir_ready = false;

    for reference in &mut refs {
        let source = image_source_dir.join(&reference.name);
        reference.exists = fs.exists(&source);

        if !reference.exists {
            tracing::warn!("missing image: {}", reference.name);
            warnings.push(format!("missing image: {}", reference.name));
            continue;
        }

        if !images_dir_ready {
            if let Err(err) = fs.create_dir_all(&images_dir) {
                warnings.push(format!("failed to copy image {}: {err}", reference.name));
                continue;
            }
            images_dir_ready = true;
        }

        if let Err(err) = fs.copy(&source, &images_dir.join(&reference.name)) {
            warnings.push(format!("failed to copy image {}: {err}", reference.name));
        } else {
            tracing::debug!("copied image {}", reference.name);
        }
    }

    (refs, warnings)
}
