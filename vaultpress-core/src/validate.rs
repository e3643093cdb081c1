//! Post-write diagnostic validation of published output.

use crate::assets::extract_image_refs;
use crate::frontmatter::split_frontmatter;
use crate::fs::FileSystem;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

/// Outcome of a validation pass; diagnostic only, the written output is
/// left in place either way.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

static RESIDUAL_HIGHLIGHT_RE: OnceLock<Regex> = OnceLock::new();

fn residual_highlight_re() -> &'static Regex {
    RESIDUAL_HIGHLIGHT_RE.get_or_init(|| Regex::new(r"==.+?==").unwrap())
}

/// Re-read a written article bundle and report residual dialect syntax or
/// assets the copy step did not deliver. Never fails; an unreadable
/// output file is itself the finding.
pub fn validate_output(fs: &dyn FileSystem, article_dir: &Path) -> ValidationReport {
    let index_path = article_dir.join("index.md");
    let content = match fs.read_to_string(&index_path) {
        Ok(content) => content,
        Err(err) => {
            return ValidationReport {
                valid: false,
                issues: vec![format!("unreadable output {}: {err}", index_path.display())],
            };
        }
    };

    let body = split_frontmatter(&content)
        .map(|(_, body)| body)
        .unwrap_or(content.as_str());

    let mut issues = Vec::new();

    if body.contains("![[") {
        issues.push("residual embedded-image syntax (![[ )".to_string());
    }
    if body.contains("[[") || body.contains("]]") {
        issues.push("residual cross-reference syntax ([[ or ]])".to_string());
    }
    if residual_highlight_re().is_match(body) {
        issues.push("residual highlight syntax (==...==)".to_string());
    }

    let refs = extract_image_refs(body);
    if !refs.is_empty() {
        let images_dir = article_dir.join("images");
        if !fs.exists(&images_dir) {
            issues.push("missing images directory despite image references".to_string());
        } else {
            for reference in &refs {
                if !fs.exists(&images_dir.join(&reference.name)) {
                    issues.push(format!("referenced image not copied: {}", reference.name));
                }
            }
        }
    }

    ValidationReport {
        valid: issues.is_empty(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::StdFs;

    fn write_bundle(dir: &Path, body: &str) {
        std::fs::create_dir_all(dir).unwrap();
        let content = format!("---\ntitle: t\n---\n\n{body}\n");
        std::fs::write(dir.join("index.md"), content).unwrap();
    }

    #[test]
    fn test_clean_output_is_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = tmp.path().join("note");
        write_bundle(&bundle, "Just [a link](a) and text.");

        let report = validate_output(&StdFs, &bundle);
        assert!(report.valid, "unexpected issues: {:?}", report.issues);
    }

    #[test]
    fn test_residual_syntax_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = tmp.path().join("note");
        write_bundle(&bundle, "Leftover [[link]] and ==mark== and ![[img.png]]");

        let report = validate_output(&StdFs, &bundle);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 3);
    }

    #[test]
    fn test_uncopied_asset_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = tmp.path().join("note");
        write_bundle(&bundle, "![shot](./images/shot.png)");

        let report = validate_output(&StdFs, &bundle);
        assert!(!report.valid);
        assert!(report.issues[0].contains("missing images directory"));

        std::fs::create_dir_all(bundle.join("images")).unwrap();
        let report = validate_output(&StdFs, &bundle);
        assert_eq!(
            report.issues,
            vec!["referenced image not copied: shot.png".to_string()]
        );

        std::fs::write(bundle.join("images/shot.png"), b"png").unwrap();
        let report = validate_output(&StdFs, &bundle);
        assert!(report.valid);
    }

    #[test]
    fn test_unreadable_output_is_an_issue_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let report = validate_output(&StdFs, &tmp.path().join("nope"));
        assert!(!report.valid);
        assert!(report.issues[0].starts_with("unreadable output"));
    }
}
