//! Frontmatter serialization and article output writing.

use crate::fs::FileSystem;
use serde_yaml::{Mapping, Value};
use std::io;
use std::path::{Path, PathBuf};

/// Serialize the adapted metadata and transformed body into one document
///
/// The header renders as `key: value` lines between `---` delimiters,
/// arrays as block sequences, followed by a blank line and the body.
/// Re-parsing the header reproduces the adapted mapping's values.
pub fn assemble(map: &Mapping, body: &str) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    for (key, value) in map {
        if let Some(key) = key.as_str() {
            render_entry(&mut out, key, value);
        }
    }
    out.push_str("---\n\n");
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn render_entry(out: &mut String, key: &str, value: &Value) {
    match value {
        Value::Sequence(items) => {
            out.push_str(key);
            out.push_str(":\n");
            for item in items {
                if let Some(rendered) = render_scalar(item) {
                    out.push_str("  - ");
                    out.push_str(&rendered);
                    out.push('\n');
                }
            }
        }
        Value::Null => {
            out.push_str(key);
            out.push_str(":\n");
        }
        other => {
            if let Some(rendered) = render_scalar(other) {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(&rendered);
                out.push('\n');
            } else {
                // Nested structures are not part of the adapted shape
                tracing::debug!("dropping non-scalar frontmatter value for key {key}");
            }
        }
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(quote_if_needed(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Quote strings a YAML parser would otherwise misread
fn quote_if_needed(s: &str) -> String {
    if needs_quoting(s) {
        let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        s.to_string()
    }
}

fn needs_quoting(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return true;
    }
    if s.contains(':') || s.contains('#') || s.contains('"') {
        return true;
    }
    // Plain scalars that YAML would type as something other than a string
    if s.parse::<f64>().is_ok() {
        return true;
    }
    if matches!(
        s.to_lowercase().as_str(),
        "true" | "false" | "null" | "~" | "yes" | "no" | "on" | "off"
    ) {
        return true;
    }
    matches!(
        s.chars().next(),
        Some('-' | '?' | '[' | ']' | '{' | '}' | '&' | '*' | '!' | '|' | '>' | '\'' | '%' | '@' | '`')
    )
}

/// Write an assembled article into its leaf-bundle directory
///
/// Parent directories are created recursively; the write is a full
/// overwrite so republishing a slug is idempotent.
pub fn write_article(
    fs: &dyn FileSystem,
    article_dir: &Path,
    content: &str,
) -> io::Result<PathBuf> {
    fs.create_dir_all(article_dir)?;
    let path = article_dir.join("index.md");
    fs.write(&path, content)?;
    Ok(path)
}
