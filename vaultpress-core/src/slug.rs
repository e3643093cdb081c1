//! Slug and anchor normalization.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static SEPARATOR_RUN_RE: OnceLock<Regex> = OnceLock::new();

fn separator_run_re() -> &'static Regex {
    SEPARATOR_RUN_RE.get_or_init(|| Regex::new(r"[\s-]+").unwrap())
}

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Strip everything outside `[a-z0-9 -]`
/// - Collapse spaces (and runs of hyphens) to a single hyphen
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use vaultpress_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("C++ Programming"), "c-programming");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();

    // Keep ascii alphanumerics and hyphens; whitespace becomes a separator
    let cleaned = lowercased
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                Some(g)
            } else if c.is_whitespace() {
                Some(" ")
            } else {
                None
            }
        })
        .collect::<String>();

    let collapsed = separator_run_re().replace_all(&cleaned, "-");

    collapsed.trim_matches('-').to_string()
}

/// Convert a section heading to its anchor form: lowercase, spaces to hyphens
///
/// Unlike [`slugify`] this keeps punctuation; it only normalizes case and
/// whitespace, matching the anchors static site generators derive from
/// headings.
pub fn anchorize(input: &str) -> String {
    let mut anchor = String::with_capacity(input.len());
    let mut in_gap = false;

    for c in input.trim().to_lowercase().chars() {
        if c.is_whitespace() {
            in_gap = true;
        } else {
            if in_gap {
                anchor.push('-');
                in_gap = false;
            }
            anchor.push(c);
        }
    }

    anchor
}
