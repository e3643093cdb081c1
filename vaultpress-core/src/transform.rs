//! Ordered syntax transforms from wiki dialect markup to standard Markdown.
//!
//! The stage order is fixed and load-bearing: the embedded-image form
//! `![[...]]` is a substring superset of the cross-reference form `[[...]]`
//! and must be rewritten first, and image-path canonicalization expects
//! links that earlier stages have already produced. No stage depends on a
//! later one, and no stage shares state with another.
//!
//! Stages never fail; unterminated bracket or highlight sequences pass
//! through unchanged and are left for the output validator to flag.

use crate::slug::{anchorize, slugify};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Which stage set to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformProfile {
    /// Single-article publish: direct slug destinations
    #[default]
    Single,
    /// Batch sync: leaf-bundle relative destinations plus cleanup stages
    Batch,
}

/// A named transform stage: a pure string-to-string function
pub struct Stage {
    pub name: &'static str,
    batch_only: bool,
    run: fn(&str, TransformProfile) -> String,
}

impl Stage {
    pub fn apply(&self, input: &str, profile: TransformProfile) -> String {
        (self.run)(input, profile)
    }
}

const STAGES: &[Stage] = &[
    Stage {
        name: "embedded-image",
        batch_only: false,
        run: embedded_images,
    },
    Stage {
        name: "cross-reference",
        batch_only: false,
        run: cross_references,
    },
    Stage {
        name: "comment-removal",
        batch_only: false,
        run: remove_comments,
    },
    Stage {
        name: "highlight",
        batch_only: false,
        run: highlights,
    },
    Stage {
        name: "image-path",
        batch_only: true,
        run: canonicalize_image_paths,
    },
    Stage {
        name: "tag-spacing",
        batch_only: true,
        run: tag_spacing,
    },
];

/// The stages that run for a profile, in pipeline order
pub fn stages(profile: TransformProfile) -> impl Iterator<Item = &'static Stage> {
    STAGES
        .iter()
        .filter(move |stage| !stage.batch_only || profile == TransformProfile::Batch)
}

/// Run the full transform pipeline over a markdown body
pub fn transform(body: &str, profile: TransformProfile) -> String {
    let mut out = body.to_string();
    for stage in stages(profile) {
        out = stage.apply(&out, profile);
    }
    out
}

static EMBEDDED_IMAGE_RE: OnceLock<Regex> = OnceLock::new();

fn embedded_image_re() -> &'static Regex {
    EMBEDDED_IMAGE_RE
        .get_or_init(|| Regex::new(r"!\[\[([^\[\]|]+?)(?:\|([^\[\]]*))?\]\]").unwrap())
}

/// `![[name]]` / `![[name|size]]` to `![name](./images/name)`
///
/// The size suffix is a display hint in the source dialect and is dropped.
fn embedded_images(input: &str, _profile: TransformProfile) -> String {
    embedded_image_re()
        .replace_all(input, |caps: &Captures| {
            let name = caps[1].trim();
            format!("![{name}](./images/{name})")
        })
        .into_owned()
}

/// `[[target]]`, `[[target|alias]]`, and `[[target#section]]` to links
///
/// A manual scan rather than a regex because matches directly preceded by
/// `!` must be left alone (they are embedded images the previous stage
/// chose not to rewrite) and the regex crate has no lookbehind.
fn cross_references(input: &str, profile: TransformProfile) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("[[") {
        let Some(end) = rest[start..].find("]]") else {
            // Unterminated reference: everything from here passes through
            break;
        };

        let inner = &rest[start + 2..start + end];
        if inner.contains("[[") {
            // Nested opener; emit this one literally and rescan from inside
            out.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            continue;
        }

        let preceded_by_bang = start > 0 && rest.as_bytes()[start - 1] == b'!';
        out.push_str(&rest[..start]);
        if preceded_by_bang || inner.trim().is_empty() {
            out.push_str(&rest[start..start + end + 2]);
        } else {
            out.push_str(&render_link(inner, profile));
        }
        rest = &rest[start + end + 2..];
    }

    out.push_str(rest);
    out
}

fn render_link(inner: &str, profile: TransformProfile) -> String {
    let (target, alias) = match inner.find('|') {
        Some(pos) => (inner[..pos].trim(), Some(inner[pos + 1..].trim())),
        None => (inner.trim(), None),
    };

    let (base, section) = match target.split_once('#') {
        Some((base, section)) => {
            let section = section.trim();
            (base.trim(), (!section.is_empty()).then_some(section))
        }
        None => (target, None),
    };

    let text = alias.filter(|a| !a.is_empty()).unwrap_or(target);
    let slug = slugify(base);

    let dest = match (profile, section) {
        (TransformProfile::Single, None) => slug,
        (TransformProfile::Single, Some(section)) => {
            format!("{slug}#{}", anchorize(section))
        }
        (TransformProfile::Batch, None) => format!("../{slug}/"),
        (TransformProfile::Batch, Some(section)) => {
            format!("../{slug}/#{}", anchorize(section))
        }
    };

    format!("[{text}]({dest})")
}

static COMMENT_RE: OnceLock<Regex> = OnceLock::new();

fn comment_re() -> &'static Regex {
    COMMENT_RE.get_or_init(|| Regex::new(r"(?s)%%.*?%%").unwrap())
}

/// Author-only `%%...%%` comments are removed entirely, newlines included
fn remove_comments(input: &str, _profile: TransformProfile) -> String {
    comment_re().replace_all(input, "").into_owned()
}

static HIGHLIGHT_RE: OnceLock<Regex> = OnceLock::new();

fn highlight_re() -> &'static Regex {
    HIGHLIGHT_RE.get_or_init(|| Regex::new(r"==(.+?)==").unwrap())
}

/// `==text==` to `<mark>text</mark>`; highlights do not span lines
fn highlights(input: &str, _profile: TransformProfile) -> String {
    highlight_re()
        .replace_all(input, "<mark>$1</mark>")
        .into_owned()
}

static IMAGE_PATH_RE: OnceLock<Regex> = OnceLock::new();

fn image_path_re() -> &'static Regex {
    IMAGE_PATH_RE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*?)images/([^)/]+)\)").unwrap())
}

/// Rewrite deep or absolute image paths to the canonical `./images/NAME`
///
/// Only paths with at least two parent segments or an absolute-looking
/// prefix are rewritten; `./images/NAME` and bare `images/NAME` stay as
/// they are.
fn canonicalize_image_paths(input: &str, _profile: TransformProfile) -> String {
    image_path_re()
        .replace_all(input, |caps: &Captures| {
            let prefix = &caps[2];
            let segments = prefix
                .split('/')
                .filter(|s| !s.is_empty() && *s != ".")
                .count();
            let absolute = prefix.starts_with('/') || prefix.contains("://");

            if absolute || segments >= 2 {
                format!("![{}](./images/{})", &caps[1], &caps[3])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn tag_re() -> &'static Regex {
    // A preceding `/` marks an anchor inside an already-converted link
    // destination, `(` the start of one, and `#` a heading marker run;
    // all three are excluded.
    TAG_RE.get_or_init(|| Regex::new(r"([^\s/#(])#([A-Za-z][A-Za-z0-9_/-]*)").unwrap())
}

/// Insert the space a tag needs when it directly follows other text
fn tag_spacing(input: &str, _profile: TransformProfile) -> String {
    tag_re()
        .replace_all(input, |caps: &Captures| {
            // A candidate ending at a bracket is link text or a destination
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            if matches!(input[end..].chars().next(), Some(']') | Some(')')) {
                caps[0].to_string()
            } else {
                format!("{} #{}", &caps[1], &caps[2])
            }
        })
        .into_owned()
}
