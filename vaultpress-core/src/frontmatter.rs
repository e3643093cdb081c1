//! Frontmatter parsing and adaptation.
//!
//! One parser serves both call paths: the publish pipeline reads the full
//! metadata mapping, and the batch scanner takes a minimal projection
//! ([`probe`]) sufficient for eligibility filtering. Keeping the two on
//! the same splitter avoids drift between independently maintained
//! parsers.

use crate::models::{Article, ArticleStatus};
use chrono::Local;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---\s*\n(.*)$").unwrap())
}

/// Split content into its YAML header and markdown body
///
/// Returns `None` when the content has no `---` delimited header.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let caps = frontmatter_regex().captures(content)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Parse a YAML header into an insertion-ordered mapping
///
/// A header that parses to something other than a mapping is reported as
/// an error the same way malformed YAML is.
pub fn parse_mapping(yaml: &str) -> Result<Mapping, serde_yaml::Error> {
    let value: Value = serde_yaml::from_str(yaml)?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a mapping, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Minimal frontmatter projection for batch eligibility filtering
#[derive(Debug, Clone, Default)]
pub struct ArticleProbe {
    pub status: Option<ArticleStatus>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
}

/// Extract the minimal projection; tolerant of missing or broken headers
pub fn probe(content: &str) -> ArticleProbe {
    let Some((yaml, _)) = split_frontmatter(content) else {
        return ArticleProbe::default();
    };
    let map = match parse_mapping(yaml) {
        Ok(map) => map,
        Err(err) => {
            tracing::debug!("unparseable frontmatter during probe: {err}");
            return ArticleProbe::default();
        }
    };

    ArticleProbe {
        status: str_value(&map, "status")
            .as_deref()
            .and_then(ArticleStatus::from_str),
        title: str_value(&map, "title"),
        slug: str_value(&map, "slug"),
        date: str_value(&map, "date"),
    }
}

fn str_value(map: &Mapping, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Produce the adapted metadata mapping for publishing
///
/// The input mapping is never mutated. The result is guaranteed to carry
/// a title, a publish date (today when the source has none), tags as a
/// clean array, and `categories`/`series` as arrays when present at all.
/// There are no error conditions; values with unusable types are coerced
/// or dropped.
pub fn adapt_frontmatter(map: &Mapping, article: &Article) -> Mapping {
    let mut out = map.clone();

    if str_value(&out, "title").is_none() {
        out.insert(Value::from("title"), Value::from(article.title.clone()));
    }

    if !out.contains_key("date") {
        let today = Local::now().format("%Y-%m-%d").to_string();
        out.insert(Value::from("date"), Value::from(today));
    }

    match out.get("tags").and_then(normalize_tags) {
        Some(tags) => {
            out.insert(Value::from("tags"), Value::Sequence(tags));
        }
        None => {
            out.remove("tags");
        }
    }

    for key in ["categories", "series"] {
        if let Some(value) = out.get(key) {
            match coerce_string_array(value) {
                Some(seq) => {
                    out.insert(Value::from(key), seq);
                }
                None => {
                    out.remove(key);
                }
            }
        }
    }

    out
}

/// Normalize a tags value to a clean list of tag strings
///
/// Comma-separated strings are split; entries are trimmed and stripped of
/// a leading `#`. `None` means the value is semantically absent and the
/// key should be omitted.
fn normalize_tags(value: &Value) -> Option<Vec<Value>> {
    let tags: Vec<Value> = match value {
        Value::String(s) => s
            .split(',')
            .filter_map(clean_tag)
            .map(Value::from)
            .collect(),
        Value::Sequence(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => clean_tag(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .map(Value::from)
            .collect(),
        _ => Vec::new(),
    };

    (!tags.is_empty()).then_some(tags)
}

fn clean_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().trim_start_matches('#').trim();
    (!tag.is_empty()).then(|| tag.to_string())
}

/// Coerce a value into an array of strings, or `None` to drop the key
fn coerce_string_array(value: &Value) -> Option<Value> {
    match value {
        Value::Sequence(items) => {
            let items: Vec<Value> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(Value::from(s.clone())),
                    Value::Number(n) => Some(Value::from(n.to_string())),
                    _ => None,
                })
                .collect();
            (!items.is_empty()).then_some(Value::Sequence(items))
        }
        Value::String(s) => Some(Value::Sequence(vec![Value::from(s.clone())])),
        Value::Number(n) => Some(Value::Sequence(vec![Value::from(n.to_string())])),
        _ => None,
    }
}
