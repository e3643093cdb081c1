//! # vaultpress-core
//!
//! Core library for the vaultpress publishing pipeline.
//!
//! This crate converts notes written in a personal-wiki markup dialect into
//! standard Markdown with a YAML metadata header, copies referenced image
//! assets into a per-article output directory, and validates the written
//! result. It supports publishing a single article as well as batch
//! re-syncing every published-status article in a source tree.

pub mod assemble;
pub mod assets;
pub mod config;
pub mod frontmatter;
pub mod fs;
pub mod models;
pub mod progress;
pub mod publish;
pub mod slug;
pub mod sync;
pub mod transform;
pub mod validate;

pub use config::Config;
pub use fs::{FileStat, FileSystem, StdFs};
pub use models::{
    Article, ArticleStatus, AssetReference, PublishConfig, PublishResult, SyncResult,
};
pub use progress::{ProgressFn, SyncProgressFn};
pub use publish::Publisher;
pub use slug::{anchorize, slugify};
pub use sync::{derive_category, CancelFlag, Syncer};
pub use transform::{transform, TransformProfile};
pub use validate::{validate_output, ValidationReport};
