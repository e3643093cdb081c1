//! CLI command implementations.

pub mod init;
pub mod publish;
pub mod sync;
pub mod validate;

pub use init::init_project;
pub use publish::publish_article;
pub use sync::sync_articles;
pub use validate::validate_article;
