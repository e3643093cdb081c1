//! Configuration parsing and management.

use crate::models::PublishConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the vaultpress.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the note source tree
    pub source: PathBuf,

    /// Root the generated site content is written to
    pub target: PathBuf,

    /// Directory holding image assets; defaults to the source root
    #[serde(default)]
    pub images: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Get the source directory, resolved relative to the config file
    pub fn source_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.source)
    }

    /// Get the target directory, resolved relative to the config file
    pub fn target_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.target)
    }

    /// Get the image directory, resolved relative to the config file
    pub fn image_dir(&self) -> Option<PathBuf> {
        self.paths.images.as_ref().map(|p| self.resolve_path(p))
    }

    /// Build the immutable per-call publish configuration
    pub fn publish_config(&self) -> PublishConfig {
        PublishConfig {
            source_dir: self.source_dir(),
            target_dir: self.target_dir(),
            image_dir: self.image_dir(),
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vaultpress.yml");
        std::fs::write(
            &config_path,
            "paths:\n  source: vault\n  target: site/content\n  images: vault/attachments\n",
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.source_dir(), dir.path().join("vault"));
        assert_eq!(config.target_dir(), dir.path().join("site/content"));
        assert_eq!(config.image_dir(), Some(dir.path().join("vault/attachments")));
    }

    #[test]
    fn test_images_path_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vaultpress.yml");
        std::fs::write(&config_path, "paths:\n  source: vault\n  target: out\n").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.image_dir(), None);

        let publish = config.publish_config();
        assert_eq!(publish.image_source_dir(), dir.path().join("vault"));
    }

    #[test]
    fn test_absolute_paths_kept() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vaultpress.yml");
        std::fs::write(&config_path, "paths:\n  source: /srv/vault\n  target: out\n").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.source_dir(), PathBuf::from("/srv/vault"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vaultpress.yml");
        std::fs::write(&config_path, "paths: [broken").unwrap();

        assert!(matches!(
            Config::from_file(&config_path),
            Err(ConfigError::Parse(_))
        ));
    }
}
