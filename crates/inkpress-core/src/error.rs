//! Error types for the inkpress core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for inkpress.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Front matter that did not parse as a mapping.
    #[error("invalid {format} front matter in {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        format: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Layered configuration error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// YAML (`---`) front matter of `path` failed to parse.
    pub fn yaml_frontmatter(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Frontmatter {
            path: path.into(),
            format: "YAML",
            source: Box::new(source),
        }
    }

    /// TOML (`+++`) front matter of `path` failed to parse.
    pub fn toml_frontmatter(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Frontmatter {
            path: path.into(),
            format: "TOML",
            source: Box::new(source),
        }
    }
}
