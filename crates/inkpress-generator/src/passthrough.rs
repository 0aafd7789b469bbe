//! Passthrough copy.
//!
//! Copies files and directories verbatim into the output directory.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use inkpress_core::Config;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Passthrough copy errors.
#[derive(Debug, Error)]
pub enum PassthroughError {
    /// IO error.
    #[error("IO error copying {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for passthrough operations.
pub type Result<T> = std::result::Result<T, PassthroughError>;

/// Resolved copy rules.
#[derive(Debug, Clone, Default)]
pub struct PassthroughCopy {
    rules: Vec<(PathBuf, PathBuf)>,
}

impl PassthroughCopy {
    /// Create an empty set of rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the `passthrough` entries of a configuration.
    ///
    /// An empty `to` copies a directory's contents into the output root and
    /// a single file to its own relative path under the output directory.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let output_dir = config.output_dir();
        let rules = config
            .passthrough
            .iter()
            .map(|entry| {
                let from = config.resolve(&entry.from);
                let to = match entry.to.trim_start_matches('/') {
                    "" if from.is_file() => output_dir.join(relative_path(&entry.from)),
                    dest => output_dir.join(dest),
                };
                (from, to)
            })
            .collect();
        Self { rules }
    }

    /// Add a rule copying `from` to `to`.
    #[must_use]
    pub fn with_rule(mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        self.rules.push((from.into(), to.into()));
        self
    }

    /// Source paths, used to pick watch targets.
    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.rules.iter().map(|(from, _)| from.as_path())
    }

    /// Copy everything. Returns the number of files copied.
    pub fn copy(&self) -> Result<usize> {
        let mut count = 0;

        for (from, to) in &self.rules {
            if !from.exists() {
                debug!(path = %from.display(), "passthrough source does not exist, skipping");
                continue;
            }

            if from.is_dir() {
                count += copy_dir(from, to)?;
            } else {
                copy_file(from, to)?;
                count += 1;
            }
        }

        if count > 0 {
            info!(count, "copied passthrough files");
        }
        Ok(count)
    }
}

/// `from` reduced to its normal components, so `./a/b` and `/a/b` both give `a/b`.
fn relative_path(from: &str) -> PathBuf {
    Path::new(from)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

/// Recursively copy a directory, skipping hidden entries.
fn copy_dir(source: &Path, dest: &Path) -> Result<usize> {
    let mut count = 0;
    let walker = WalkDir::new(source).into_iter().filter_entry(|e| {
        e.depth() == 0 || !e.file_name().to_str().is_some_and(|n| n.starts_with('.'))
    });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        copy_file(entry.path(), &dest.join(relative))?;
        count += 1;
    }

    Ok(count)
}

/// Copy a single file, creating parent directories.
fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| PassthroughError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::copy(source, dest).map_err(|e| PassthroughError::Io {
        path: source.to_path_buf(),
        source: e,
    })?;

    debug!(src = %source.display(), dest = %dest.display(), "copied file");
    Ok(())
}
