//! SCSS compilation hook.
//!
//! Compiles one fixed SCSS source into one fixed, minified CSS file before
//! every build. A missing source is skipped and any failure is reported as
//! a [`HookOutcome`] so a broken stylesheet never stops the site build.

use std::{
    fs,
    path::{Path, PathBuf},
};

use inkpress_core::Config;
use thiserror::Error;

use crate::{
    context::BuildContext,
    hook::{BuildHook, HookOutcome},
};

/// Stylesheet errors.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The compiler rejected the source.
    #[error("failed to compile {path}: {message}")]
    Compile { path: PathBuf, message: String },

    /// The output could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for stylesheet operations.
pub type Result<T> = std::result::Result<T, StyleError>;

/// Translates a stylesheet source file into minified CSS.
pub trait StyleCompiler: Send + Sync {
    /// Compile the file at `source`.
    fn compile(&self, source: &Path) -> Result<String>;
}

/// SCSS compiler backed by `grass`, emitting compressed CSS.
#[derive(Debug, Clone, Default)]
pub struct GrassCompiler {
    load_paths: Vec<PathBuf>,
}

impl GrassCompiler {
    /// Create a compiler with no extra load paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add directories searched by `@use` and `@import`.
    #[must_use]
    pub fn with_load_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.load_paths.extend(paths);
        self
    }
}

impl StyleCompiler for GrassCompiler {
    fn compile(&self, source: &Path) -> Result<String> {
        let options = grass::Options::default()
            .style(grass::OutputStyle::Compressed)
            .load_paths(&self.load_paths);

        grass::from_path(source, &options).map_err(|e| StyleError::Compile {
            path: source.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Before-build hook compiling the configured stylesheet.
#[derive(Debug)]
pub struct StyleHook<C = GrassCompiler> {
    source: PathBuf,
    output: PathBuf,
    compiler: C,
}

impl StyleHook<GrassCompiler> {
    /// Build the hook from the `[style]` section of the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let load_paths = config.style.load_paths.iter().map(|p| config.resolve(p));
        Self::new(
            config.style_source(),
            config.style_output(),
            GrassCompiler::new().with_load_paths(load_paths),
        )
    }
}

impl<C: StyleCompiler> StyleHook<C> {
    /// Create a hook for a fixed source/output pair.
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>, compiler: C) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            compiler,
        }
    }

    /// SCSS source path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Compiled CSS path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Compile the source and write the output.
    ///
    /// Compilation finishes before anything is written, so a failed compile
    /// leaves an existing output file untouched.
    pub fn run(&self) -> HookOutcome {
        if !self.source.exists() {
            return HookOutcome::Skipped {
                reason: format!(
                    "input file not found: {}, skipping SCSS compilation",
                    self.source.display()
                ),
            };
        }

        match self.compile_and_write() {
            Ok(bytes) => HookOutcome::Completed {
                detail: format!(
                    "compiled {} to {} ({bytes} bytes)",
                    self.source.display(),
                    self.output.display()
                ),
            },
            Err(e) => HookOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    fn compile_and_write(&self) -> Result<usize> {
        let css = self.compiler.compile(&self.source)?;

        if let Some(parent) = self.output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StyleError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.output, &css).map_err(|source| StyleError::Write {
            path: self.output.clone(),
            source,
        })?;

        Ok(css.len())
    }
}

impl<C: StyleCompiler> BuildHook for StyleHook<C> {
    fn name(&self) -> &str {
        "scss"
    }

    fn before_build(&self, _ctx: &BuildContext) -> HookOutcome {
        self.run()
    }
}
