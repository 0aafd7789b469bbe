//! Build context shared by hooks and preprocessors.

use inkpress_core::{Config, RunMode};

/// Configuration and run mode for one process.
///
/// Both are fixed once the context exists.
#[derive(Debug, Clone)]
pub struct BuildContext {
    config: Config,
    run_mode: RunMode,
}

impl BuildContext {
    /// Create a new build context.
    #[must_use]
    pub fn new(config: Config, run_mode: RunMode) -> Self {
        Self { config, run_mode }
    }

    /// Site configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current run mode.
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }
}
