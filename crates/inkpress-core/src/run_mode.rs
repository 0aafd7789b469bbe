//! Process run mode.
//!
//! The run mode separates a publishable build from a local preview session.
//! It is decided once at startup and handed to the build through
//! `BuildContext`; library code never reads it from the environment.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the run mode picked by the CLI command.
pub const RUN_MODE_ENV: &str = "INKPRESS_RUN_MODE";

/// How the current process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// One-shot, publishable build.
    Build,
    /// Build followed by a local development server.
    Serve,
    /// Build followed by rebuilds on file changes.
    Watch,
}

/// Error returned when a string is not a known run mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown run mode `{0}` (expected build, serve or watch)")]
pub struct ParseRunModeError(String);

impl RunMode {
    /// The string form used on the command line and in the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Serve => "serve",
            Self::Watch => "watch",
        }
    }

    /// Whether this is a full, publishable build.
    pub fn is_build(&self) -> bool {
        matches!(self, Self::Build)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = ParseRunModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" => Ok(Self::Build),
            "serve" => Ok(Self::Serve),
            "watch" => Ok(Self::Watch),
            _ => Err(ParseRunModeError(s.to_string())),
        }
    }
}
