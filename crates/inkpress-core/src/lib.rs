//! inkpress Core Library
//!
//! Core types, configuration, run mode and error handling for the inkpress
//! static site generator.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod run_mode;

pub use config::Config;
pub use content::{ContentFormat, ContentItem, Metadata, is_truthy};
pub use error::{CoreError, Result};
pub use run_mode::{ParseRunModeError, RUN_MODE_ENV, RunMode};
