//! inkpress Generator Library
//!
//! Build pipeline for the inkpress static site generator.
//!
//! # Modules
//!
//! - [`context`] - Per-process build context (configuration and run mode)
//! - [`preprocess`] - Per-item preprocessors, including the drafts filter
//! - [`hook`] - Lifecycle hooks run before each build
//! - [`style`] - SCSS compilation hook
//! - [`collector`] - Content discovery and preprocessing
//! - [`render`] - Markdown rendering and page documents
//! - [`passthrough`] - Verbatim file copies into the output
//! - [`feed`] - Atom feed generation
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod context;
pub mod feed;
pub mod hook;
pub mod passthrough;
pub mod preprocess;
pub mod render;
pub mod style;

pub use build::{BuildError, BuildReport, BuildStats, Builder};
pub use collector::{Collection, ContentCollector};
pub use context::BuildContext;
pub use feed::FeedGenerator;
pub use hook::{BuildHook, HookOutcome};
pub use passthrough::PassthroughCopy;
pub use preprocess::{
    DraftsPreprocessor, FnPreprocessor, Preprocess, Preprocessor, PreprocessorChain, draft_decision,
};
pub use render::{Page, Renderer};
pub use style::{GrassCompiler, StyleCompiler, StyleError, StyleHook};
