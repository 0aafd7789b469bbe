//! Per-item preprocessors.
//!
//! A preprocessor looks at one content item before rendering and either
//! excludes it, leaves it alone, or replaces its body. "Leave it alone" is
//! distinct from "include it": a later preprocessor can still exclude the
//! item.

use std::fmt;

use inkpress_core::{ContentItem, Metadata, RunMode, is_truthy};
use tracing::{debug, trace};

use crate::context::BuildContext;

/// Decision returned by a preprocessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preprocess {
    /// Drop the item from this build.
    Exclude,
    /// No decision; the item continues unchanged.
    Unchanged,
    /// Continue with a new body.
    Replace(String),
}

/// A per-item hook run before rendering.
pub trait Preprocessor: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether this preprocessor applies to the item. Defaults to all items.
    fn applies_to(&self, _item: &ContentItem) -> bool {
        true
    }

    /// Inspect one item.
    fn process(&self, item: &ContentItem, ctx: &BuildContext) -> Preprocess;
}

/// Exclusion decision for drafts.
///
/// Excludes when `draft` is truthy and the run mode is a full build. Every
/// other combination makes no decision, so drafts stay visible while serving
/// or watching locally.
pub fn draft_decision(data: &Metadata, run_mode: RunMode) -> Preprocess {
    let draft = data.get("draft").is_some_and(is_truthy);
    if draft && run_mode.is_build() {
        Preprocess::Exclude
    } else {
        Preprocess::Unchanged
    }
}

/// Drops drafts from full builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DraftsPreprocessor;

impl Preprocessor for DraftsPreprocessor {
    fn name(&self) -> &str {
        "drafts"
    }

    fn process(&self, item: &ContentItem, ctx: &BuildContext) -> Preprocess {
        draft_decision(&item.data, ctx.run_mode())
    }
}

/// Which file extensions a [`FnPreprocessor`] runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    All,
    Extensions(Vec<String>),
}

impl Scope {
    /// Parse `"*"` or a comma separated list such as `"md,html"`.
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "*" {
            return Self::All;
        }
        Self::Extensions(
            raw.split(',')
                .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        )
    }

    fn matches(&self, item: &ContentItem) -> bool {
        match self {
            Self::All => true,
            Self::Extensions(exts) => item
                .extension()
                .is_some_and(|ext| exts.iter().any(|e| *e == ext)),
        }
    }
}

type PreprocessFn = dyn Fn(&ContentItem, &BuildContext) -> Preprocess + Send + Sync;

/// A preprocessor built from a closure and an extension scope.
pub struct FnPreprocessor {
    name: String,
    scope: Scope,
    func: Box<PreprocessFn>,
}

impl FnPreprocessor {
    /// Create a preprocessor for the given extensions (`"*"` for all).
    pub fn new<F>(name: impl Into<String>, extensions: &str, func: F) -> Self
    where
        F: Fn(&ContentItem, &BuildContext) -> Preprocess + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            scope: Scope::parse(extensions),
            func: Box::new(func),
        }
    }
}

impl fmt::Debug for FnPreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPreprocessor")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl Preprocessor for FnPreprocessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, item: &ContentItem) -> bool {
        self.scope.matches(item)
    }

    fn process(&self, item: &ContentItem, ctx: &BuildContext) -> Preprocess {
        (self.func)(item, ctx)
    }
}

/// Ordered list of preprocessors.
#[derive(Default)]
pub struct PreprocessorChain {
    preprocessors: Vec<Box<dyn Preprocessor>>,
}

impl PreprocessorChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain with the drafts preprocessor registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut chain = Self::new();
        chain.register(DraftsPreprocessor);
        chain
    }

    /// Append a preprocessor; it runs after those already registered.
    pub fn register(&mut self, preprocessor: impl Preprocessor + 'static) -> &mut Self {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.preprocessors.iter().map(|p| p.name()).collect()
    }

    /// Number of registered preprocessors.
    pub fn len(&self) -> usize {
        self.preprocessors.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.preprocessors.is_empty()
    }

    /// Run the chain on one item. `None` means the item was excluded.
    pub fn run(&self, mut item: ContentItem, ctx: &BuildContext) -> Option<ContentItem> {
        for preprocessor in &self.preprocessors {
            if !preprocessor.applies_to(&item) {
                continue;
            }

            match preprocessor.process(&item, ctx) {
                Preprocess::Exclude => {
                    debug!(
                        preprocessor = preprocessor.name(),
                        path = %item.relative.display(),
                        run_mode = %ctx.run_mode(),
                        "excluded content item"
                    );
                    return None;
                }
                Preprocess::Unchanged => {}
                Preprocess::Replace(body) => {
                    trace!(
                        preprocessor = preprocessor.name(),
                        path = %item.relative.display(),
                        "replaced content body"
                    );
                    item.body = body;
                }
            }
        }

        Some(item)
    }
}

impl fmt::Debug for PreprocessorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessorChain")
            .field("preprocessors", &self.names())
            .finish()
    }
}
